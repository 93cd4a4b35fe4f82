//! Stateless HTTP request builder and response parser for the myToDo API.
//!
//! # Design
//! `ApiClient` holds the API base URL and, after login, the bearer token.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! The backend mixes success statuses (FastAPI defaults to 200 even for
//! creates), so `parse_*` accepts any 2xx rather than pinning exact codes —
//! the same contract the original web client got from `response.ok`.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    validate_content, CreateTodo, ErrorBody, LoginRequest, SignupRequest, TodoItem, TokenResponse,
    UpdateTodo, UserProfile,
};

/// Synchronous, stateless client for the myToDo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. When a token is set, every todo request carries an
/// `authorization: Bearer <token>` header; without one the header is omitted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Store the bearer token attached to subsequent authenticated requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token; subsequent requests omit the auth header.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut req = HttpRequest::new(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            req.headers
                .push(("authorization".to_string(), format!("Bearer {token}")));
        }
        req
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }

    // -----------------------------------------------------------------------
    // Session/auth calls
    // -----------------------------------------------------------------------

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/login", input)
    }

    /// On success returns the opaque bearer token envelope; the caller
    /// decides where to store it.
    pub fn parse_login(&self, response: HttpResponse) -> Result<TokenResponse, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    pub fn build_signup(&self, input: &SignupRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/signup", input)
    }

    pub fn parse_signup(&self, response: HttpResponse) -> Result<UserProfile, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    // -----------------------------------------------------------------------
    // Todo calls
    // -----------------------------------------------------------------------

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos/")
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/todos/{id}"))
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    /// Validates the content (3–54 chars after trim) before building; invalid
    /// input fails here and never produces a request.
    pub fn build_create_todo(&self, content: &str) -> Result<HttpRequest, ApiError> {
        let content = validate_content(content)?;
        let input = CreateTodo {
            content: content.to_string(),
        };
        self.json_request(HttpMethod::Post, "/todos/", &input)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    /// Full-body update: the endpoint always takes both fields. Content is
    /// validated like `build_create_todo`.
    pub fn build_update_todo(
        &self,
        id: i64,
        content: &str,
        is_completed: bool,
    ) -> Result<HttpRequest, ApiError> {
        let content = validate_content(content)?;
        let input = UpdateTodo {
            content: content.to_string(),
            is_completed,
        };
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), &input)
    }

    /// Toggle completion: sends `is_completed` negated, echoing the
    /// server-held content back unchanged. One call flips the flag exactly
    /// once.
    pub fn build_toggle_status(
        &self,
        id: i64,
        content: &str,
        is_completed: bool,
    ) -> Result<HttpRequest, ApiError> {
        let input = UpdateTodo {
            content: content.to_string(),
            is_completed: !is_completed,
        };
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), &input)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_ok(&response)?;
        parse_body(&response)
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    /// On success returns the server's confirmation message.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_ok(&response)?;
        #[derive(serde::Deserialize)]
        struct Confirmation {
            message: String,
        }
        let confirmation: Confirmation = parse_body(&response)?;
        Ok(confirmation.message)
    }
}

/// Map non-2xx statuses to the appropriate `ApiError` variant, pulling the
/// `detail` string out of the error body when the server sent one.
fn check_ok(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    let detail = ErrorBody::extract(&response.body);
    match response.status {
        401 => Err(ApiError::Unauthorized(
            detail.unwrap_or_else(|| "Not authenticated".to_string()),
        )),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError { status, detail }),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "http://localhost:8000";

    fn client() -> ApiClient {
        ApiClient::new(BASE_URL)
    }

    fn signed_in_client() -> ApiClient {
        let mut client = client();
        client.set_token("sesame");
        client
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8000/");
        let req = client.build_list_todos();
        assert_eq!(req.url, "http://localhost:8000/todos/");
    }

    #[test]
    fn build_login_produces_correct_request() {
        let input = LoginRequest {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        let req = client().build_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/auth/login"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        // Login itself is unauthenticated.
        assert_eq!(req.header("authorization"), None);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@b.c");
        assert_eq!(body["password"], "hunter2");
    }

    #[test]
    fn parse_login_returns_token() {
        let token = client()
            .parse_login(ok(r#"{"access_token":"abc123","token_type":"bearer"}"#))
            .unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn parse_login_maps_401_to_unauthorized() {
        let response = HttpResponse {
            status: 401,
            body: r#"{"detail":"Incorrect email or password"}"#.to_string(),
        };
        let err = client().parse_login(response).unwrap_err();
        match err {
            ApiError::Unauthorized(detail) => {
                assert_eq!(detail, "Incorrect email or password");
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn build_signup_produces_correct_request() {
        let input = SignupRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "lovelace".to_string(),
        };
        let req = client().build_signup(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/auth/signup"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "ada");
    }

    #[test]
    fn parse_signup_surfaces_duplicate_detail() {
        let response = HttpResponse {
            status: 400,
            body: r#"{"detail":"Email already registered"}"#.to_string(),
        };
        let err = client().parse_signup(response).unwrap_err();
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn authenticated_request_carries_bearer_header() {
        let req = signed_in_client().build_list_todos();
        assert_eq!(req.header("authorization"), Some("Bearer sesame"));
    }

    #[test]
    fn cleared_token_omits_bearer_header() {
        let mut client = signed_in_client();
        client.clear_token();
        let req = client.build_list_todos();
        assert_eq!(req.header("authorization"), None);
        assert!(!client.has_token());
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE_URL}/todos/"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_trims_content() {
        let req = signed_in_client().build_create_todo("  Buy milk  ").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/todos/"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["content"], "Buy milk");
    }

    #[test]
    fn build_create_todo_rejects_short_content() {
        let err = client().build_create_todo("ab").unwrap_err();
        assert!(matches!(err, ApiError::InvalidContent(_)));
    }

    #[test]
    fn build_update_todo_sends_full_body() {
        let req = signed_in_client()
            .build_update_todo(7, "Walk the dog", true)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, format!("{BASE_URL}/todos/7"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["content"], "Walk the dog");
        assert_eq!(body["isCompleted"], true);
    }

    #[test]
    fn build_toggle_status_negates_flag() {
        let c = signed_in_client();
        let req = c.build_toggle_status(7, "Walk the dog", false).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["isCompleted"], true);

        let req = c.build_toggle_status(7, "Walk the dog", true).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["isCompleted"], false);
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(ok(r#"[{"id":1,"content":"Test","isCompleted":false}]"#))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "Test");
    }

    #[test]
    fn parse_create_todo_accepts_200() {
        // FastAPI returns 200 for creates unless told otherwise.
        let todo = client()
            .parse_create_todo(ok(r#"{"id":3,"content":"New","isCompleted":false}"#))
            .unwrap();
        assert_eq!(todo.id, 3);
    }

    #[test]
    fn parse_get_todo_not_found() {
        let response = HttpResponse {
            status: 404,
            body: r#"{"detail":"Todo not found"}"#.to_string(),
        };
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_update_todo_wrong_status() {
        let response = HttpResponse {
            status: 500,
            body: "internal error".to_string(),
        };
        let err = client().parse_update_todo(response).unwrap_err();
        assert!(matches!(
            err,
            ApiError::HttpError {
                status: 500,
                detail: None
            }
        ));
    }

    #[test]
    fn parse_delete_todo_returns_message() {
        let message = client()
            .parse_delete_todo(ok(r#"{"message":"Todo deleted successfully"}"#))
            .unwrap();
        assert_eq!(message, "Todo deleted successfully");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
