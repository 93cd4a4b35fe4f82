//! Wire DTOs for the myToDo API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined independently
//! from the mock-server crate; integration tests catch schema drift between
//! the two. Field names follow the wire format (`isCompleted`), mapped to
//! snake_case on the Rust side via serde renames. Responses may carry extra
//! fields (the server includes `user_id` on todos); serde ignores them.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Minimum task content length, counted in chars after trimming.
pub const CONTENT_MIN: usize = 3;
/// Maximum task content length.
pub const CONTENT_MAX: usize = 54;

/// A single todo item returned by the API. The id is server-assigned; the
/// client never generates identities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub content: String,
}

/// Request payload for updating an existing todo. The update endpoint takes
/// the full body every time; there are no patch semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

/// Request payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request payload for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login response carrying the opaque bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Profile returned by a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Error bodies carry a `detail` string.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    /// Pull the `detail` string out of an error body, if there is one.
    pub(crate) fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|e| e.detail)
    }
}

/// Validate task content client-side, returning the trimmed text.
///
/// Runs before any request is built, so invalid input never reaches the
/// network.
pub fn validate_content(content: &str) -> Result<&str, ApiError> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    if len < CONTENT_MIN {
        return Err(ApiError::InvalidContent(format!(
            "Task content must be at least {CONTENT_MIN} characters long"
        )));
    }
    if len > CONTENT_MAX {
        return Err(ApiError::InvalidContent(format!(
            "Task content must be at most {CONTENT_MAX} characters long"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_item_uses_wire_field_names() {
        let item = TodoItem {
            id: 7,
            content: "Buy milk".to_string(),
            is_completed: true,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["content"], "Buy milk");
        assert_eq!(json["isCompleted"], true);
    }

    #[test]
    fn todo_item_ignores_unknown_fields() {
        let item: TodoItem = serde_json::from_str(
            r#"{"id":1,"content":"Walk the dog","isCompleted":false,"user_id":4}"#,
        )
        .unwrap();
        assert_eq!(item.id, 1);
        assert!(!item.is_completed);
    }

    #[test]
    fn error_body_extracts_detail() {
        assert_eq!(
            ErrorBody::extract(r#"{"detail":"Todo not found"}"#),
            Some("Todo not found".to_string())
        );
        assert_eq!(ErrorBody::extract("internal error"), None);
    }

    #[test]
    fn validate_content_trims_and_accepts() {
        assert_eq!(validate_content("  buy milk  ").unwrap(), "buy milk");
    }

    #[test]
    fn validate_content_rejects_short_input() {
        let err = validate_content("ab").unwrap_err();
        assert!(matches!(err, ApiError::InvalidContent(_)));
        // Whitespace padding does not rescue short content.
        assert!(validate_content("  a  ").is_err());
    }

    #[test]
    fn validate_content_rejects_long_input() {
        let long = "x".repeat(CONTENT_MAX + 1);
        assert!(validate_content(&long).is_err());
        let max = "x".repeat(CONTENT_MAX);
        assert!(validate_content(&max).is_ok());
    }
}
