//! In-memory mock of the myToDo backend API.
//!
//! Mirrors the endpoints the client consumes: `/auth/signup`, `/auth/login`,
//! and the `/todos/` CRUD surface behind bearer-token auth. Todos are scoped
//! to the signing-in user, ids come from a monotonic counter, and every
//! error body carries a `detail` string, matching the real backend.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

#[derive(Clone, Debug)]
struct User {
    id: i64,
    username: String,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct Store {
    users: Vec<User>,
    /// Opaque bearer token -> user id.
    tokens: HashMap<String, i64>,
    todos: HashMap<i64, Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

type ErrorResponse = (StatusCode, Json<Detail>);

fn reject(status: StatusCode, detail: &str) -> ErrorResponse {
    (
        status,
        Json(Detail {
            detail: detail.to_string(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(root))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/todos/", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Resolve the bearer token in `headers` to a user id.
fn authorize(store: &Store, headers: &HeaderMap) -> Result<i64, ErrorResponse> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    store
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

async fn root() -> Json<Message> {
    Json(Message {
        message: "Welcome to myToDo API!".to_string(),
    })
}

async fn signup(
    State(db): State<Db>,
    Json(input): Json<SignupRequest>,
) -> Result<Json<UserResponse>, ErrorResponse> {
    let mut store = db.write().await;
    if store.users.iter().any(|u| u.username == input.username) {
        return Err(reject(StatusCode::BAD_REQUEST, "Username already registered"));
    }
    if store.users.iter().any(|u| u.email == input.email) {
        return Err(reject(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    store.next_user_id += 1;
    let user = User {
        id: store.next_user_id,
        username: input.username,
        email: input.email,
        password: input.password,
    };
    let response = UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    };
    store.users.push(user);
    Ok(Json(response))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ErrorResponse> {
    let mut store = db.write().await;
    let user_id = store
        .users
        .iter()
        .find(|u| u.email == input.email && u.password == input.password)
        .map(|u| u.id)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;
    let token = Uuid::new_v4().simple().to_string();
    store.tokens.insert(token.clone(), user_id);
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

async fn list_todos(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Todo>>, ErrorResponse> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let mut todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    todos.sort_by_key(|t| t.id);
    Ok(Json(todos))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> Result<Json<Todo>, ErrorResponse> {
    // The real backend enforces 3..=100 at the model layer.
    let len = input.content.chars().count();
    if !(3..=100).contains(&len) {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Content must be between 3 and 100 characters",
        ));
    }
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    store.next_todo_id += 1;
    let todo = Todo {
        id: store.next_todo_id,
        content: input.content,
        is_completed: false,
        user_id,
    };
    store.todos.insert(todo.id, todo.clone());
    Ok(Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ErrorResponse> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    store
        .todos
        .get(&id)
        .filter(|t| t.user_id == user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))
}

async fn update_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ErrorResponse> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let todo = store
        .todos
        .get_mut(&id)
        .filter(|t| t.user_id == user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))?;
    todo.content = input.content;
    todo.is_completed = input.is_completed;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ErrorResponse> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    match store.todos.get(&id) {
        Some(todo) if todo.user_id == user_id => {
            store.todos.remove(&id);
            Ok(Json(Message {
                message: "Todo deleted successfully".to_string(),
            }))
        }
        _ => Err(reject(StatusCode::NOT_FOUND, "Todo not found")),
    }
}
