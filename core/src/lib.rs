//! Synchronous client core for the myToDo API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ApiClient` holds a `base_url` and, once the user is signed in, the
//!   bearer token attached to authenticated requests.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Content validation runs inside `build_*`, so invalid input never
//!   produces a request at all.
//! - `session` persists the signed-in token between runs with a fixed
//!   7-day max age.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, SessionStore};
pub use types::{
    CreateTodo, LoginRequest, SignupRequest, TodoItem, TokenResponse, UpdateTodo, UserProfile,
};
