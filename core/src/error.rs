//! Error types for the myToDo API client.
//!
//! # Design
//! `Unauthorized` and `NotFound` get dedicated variants because callers react
//! to them differently (drop back to the login screen, surface "Not Found").
//! All other non-2xx responses land in `HttpError` with the status code and
//! the `detail` string parsed from the error body when present.
//! `user_message` collapses every variant into the single user-facing
//! failure string the UI shows.

use std::fmt;

/// Errors returned by `ApiClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The content failed client-side validation; no request was built.
    InvalidContent(String),

    /// The server returned 401 — the session is missing, invalid or stale.
    Unauthorized(String),

    /// The server returned 404 — the requested todo does not exist.
    NotFound,

    /// The server returned a non-2xx status other than 401/404.
    HttpError { status: u16, detail: Option<String> },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    /// The uniform failure message surfaced to the user: the server-provided
    /// detail when there is one, a generic message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidContent(msg) => msg.clone(),
            ApiError::Unauthorized(detail) => detail.clone(),
            ApiError::NotFound => "Not Found".to_string(),
            ApiError::HttpError {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => "Something went wrong".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidContent(msg) => write!(f, "invalid content: {msg}"),
            ApiError::Unauthorized(detail) => write!(f, "unauthorized: {detail}"),
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::HttpError { status, detail } => match detail {
                Some(detail) => write!(f, "HTTP {status}: {detail}"),
                None => write!(f, "HTTP {status}"),
            },
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
