//! Persistent session-token store.
//!
//! # Design
//! The original system kept the token in an HTTP-only cookie with a 7-day
//! max age; a terminal client has one natural equivalent, a small JSON file
//! holding the token and its issue time. A session past its max age loads as
//! absent, so expiry never needs handling anywhere else.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime, matching the original cookie max-age.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// A signed-in session: the opaque bearer token plus its issue time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.issued_at).num_seconds() > SESSION_MAX_AGE_SECS
    }
}

/// Errors from reading or writing the session file.
#[derive(Debug)]
pub enum SessionStoreError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl From<std::io::Error> for SessionStoreError {
    fn from(error: std::io::Error) -> Self {
        SessionStoreError::Io(error)
    }
}

impl From<serde_json::Error> for SessionStoreError {
    fn from(error: serde_json::Error) -> Self {
        SessionStoreError::Format(error)
    }
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStoreError::Io(e) => write!(f, "session file I/O: {e}"),
            SessionStoreError::Format(e) => write!(f, "session file format: {e}"),
        }
    }
}

impl std::error::Error for SessionStoreError {}

/// File-backed store for the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored session. Missing, unreadable, or expired sessions all
    /// come back as `None` — the user simply has to sign in again.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let session: Session = serde_json::from_str(&raw).ok()?;
        if session.is_expired() {
            return None;
        }
        Some(session)
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Delete the stored session. Clearing an already-absent session is fine.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
