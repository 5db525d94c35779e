//! Driven port for issuing and decoding session tokens.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::UserId;

/// Errors raised by session-token adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    /// The token could not be signed.
    #[error("session token could not be issued: {message}")]
    Issue { message: String },
    /// The presented token is missing, expired, or fails verification.
    #[error("session token is invalid")]
    Invalid,
}

/// Signed bearer token handed to a client after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an already-signed token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Signed token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Port for minting and checking session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Issue a token for the user, valid from `now` for the adapter's TTL.
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>)
    -> Result<SessionToken, SessionTokenError>;

    /// Decode a presented token back to the acting user id.
    fn decode(&self, raw: &str) -> Result<UserId, SessionTokenError>;
}
