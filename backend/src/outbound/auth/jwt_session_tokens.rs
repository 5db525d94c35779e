//! HS256 session-token adapter.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{SessionToken, SessionTokenError, SessionTokens};
use crate::domain::user::UserId;

/// Session lifetime applied when no explicit TTL is configured.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Session tokens signed with a shared HS256 secret.
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtSessionTokens {
    /// Create an issuer with the default TTL.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_SESSION_TTL_SECS)
    }

    /// Create an issuer minting tokens valid for `ttl_secs`.
    pub fn with_ttl(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, SessionTokenError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_secs,
        };
        let raw = encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            SessionTokenError::Issue {
                message: err.to_string(),
            }
        })?;
        Ok(SessionToken::new(raw))
    }

    fn decode(&self, raw: &str) -> Result<UserId, SessionTokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(raw, &self.decoding, &validation)
            .map_err(|_| SessionTokenError::Invalid)?;
        UserId::new(&data.claims.sub).map_err(|_| SessionTokenError::Invalid)
    }
}
