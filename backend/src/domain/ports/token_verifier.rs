//! Driven port for social identity-token verification.

use async_trait::async_trait;

use crate::domain::auth::{SocialIdToken, VerifiedClaims};

/// Internal failure taxonomy for token verification.
///
/// The login service collapses all of these into one externally visible
/// "invalid token" condition; the distinction survives here for logging and
/// tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerifierError {
    /// The token could not be decoded into a recognisable shape.
    #[error("token is not a decodable identity token")]
    Malformed,
    /// The signature does not verify against the issuer's keys.
    #[error("token signature verification failed")]
    InvalidSignature,
    /// The token's expiry is in the past.
    #[error("token has expired")]
    Expired,
    /// Issuer or audience does not match the configured expectations.
    #[error("token issuer or audience mismatch")]
    IssuerMismatch,
    /// The issuer's signing keys could not be retrieved.
    #[error("issuer signing keys could not be fetched: {message}")]
    KeyFetch { message: String },
}

/// Port for verifying externally-issued identity tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify the token and extract its identity claims.
    async fn verify(&self, token: &SocialIdToken) -> Result<VerifiedClaims, TokenVerifierError>;
}
