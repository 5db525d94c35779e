//! Google ID-token verifier.
//!
//! Verifies RS256 ID tokens against Google's published JWKS. Signing keys are
//! cached by `kid`; a miss triggers one refetch before the token is rejected.

use std::collections::HashMap;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::auth::{SocialIdToken, VerifiedClaims};
use crate::domain::ports::{TokenVerifier, TokenVerifierError};

/// Google's JWKS endpoint for ID-token signing keys.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuer values Google stamps into ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

fn map_decode_error(error: &jsonwebtoken::errors::Error) -> TokenVerifierError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => TokenVerifierError::Expired,
        ErrorKind::InvalidSignature => TokenVerifierError::InvalidSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => TokenVerifierError::IssuerMismatch,
        _ => TokenVerifierError::Malformed,
    }
}

/// Token verifier backed by Google's JWKS endpoint.
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    audience: String,
    certs_url: String,
    keys: RwLock<HashMap<String, Jwk>>,
}

impl GoogleTokenVerifier {
    /// Create a verifier expecting tokens for this OAuth client id.
    pub fn new(audience: impl Into<String>) -> Self {
        Self::with_certs_url(audience, GOOGLE_CERTS_URL)
    }

    /// Create a verifier fetching keys from a non-default endpoint.
    pub fn with_certs_url(audience: impl Into<String>, certs_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            audience: audience.into(),
            certs_url: certs_url.into(),
            keys: RwLock::new(HashMap::new()),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, TokenVerifierError> {
        if let Some(jwk) = self.keys.read().await.get(kid) {
            return Ok(jwk.clone());
        }

        let fetched = self.fetch_keys().await?;
        debug!(count = fetched.len(), "issuer signing keys refreshed");
        let mut cache = self.keys.write().await;
        for jwk in fetched {
            cache.insert(jwk.kid.clone(), jwk);
        }
        // An unknown kid after a refresh means the token was not signed with
        // a current Google key.
        cache
            .get(kid)
            .cloned()
            .ok_or(TokenVerifierError::InvalidSignature)
    }

    async fn fetch_keys(&self) -> Result<Vec<Jwk>, TokenVerifierError> {
        let key_fetch = |err: reqwest::Error| TokenVerifierError::KeyFetch {
            message: err.to_string(),
        };

        let set: JwkSet = self
            .client
            .get(&self.certs_url)
            .send()
            .await
            .map_err(key_fetch)?
            .error_for_status()
            .map_err(key_fetch)?
            .json()
            .await
            .map_err(key_fetch)?;
        Ok(set.keys)
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &SocialIdToken) -> Result<VerifiedClaims, TokenVerifierError> {
        let header =
            decode_header(token.as_str()).map_err(|_| TokenVerifierError::Malformed)?;
        let kid = header.kid.ok_or(TokenVerifierError::Malformed)?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|_| TokenVerifierError::InvalidSignature)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(token.as_str(), &key, &validation)
            .map_err(|err| map_decode_error(&err))?;

        Ok(VerifiedClaims {
            subject: data.claims.sub,
            email: data.claims.email,
            display_name: data.claims.name,
            email_verified: data.claims.email_verified,
        })
    }
}
