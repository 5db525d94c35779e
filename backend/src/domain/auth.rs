//! Authentication primitives for social login.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when a login payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The idToken was missing or blank once trimmed.
    MissingIdToken,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdToken => write!(f, "idToken must be a string"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Raw externally-issued identity token, held in zeroizing storage.
///
/// ## Invariants
/// - The wrapped token is non-empty once trimmed.
///
/// # Examples
/// ```
/// use backend::domain::auth::SocialIdToken;
///
/// let token = SocialIdToken::new("eyJhbGciOi...").unwrap();
/// assert!(!token.as_str().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SocialIdToken(Zeroizing<String>);

impl SocialIdToken {
    /// Validate and wrap a raw bearer token.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AuthValidationError::MissingIdToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Token string handed to the verifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Identity claims extracted from a successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    /// Issuer-supplied subject id, the stable external identity key.
    pub subject: String,
    /// Email address, when the issuer shared one.
    pub email: Option<String>,
    /// Human-readable name, when the issuer shared one.
    pub display_name: Option<String>,
    /// Whether the issuer has verified the email address.
    pub email_verified: bool,
}
