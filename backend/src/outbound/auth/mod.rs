//! Authentication adapters: issuer token verification and session tokens.

mod google_token_verifier;
mod jwt_session_tokens;

pub use google_token_verifier::{GOOGLE_CERTS_URL, GoogleTokenVerifier};
pub use jwt_session_tokens::{DEFAULT_SESSION_TTL_SECS, JwtSessionTokens};
