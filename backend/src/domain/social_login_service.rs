//! Social login domain service.
//!
//! Verifies an externally-issued identity token, resolves (or lazily creates)
//! the internal user, and mints a session token. The verifier's failure
//! taxonomy is collapsed here into the one message clients may observe; the
//! internal kind is logged before it disappears.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::Error;
use crate::domain::deadline::{DEFAULT_OPERATION_DEADLINE, with_deadline};
use crate::domain::identity::IdentityResolver;
use crate::domain::ports::{
    Clock, LoginService, SessionTokens, SocialLoginRequest, SocialLoginResponse, TokenVerifier,
    TokenVerifierError, UserRepository,
};

/// The single externally observable message for rejected identity tokens.
pub const INVALID_SOCIAL_TOKEN: &str = "Invalid social token";

fn map_verifier_error(error: TokenVerifierError) -> Error {
    match error {
        TokenVerifierError::KeyFetch { message } => {
            warn!(%message, "issuer signing keys unavailable");
            Error::service_unavailable("issuer signing keys unavailable")
        }
        kind => {
            // The taxonomy stays observable in logs and at the port; clients
            // only ever see one message.
            warn!(kind = %kind, "social token rejected");
            Error::invalid_request(INVALID_SOCIAL_TOKEN)
        }
    }
}

/// Login service implementing the social-login driving port.
#[derive(Clone)]
pub struct SocialLoginService<V, U, S, C> {
    verifier: Arc<V>,
    resolver: IdentityResolver<U>,
    sessions: Arc<S>,
    clock: Arc<C>,
    deadline: Duration,
}

impl<V, U, S, C> SocialLoginService<V, U, S, C> {
    /// Create a new service with the given collaborators.
    pub fn new(verifier: Arc<V>, users: Arc<U>, sessions: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            verifier,
            resolver: IdentityResolver::new(users),
            sessions,
            clock,
            deadline: DEFAULT_OPERATION_DEADLINE,
        }
    }

    /// Override the per-round-trip deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl<V, U, S, C> LoginService for SocialLoginService<V, U, S, C>
where
    V: TokenVerifier,
    U: UserRepository,
    S: SessionTokens,
    C: Clock,
{
    async fn login_social(
        &self,
        request: SocialLoginRequest,
    ) -> Result<SocialLoginResponse, Error> {
        let claims = with_deadline(self.deadline, self.verifier.verify(&request.id_token))
            .await?
            .map_err(map_verifier_error)?;

        let user = with_deadline(self.deadline, self.resolver.resolve(&claims)).await??;

        let session_token = self
            .sessions
            .issue(user.id(), self.clock.now())
            .map_err(|err| Error::internal(format!("session token issue failed: {err}")))?;

        Ok(SocialLoginResponse {
            session_token,
            user,
        })
    }
}

#[cfg(test)]
#[path = "social_login_service_tests.rs"]
mod tests;
