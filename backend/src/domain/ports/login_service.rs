//! Driving port for the social login use-case.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::auth::SocialIdToken;
use crate::domain::ports::SessionToken;
use crate::domain::user::User;

/// Request carrying the raw externally-issued identity token.
#[derive(Debug, Clone)]
pub struct SocialLoginRequest {
    pub id_token: SocialIdToken,
}

/// Response carrying the minted session and the resolved user.
#[derive(Debug, Clone)]
pub struct SocialLoginResponse {
    pub session_token: SessionToken,
    pub user: User,
}

/// Domain use-case port for social login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the identity token, resolve the user, and mint a session.
    async fn login_social(&self, request: SocialLoginRequest)
    -> Result<SocialLoginResponse, Error>;
}
