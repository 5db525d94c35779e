//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/login/social
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::auth::SocialIdToken;
use crate::domain::ports::{LoginService, SocialLoginRequest};
use crate::domain::user::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for social login.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginBody {
    pub id_token: Option<String>,
}

/// Response payload for a successful social login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginResponseBody {
    pub session_token: String,
    pub user: User,
}

/// Exchange an external identity token for a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login/social",
    request_body = SocialLoginBody,
    responses(
        (status = 200, description = "Session issued", body = SocialLoginResponseBody),
        (status = 400, description = "Missing or invalid idToken", body = Error)
    ),
    tags = ["auth"],
    operation_id = "loginSocial"
)]
#[post("/auth/login/social")]
pub async fn login_social(
    state: web::Data<HttpState>,
    payload: web::Json<SocialLoginBody>,
) -> ApiResult<web::Json<SocialLoginResponseBody>> {
    let raw = payload.into_inner().id_token.unwrap_or_default();
    let id_token =
        SocialIdToken::new(raw).map_err(|err| Error::invalid_request(err.to_string()))?;

    let response = state
        .login
        .login_social(SocialLoginRequest { id_token })
        .await?;

    Ok(web::Json(SocialLoginResponseBody {
        session_token: response.session_token.into(),
        user: response.user,
    }))
}
