//! Bearer-session extraction for write endpoints.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::Error;
use crate::domain::ports::SessionTokens;
use crate::domain::user::UserId;
use crate::inbound::http::state::HttpState;

/// Acting user derived from the request's bearer session token.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    user_id: UserId,
}

impl SessionContext {
    /// The authenticated acting user.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))
}

fn extract(req: &HttpRequest) -> Result<SessionContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let raw = bearer_token(req)?;
    let user_id = state
        .sessions
        .decode(raw)
        .map_err(|_| Error::unauthorized("invalid session token"))?;
    Ok(SessionContext { user_id })
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use actix_web::test::TestRequest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockGarageCommand, MockGarageQuery, MockLoginService, MockSessionTokens,
        SessionTokenError,
    };

    fn state_with_sessions(sessions: MockSessionTokens) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(MockGarageCommand::new()),
            Arc::new(MockGarageQuery::new()),
            Arc::new(MockLoginService::new()),
            Arc::new(sessions),
        ))
    }

    #[actix_rt::test]
    async fn missing_authorization_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(state_with_sessions(MockSessionTokens::new()))
            .to_http_request();

        let err = extract(&req).expect_err("missing header must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[actix_rt::test]
    async fn non_bearer_authorization_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(state_with_sessions(MockSessionTokens::new()))
            .insert_header((AUTHORIZATION, "Basic abc"))
            .to_http_request();

        let err = extract(&req).expect_err("non-bearer scheme must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[actix_rt::test]
    async fn rejected_session_token_is_unauthorized() {
        let mut sessions = MockSessionTokens::new();
        sessions
            .expect_decode()
            .returning(|_| Err(SessionTokenError::Invalid));
        let req = TestRequest::default()
            .app_data(state_with_sessions(sessions))
            .insert_header((AUTHORIZATION, "Bearer bad-token"))
            .to_http_request();

        let err = extract(&req).expect_err("invalid token must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[actix_rt::test]
    async fn valid_session_yields_the_acting_user() {
        let user_id = UserId::random();
        let mut sessions = MockSessionTokens::new();
        sessions
            .expect_decode()
            .withf(|raw| raw == "good-token")
            .returning(move |_| Ok(user_id));
        let req = TestRequest::default()
            .app_data(state_with_sessions(sessions))
            .insert_header((AUTHORIZATION, "Bearer good-token"))
            .to_http_request();

        let session = extract(&req).expect("valid session extracts");
        assert_eq!(session.user_id(), user_id);
    }
}
