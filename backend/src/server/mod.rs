//! HTTP server assembly.
//!
//! Components are constructed once here and handed to request-scoped code by
//! `Arc`; there is no registry to look things up in at runtime.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

pub use config::AppConfig;

use crate::domain::ports::SystemClock;
use crate::domain::{GarageService, SocialLoginService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, garages};
use crate::outbound::auth::{GoogleTokenVerifier, JwtSessionTokens};
use crate::outbound::persistence::{MemoryGarageRepository, MemoryUserRepository};

/// Build the adapter and service graph backing the HTTP handlers.
pub fn build_state(config: &AppConfig) -> HttpState {
    let clock = Arc::new(SystemClock);
    let garages_repo = Arc::new(MemoryGarageRepository::new());
    let users = Arc::new(MemoryUserRepository::new());
    let sessions = Arc::new(JwtSessionTokens::with_ttl(
        &config.session_secret,
        config.session_ttl_secs,
    ));
    let verifier = Arc::new(GoogleTokenVerifier::new(config.google_client_id.clone()));
    let deadline = Duration::from_millis(config.operation_deadline_ms);

    let garage_service = Arc::new(
        GarageService::new(garages_repo, Arc::clone(&users), Arc::clone(&clock))
            .with_deadline(deadline),
    );
    let login = Arc::new(
        SocialLoginService::new(verifier, users, Arc::clone(&sessions), clock)
            .with_deadline(deadline),
    );

    HttpState::new(garage_service.clone(), garage_service, login, sessions)
}

/// Register the REST endpoints on a service config.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login_social)
        .service(garages::query_garages)
        .service(garages::create_garage)
        .service(garages::update_garage)
        .service(garages::add_services)
        .service(garages::remove_services)
        .service(garages::delete_garage);
}
