//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{GarageCommand, GarageQuery, LoginService, SessionTokens};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub garages: Arc<dyn GarageCommand>,
    pub garages_query: Arc<dyn GarageQuery>,
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionTokens>,
}

impl HttpState {
    /// Construct state from the port implementations.
    pub fn new(
        garages: Arc<dyn GarageCommand>,
        garages_query: Arc<dyn GarageQuery>,
        login: Arc<dyn LoginService>,
        sessions: Arc<dyn SessionTokens>,
    ) -> Self {
        Self {
            garages,
            garages_query,
            login,
            sessions,
        }
    }
}
