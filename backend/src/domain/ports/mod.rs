//! Domain ports and supporting types for the hexagonal boundary.

mod clock;
mod garage_command;
mod garage_query;
mod garage_repository;
mod login_service;
mod session_tokens;
mod token_verifier;
mod user_repository;

#[cfg(test)]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use garage_command::MockGarageCommand;
pub use garage_command::{
    AddServicesRequest, AddServicesResponse, CreateGarageRequest, CreateGarageResponse,
    DeleteGarageRequest, DeleteGarageResponse, GarageCommand, RemoveServicesRequest,
    RemoveServicesResponse, UpdateGarageRequest, UpdateGarageResponse,
};
#[cfg(test)]
pub use garage_query::MockGarageQuery;
pub use garage_query::{GarageQuery, ListGaragesRequest, ListGaragesResponse};
#[cfg(test)]
pub use garage_repository::MockGarageRepository;
pub use garage_repository::{GarageRepository, GarageRepositoryError, ServiceRemoval};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, SocialLoginRequest, SocialLoginResponse};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionToken, SessionTokenError, SessionTokens};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerifier, TokenVerifierError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
