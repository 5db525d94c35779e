//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities and the use-case services that
//! operate on them, independent of transport and persistence. Inbound
//! adapters parse into these types; outbound adapters implement the ports in
//! [`ports`].

pub mod auth;
pub mod deadline;
pub mod error;
pub mod garage;
pub mod garage_service;
pub mod identity;
pub mod ports;
pub mod query;
pub mod social_login_service;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::garage_service::GarageService;
pub use self::identity::IdentityResolver;
pub use self::social_login_service::{INVALID_SOCIAL_TOKEN, SocialLoginService};
pub use self::user::{User, UserId, UserValidationError};

/// Convenient result alias for domain use-cases.
pub type ApiResult<T> = Result<T, Error>;
