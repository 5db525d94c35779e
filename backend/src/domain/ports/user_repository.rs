//! Driven port for user persistence.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// A user with this subject id already exists.
    ///
    /// Raised by the uniqueness constraint when concurrent first-logins race;
    /// callers resolve it by re-reading.
    #[error("user with subject {subject} already exists")]
    DuplicateSubject { subject: String },
}

/// Port for looking up and creating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by issuer subject id.
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Find a user by internal id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Store a new user, enforcing subject uniqueness.
    async fn create(&self, user: User) -> Result<User, UserRepositoryError>;
}
