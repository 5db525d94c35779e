//! Identity resolution for verified social-login claims.
//!
//! Maps a verified subject id to an internal user record, creating one on
//! first sight. Creation is find-or-create: the repository's subject
//! uniqueness constraint decides concurrent first-login races, and the loser
//! recovers by re-reading the winner's record — one bounded retry, never more.

use std::sync::Arc;

use crate::domain::Error;
use crate::domain::auth::VerifiedClaims;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{User, UserId};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateSubject { subject } => {
            Error::conflict(format!("user with subject {subject} already exists"))
        }
    }
}

/// Resolves verified claims to the one user record keyed by their subject.
#[derive(Clone)]
pub struct IdentityResolver<U> {
    users: Arc<U>,
}

impl<U> IdentityResolver<U> {
    /// Create a resolver over the given user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> IdentityResolver<U>
where
    U: UserRepository,
{
    /// Find the user for these claims, creating one on first sight.
    ///
    /// Resolution is idempotent: repeated logins with the same subject id
    /// return the same record, and profile fields captured at creation are
    /// never rewritten from later claims.
    pub async fn resolve(&self, claims: &VerifiedClaims) -> Result<User, Error> {
        if let Some(existing) = self
            .users
            .find_by_subject(&claims.subject)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(existing);
        }

        let candidate = User::from_claims(UserId::random(), claims)
            .map_err(|err| Error::invalid_request(format!("invalid identity claims: {err}")))?;

        match self.users.create(candidate).await {
            Ok(created) => Ok(created),
            Err(UserRepositoryError::DuplicateSubject { .. }) => {
                // Lost the first-login race; the winner's record is
                // authoritative.
                self.users
                    .find_by_subject(&claims.subject)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| {
                        Error::conflict(format!(
                            "user creation for subject {} raced and could not be re-read",
                            claims.subject
                        ))
                    })
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
