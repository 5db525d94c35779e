//! In-memory user store with a subject-id uniqueness constraint.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{User, UserId};

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<UserId, User>,
    by_subject: HashMap<String, UserId>,
}

/// User store held behind an async read-write lock.
///
/// `create` checks and writes the subject index under one write lock, which
/// is the uniqueness constraint concurrent first-logins race against.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    inner: RwLock<Inner>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_subject
            .get(subject)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.inner.read().await.by_id.get(id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, UserRepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.by_subject.contains_key(user.subject()) {
            return Err(UserRepositoryError::DuplicateSubject {
                subject: user.subject().to_owned(),
            });
        }
        inner
            .by_subject
            .insert(user.subject().to_owned(), *user.id());
        inner.by_id.insert(*user.id(), user.clone());
        Ok(user)
    }
}
