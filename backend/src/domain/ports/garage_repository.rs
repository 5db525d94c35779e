//! Driven port for the garage document collection.
//!
//! Adapters must provide atomic single-document read-modify-write: each
//! mutation primitive reads, patches, stamps, and stores one document as one
//! step. Every primitive is scoped to non-deleted documents; a soft-deleted
//! garage behaves exactly like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::garage::{AuditStamp, Garage, GaragePatch, Service};
use crate::domain::query::{GarageProjection, QueryPlan};

/// Errors raised by garage collection adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GarageRepositoryError {
    /// Collection connection could not be established.
    #[error("garage collection connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("garage collection query failed: {message}")]
    Query { message: String },
    /// The cursor anchor no longer resolves; pagination must restart.
    #[error("cursor anchor {last_id} no longer resolves")]
    StaleCursor { last_id: Uuid },
}

/// Outcome of a service-removal patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRemoval {
    /// Services remaining on the garage after the patch.
    pub services: Vec<Service>,
    /// Ids that were present and actually removed.
    pub removed: Vec<Uuid>,
}

/// Port for executing query plans and mutating garage documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GarageRepository: Send + Sync {
    /// Execute a plan, returning at most `limit` projected documents in plan
    /// order. An empty page is a success, not an error.
    async fn execute(&self, plan: &QueryPlan)
    -> Result<Vec<GarageProjection>, GarageRepositoryError>;

    /// Store a freshly created garage.
    async fn insert(&self, garage: Garage) -> Result<Garage, GarageRepositoryError>;

    /// Apply a patch to the non-deleted garage with this id.
    ///
    /// Returns `Ok(None)` when no non-deleted document matches.
    async fn update_one(
        &self,
        id: Uuid,
        patch: GaragePatch,
        stamp: AuditStamp,
    ) -> Result<Option<Garage>, GarageRepositoryError>;

    /// Flag the non-deleted garage with this id as deleted.
    ///
    /// Returns whether a document was flagged.
    async fn soft_delete(&self, id: Uuid, stamp: AuditStamp)
    -> Result<bool, GarageRepositoryError>;

    /// Append embedded services to the non-deleted garage with this id.
    async fn add_services(
        &self,
        id: Uuid,
        services: Vec<Service>,
        stamp: AuditStamp,
    ) -> Result<Option<Vec<Service>>, GarageRepositoryError>;

    /// Remove embedded services by id from the non-deleted garage with this
    /// id. Ids that match nothing are skipped, not errors.
    async fn remove_services(
        &self,
        id: Uuid,
        service_ids: Vec<Uuid>,
        stamp: AuditStamp,
    ) -> Result<Option<ServiceRemoval>, GarageRepositoryError>;
}
