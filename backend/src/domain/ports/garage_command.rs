//! Driving port for garage mutations.
//!
//! Inbound adapters call these use-cases without knowing the backing
//! infrastructure, which keeps handler tests deterministic: they substitute a
//! mock instead of wiring persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::garage::{GarageInput, GaragePatch, Service, ServiceInput};
use crate::domain::query::GarageProjection;
use crate::domain::user::UserId;

/// Request to create a garage on behalf of an authenticated user.
#[derive(Debug, Clone)]
pub struct CreateGarageRequest {
    pub input: GarageInput,
    pub acting_user: UserId,
}

/// Response carrying the created garage.
#[derive(Debug, Clone)]
pub struct CreateGarageResponse {
    pub garage: GarageProjection,
}

/// Request to patch an existing garage.
#[derive(Debug, Clone)]
pub struct UpdateGarageRequest {
    pub garage_id: Uuid,
    pub patch: GaragePatch,
    pub acting_user: UserId,
}

/// Response carrying the updated garage.
#[derive(Debug, Clone)]
pub struct UpdateGarageResponse {
    pub garage: GarageProjection,
}

/// Request to append services to a garage.
#[derive(Debug, Clone)]
pub struct AddServicesRequest {
    pub garage_id: Uuid,
    pub services: Vec<ServiceInput>,
    pub acting_user: UserId,
}

/// Response carrying the full services list after the append.
#[derive(Debug, Clone)]
pub struct AddServicesResponse {
    pub services: Vec<Service>,
}

/// Request to remove services from a garage by id.
#[derive(Debug, Clone)]
pub struct RemoveServicesRequest {
    pub garage_id: Uuid,
    pub service_ids: Vec<Uuid>,
    pub acting_user: UserId,
}

/// Response carrying the remaining services and the ids actually removed.
#[derive(Debug, Clone)]
pub struct RemoveServicesResponse {
    pub services: Vec<Service>,
    pub removed: Vec<Uuid>,
}

/// Request to soft-delete a garage.
#[derive(Debug, Clone)]
pub struct DeleteGarageRequest {
    pub garage_id: Uuid,
    pub acting_user: UserId,
}

/// Response distinguishing "mutation applied" from "no matching document".
#[derive(Debug, Clone, Copy)]
pub struct DeleteGarageResponse {
    pub deleted: bool,
}

/// Domain use-case port for garage mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GarageCommand: Send + Sync {
    /// Create a garage owned by the acting user.
    async fn create(&self, request: CreateGarageRequest) -> Result<CreateGarageResponse, Error>;

    /// Patch a garage; fails `NotFound` when absent or soft-deleted.
    async fn update(&self, request: UpdateGarageRequest) -> Result<UpdateGarageResponse, Error>;

    /// Append services; fails `NotFound` when the garage is absent or
    /// soft-deleted.
    async fn add_services(&self, request: AddServicesRequest)
    -> Result<AddServicesResponse, Error>;

    /// Remove services by id; missing ids are per-id no-ops.
    async fn remove_services(
        &self,
        request: RemoveServicesRequest,
    ) -> Result<RemoveServicesResponse, Error>;

    /// Soft-delete a garage.
    async fn delete(&self, request: DeleteGarageRequest) -> Result<DeleteGarageResponse, Error>;
}
