//! Garage resource service.
//!
//! Implements the garage driving ports by composing the query planner, the
//! garage collection, and the user repository (for reference population).
//! Authorization happens upstream: every mutation arrives with the resolved
//! acting user, which this service stamps into the audit fields.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::domain::deadline::{DEFAULT_OPERATION_DEADLINE, with_deadline};
use crate::domain::garage::{AuditStamp, Garage};
use crate::domain::ports::{
    AddServicesRequest, AddServicesResponse, CreateGarageRequest, CreateGarageResponse,
    DeleteGarageRequest, DeleteGarageResponse, GarageCommand, GarageQuery, GarageRepository,
    GarageRepositoryError, ListGaragesRequest, ListGaragesResponse, RemoveServicesRequest,
    RemoveServicesResponse, UpdateGarageRequest, UpdateGarageResponse, UserRepository,
    UserRepositoryError,
};
use crate::domain::Error;
use crate::domain::ports::Clock;
use crate::domain::query::{self, GarageProjection, PopulateField, ProjectField, UserRef};
use crate::domain::user::{UserId, UserSummary};

fn map_garage_repository_error(error: GarageRepositoryError) -> Error {
    match error {
        GarageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("garage collection unavailable: {message}"))
        }
        GarageRepositoryError::Query { message } => {
            Error::internal(format!("garage collection error: {message}"))
        }
        GarageRepositoryError::StaleCursor { last_id } => Error::invalid_request(
            "cursor is no longer valid; restart pagination from the beginning",
        )
        .with_details(json!({
            "lastId": last_id,
            "code": "stale_cursor",
        })),
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateSubject { subject } => {
            Error::internal(format!("unexpected subject conflict for {subject}"))
        }
    }
}

fn garage_not_found(id: Uuid) -> Error {
    Error::not_found(format!("garage {id} not found"))
}

/// Garage service implementing the command and query driving ports.
#[derive(Clone)]
pub struct GarageService<R, U, C> {
    garages: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
    deadline: Duration,
}

impl<R, U, C> GarageService<R, U, C> {
    /// Create a new service with the given collaborators.
    pub fn new(garages: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            garages,
            users,
            clock,
            deadline: DEFAULT_OPERATION_DEADLINE,
        }
    }

    /// Override the per-round-trip deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

impl<R, U, C> GarageService<R, U, C>
where
    R: GarageRepository,
    U: UserRepository,
    C: Clock,
{
    fn stamp(&self, acting_user: &UserId) -> AuditStamp {
        AuditStamp {
            by: *acting_user,
            at: self.clock.now().timestamp_millis(),
        }
    }

    async fn populate_reference(&self, reference: Option<UserRef>) -> Result<Option<UserRef>, Error> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let id = reference.user_id();
        let found = with_deadline(self.deadline, self.users.find_by_id(&id))
            .await?
            .map_err(map_user_repository_error)?;
        // A dangling reference degrades to null rather than failing the page.
        Ok(found.map(|user| UserRef::Populated(UserSummary::from(&user))))
    }

    fn default_projection(garage: &Garage) -> GarageProjection {
        query::project(garage, &ProjectField::default_set())
    }
}

#[async_trait]
impl<R, U, C> GarageQuery for GarageService<R, U, C>
where
    R: GarageRepository,
    U: UserRepository,
    C: Clock,
{
    async fn list(&self, request: ListGaragesRequest) -> Result<ListGaragesResponse, Error> {
        let plan = query::plan(request.query)?;

        let mut data = with_deadline(self.deadline, self.garages.execute(&plan))
            .await?
            .map_err(map_garage_repository_error)?;

        if !plan.populate().is_empty() {
            for projection in &mut data {
                if plan.populate().contains(&PopulateField::CreatedBy) {
                    projection.created_by =
                        self.populate_reference(projection.created_by.take()).await?;
                }
                if plan.populate().contains(&PopulateField::UpdatedBy) {
                    projection.updated_by =
                        self.populate_reference(projection.updated_by.take()).await?;
                }
            }
        }

        Ok(ListGaragesResponse { data })
    }
}

#[async_trait]
impl<R, U, C> GarageCommand for GarageService<R, U, C>
where
    R: GarageRepository,
    U: UserRepository,
    C: Clock,
{
    async fn create(&self, request: CreateGarageRequest) -> Result<CreateGarageResponse, Error> {
        let CreateGarageRequest { input, acting_user } = request;
        let created_date = self.clock.now().timestamp_millis();
        let garage = Garage::create(Uuid::new_v4(), input, acting_user, created_date);

        let stored = with_deadline(self.deadline, self.garages.insert(garage))
            .await?
            .map_err(map_garage_repository_error)?;

        Ok(CreateGarageResponse {
            garage: Self::default_projection(&stored),
        })
    }

    async fn update(&self, request: UpdateGarageRequest) -> Result<UpdateGarageResponse, Error> {
        request
            .patch
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let stamp = self.stamp(&request.acting_user);

        let updated = with_deadline(
            self.deadline,
            self.garages
                .update_one(request.garage_id, request.patch, stamp),
        )
        .await?
        .map_err(map_garage_repository_error)?
        .ok_or_else(|| garage_not_found(request.garage_id))?;

        Ok(UpdateGarageResponse {
            garage: Self::default_projection(&updated),
        })
    }

    async fn add_services(
        &self,
        request: AddServicesRequest,
    ) -> Result<AddServicesResponse, Error> {
        let stamp = self.stamp(&request.acting_user);
        let services = request
            .services
            .into_iter()
            .map(|input| input.into_service(Uuid::new_v4()))
            .collect();

        let services = with_deadline(
            self.deadline,
            self.garages
                .add_services(request.garage_id, services, stamp),
        )
        .await?
        .map_err(map_garage_repository_error)?
        .ok_or_else(|| garage_not_found(request.garage_id))?;

        Ok(AddServicesResponse { services })
    }

    async fn remove_services(
        &self,
        request: RemoveServicesRequest,
    ) -> Result<RemoveServicesResponse, Error> {
        let stamp = self.stamp(&request.acting_user);

        let removal = with_deadline(
            self.deadline,
            self.garages
                .remove_services(request.garage_id, request.service_ids, stamp),
        )
        .await?
        .map_err(map_garage_repository_error)?
        .ok_or_else(|| garage_not_found(request.garage_id))?;

        Ok(RemoveServicesResponse {
            services: removal.services,
            removed: removal.removed,
        })
    }

    async fn delete(&self, request: DeleteGarageRequest) -> Result<DeleteGarageResponse, Error> {
        let stamp = self.stamp(&request.acting_user);

        let deleted = with_deadline(
            self.deadline,
            self.garages.soft_delete(request.garage_id, stamp),
        )
        .await?
        .map_err(map_garage_repository_error)?;

        Ok(DeleteGarageResponse { deleted })
    }
}

#[cfg(test)]
#[path = "garage_service_tests.rs"]
mod tests;
