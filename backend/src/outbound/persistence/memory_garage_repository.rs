//! In-memory garage collection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::garage::{AuditStamp, Garage, GaragePatch, Service};
use crate::domain::ports::{GarageRepository, GarageRepositoryError, ServiceRemoval};
use crate::domain::query::{GarageProjection, QueryPlan, project};

/// Garage collection held behind an async read-write lock.
///
/// Each mutation takes the write lock for the whole read-modify-write of one
/// document, which provides the single-document atomicity the domain assumes.
#[derive(Debug, Default)]
pub struct MemoryGarageRepository {
    garages: RwLock<HashMap<Uuid, Garage>>,
}

impl MemoryGarageRepository {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `mutate` against the non-deleted garage with this id.
    ///
    /// Soft-deleted documents are indistinguishable from missing ones here;
    /// that is what makes the deleted state terminal for mutations.
    async fn with_live_garage<T>(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut Garage) -> T,
    ) -> Option<T> {
        let mut garages = self.garages.write().await;
        match garages.get_mut(&id) {
            Some(garage) if !garage.is_deleted() => Some(mutate(garage)),
            _ => None,
        }
    }
}

#[async_trait]
impl GarageRepository for MemoryGarageRepository {
    async fn execute(
        &self,
        plan: &QueryPlan,
    ) -> Result<Vec<GarageProjection>, GarageRepositoryError> {
        let garages = self.garages.read().await;

        let mut matching: Vec<&Garage> = garages
            .values()
            .filter(|garage| !garage.is_deleted() && plan.filters().matches(garage))
            .collect();
        matching.sort_by(|a, b| plan.compare(a, b));

        // The cursor anchor resolves against the same snapshot the page is
        // built from; documents at or before it in the plan order are
        // excluded, so a document is returned once across consecutive pages.
        let skip = match plan.cursor() {
            Some(last_id) => {
                let anchor = garages
                    .get(&last_id)
                    .filter(|garage| !garage.is_deleted())
                    .ok_or(GarageRepositoryError::StaleCursor { last_id })?;
                matching.partition_point(|garage| !plan.is_after_anchor(garage, anchor))
            }
            None => 0,
        };

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(plan.limit())
            .map(|garage| project(garage, plan.fields()))
            .collect())
    }

    async fn insert(&self, garage: Garage) -> Result<Garage, GarageRepositoryError> {
        let mut garages = self.garages.write().await;
        garages.insert(garage.id(), garage.clone());
        Ok(garage)
    }

    async fn update_one(
        &self,
        id: Uuid,
        patch: GaragePatch,
        stamp: AuditStamp,
    ) -> Result<Option<Garage>, GarageRepositoryError> {
        Ok(self
            .with_live_garage(id, |garage| {
                garage.apply_patch(&patch, &stamp);
                garage.clone()
            })
            .await)
    }

    async fn soft_delete(
        &self,
        id: Uuid,
        stamp: AuditStamp,
    ) -> Result<bool, GarageRepositoryError> {
        Ok(self
            .with_live_garage(id, |garage| garage.soft_delete(&stamp))
            .await
            .is_some())
    }

    async fn add_services(
        &self,
        id: Uuid,
        services: Vec<Service>,
        stamp: AuditStamp,
    ) -> Result<Option<Vec<Service>>, GarageRepositoryError> {
        Ok(self
            .with_live_garage(id, |garage| {
                garage.add_services(services, &stamp);
                garage.services().to_vec()
            })
            .await)
    }

    async fn remove_services(
        &self,
        id: Uuid,
        service_ids: Vec<Uuid>,
        stamp: AuditStamp,
    ) -> Result<Option<ServiceRemoval>, GarageRepositoryError> {
        Ok(self
            .with_live_garage(id, |garage| {
                let removed = garage.remove_services(&service_ids, &stamp);
                ServiceRemoval {
                    services: garage.services().to_vec(),
                    removed,
                }
            })
            .await)
    }
}

#[cfg(test)]
#[path = "memory_garage_repository_tests.rs"]
mod tests;
