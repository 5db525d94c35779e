//! Garage aggregate and its embedded service entities.
//!
//! A garage is the document root: services live inside it and have no
//! independent lifecycle. Deletion is a soft flag; the read path filters it
//! and mutation helpers refuse to touch flagged documents.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Validation errors raised while constructing garage inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum GarageValidationError {
    EmptyName,
    EmptyPlaceId,
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    EmptyServiceName,
    NegativeServicePrice { value: f64 },
}

impl fmt::Display for GarageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPlaceId => write!(f, "location.placeId must not be empty"),
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} must be between -90 and 90")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} must be between -180 and 180")
            }
            Self::EmptyServiceName => write!(f, "service name must not be empty"),
            Self::NegativeServicePrice { value } => {
                write!(f, "service price {value} must not be negative")
            }
        }
    }
}

impl std::error::Error for GarageValidationError {}

/// Geographic point attached to a garage location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validate and construct coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GarageValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GarageValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GarageValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Externally-sourced place reference for a garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Identifier assigned by the external places provider.
    pub place_id: String,
    pub coordinates: Coordinates,
}

impl Location {
    /// Validate and construct a location.
    pub fn new(
        place_id: impl Into<String>,
        coordinates: Coordinates,
    ) -> Result<Self, GarageValidationError> {
        let place_id = place_id.into();
        if place_id.trim().is_empty() {
            return Err(GarageValidationError::EmptyPlaceId);
        }
        Ok(Self {
            place_id,
            coordinates,
        })
    }
}

/// Service entity embedded in its parent garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated payload for adding a service to a garage.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInput {
    name: String,
    price: f64,
    description: Option<String>,
}

impl ServiceInput {
    /// Validate and construct a service payload.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        description: Option<String>,
    ) -> Result<Self, GarageValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GarageValidationError::EmptyServiceName);
        }
        if price < 0.0 {
            return Err(GarageValidationError::NegativeServicePrice { value: price });
        }
        Ok(Self {
            name,
            price,
            description,
        })
    }

    /// Materialise the embedded entity with a fresh identity.
    pub fn into_service(self, id: Uuid) -> Service {
        Service {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
        }
    }
}

/// Validated payload for creating a garage.
#[derive(Debug, Clone, PartialEq)]
pub struct GarageInput {
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Location,
}

impl GarageInput {
    /// Validate and construct a garage creation payload.
    pub fn new(
        code: i64,
        name: impl Into<String>,
        description: Option<String>,
        address: Option<String>,
        location: Location,
    ) -> Result<Self, GarageValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GarageValidationError::EmptyName);
        }
        Ok(Self {
            code,
            name,
            description,
            address,
            location,
        })
    }
}

/// Partial update applied to an existing garage.
///
/// ## Invariants
/// - Fields left as `None` are unchanged; identity, audit-creation fields and
///   the soft-delete flag are not expressible here and therefore immutable.
/// - A present `name` is non-empty (enforced by [`GaragePatch::validate`],
///   which inbound adapters run before any business logic).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaragePatch {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Option<Location>,
}

impl GaragePatch {
    /// Check field-level invariants for a parsed patch.
    pub fn validate(&self) -> Result<(), GarageValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(GarageValidationError::EmptyName);
            }
        }
        Ok(())
    }
}

/// Audit fields written alongside every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditStamp {
    pub by: UserId,
    /// Epoch milliseconds.
    pub at: i64,
}

/// Garage document root.
///
/// ## Invariants
/// - `id`, `created_by` and `created_date` are immutable after creation.
/// - `updated_by`/`updated_date` change together, only through mutations.
/// - Once `is_deleted` is set the document no longer accepts mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct Garage {
    id: Uuid,
    code: i64,
    name: String,
    description: Option<String>,
    address: Option<String>,
    location: Location,
    created_by: UserId,
    /// Epoch milliseconds.
    created_date: i64,
    updated_by: Option<UserId>,
    updated_date: Option<i64>,
    is_deleted: bool,
    services: Vec<Service>,
}

impl Garage {
    /// Create a fresh garage owned by `created_by`.
    pub fn create(id: Uuid, input: GarageInput, created_by: UserId, created_date: i64) -> Self {
        Self {
            id,
            code: input.code,
            name: input.name,
            description: input.description,
            address: input.address,
            location: input.location,
            created_by,
            created_date,
            updated_by: None,
            updated_date: None,
            is_deleted: false,
            services: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_date(&self) -> i64 {
        self.created_date
    }

    pub fn updated_by(&self) -> Option<&UserId> {
        self.updated_by.as_ref()
    }

    pub fn updated_date(&self) -> Option<i64> {
        self.updated_date
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Apply a partial update and stamp the audit fields.
    pub fn apply_patch(&mut self, patch: &GaragePatch, stamp: &AuditStamp) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        self.touch(stamp);
    }

    /// Append embedded services and stamp the audit fields.
    pub fn add_services(&mut self, services: Vec<Service>, stamp: &AuditStamp) {
        self.services.extend(services);
        self.touch(stamp);
    }

    /// Remove embedded services by id, reporting the ids actually removed.
    ///
    /// Ids with no matching service are skipped without error.
    pub fn remove_services(&mut self, service_ids: &[Uuid], stamp: &AuditStamp) -> Vec<Uuid> {
        let removed: Vec<Uuid> = service_ids
            .iter()
            .copied()
            .filter(|id| self.services.iter().any(|service| service.id == *id))
            .collect();
        if !removed.is_empty() {
            self.services.retain(|service| !removed.contains(&service.id));
        }
        self.touch(stamp);
        removed
    }

    /// Flag the document as deleted; the read path hides it from then on.
    pub fn soft_delete(&mut self, stamp: &AuditStamp) {
        self.is_deleted = true;
        self.touch(stamp);
    }

    fn touch(&mut self, stamp: &AuditStamp) {
        self.updated_by = Some(stamp.by);
        self.updated_date = Some(stamp.at);
    }
}
