//! List-query planning for the garage collection.
//!
//! A [`ListQuery`] is the declarative request shape produced by inbound
//! adapters; [`plan`] normalises it into an executable [`QueryPlan`]. Sort
//! and projection fields are closed enumerations validated at request-parse
//! time, so a plan can never reference a field the entity does not have, and
//! the soft-delete flag is not expressible in either — the read path excludes
//! deleted documents by construction.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::garage::{Garage, Location, Service};
use crate::domain::user::{UserId, UserSummary};

/// Page size applied when the caller omits a limit or sends a non-positive one.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Hard ceiling a caller-supplied limit is clamped to.
pub const MAX_PAGE_SIZE: usize = 100;

/// Sortable garage fields, each with fixed comparison semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Numeric comparison.
    Code,
    /// Lexicographic comparison.
    Name,
    /// Timestamp comparison.
    CreatedDate,
    /// Timestamp comparison; never-updated documents order first ascending.
    UpdatedDate,
}

impl SortField {
    fn compare(self, a: &Garage, b: &Garage) -> Ordering {
        match self {
            Self::Code => a.code().cmp(&b.code()),
            Self::Name => a.name().cmp(b.name()),
            Self::CreatedDate => a.created_date().cmp(&b.created_date()),
            Self::UpdatedDate => a.updated_date().cmp(&b.updated_date()),
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "code" => Ok(Self::Code),
            "name" => Ok(Self::Name),
            "createdDate" => Ok(Self::CreatedDate),
            "updatedDate" => Ok(Self::UpdatedDate),
            _ => Err(()),
        }
    }
}

/// Direction applied to a single sort entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// One entry of the ordered sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    fn compare(&self, a: &Garage, b: &Garage) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Garage fields exposed to callers through projection.
///
/// Administrative fields (the soft-delete flag) have no variant here and are
/// therefore never exposed, whatever the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectField {
    Code,
    Name,
    Description,
    Address,
    Location,
    CreatedBy,
    CreatedDate,
    UpdatedBy,
    UpdatedDate,
    Services,
}

impl ProjectField {
    /// The default visible-field set used when a request projects nothing.
    pub fn default_set() -> BTreeSet<Self> {
        BTreeSet::from([
            Self::Code,
            Self::Name,
            Self::Description,
            Self::Address,
            Self::Location,
            Self::CreatedBy,
            Self::CreatedDate,
            Self::UpdatedBy,
            Self::UpdatedDate,
            Self::Services,
        ])
    }
}

impl FromStr for ProjectField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "code" => Ok(Self::Code),
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "address" => Ok(Self::Address),
            "location" => Ok(Self::Location),
            "createdBy" => Ok(Self::CreatedBy),
            "createdDate" => Ok(Self::CreatedDate),
            "updatedBy" => Ok(Self::UpdatedBy),
            "updatedDate" => Ok(Self::UpdatedDate),
            "services" => Ok(Self::Services),
            _ => Err(()),
        }
    }
}

/// Reference fields that may be expanded into embedded sub-documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PopulateField {
    CreatedBy,
    UpdatedBy,
}

impl FromStr for PopulateField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "createdBy" => Ok(Self::CreatedBy),
            "updatedBy" => Ok(Self::UpdatedBy),
            _ => Err(()),
        }
    }
}

/// Conjunctive equality filters over garage fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GarageFilters {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub created_by: Option<UserId>,
}

impl GarageFilters {
    /// Whether every present filter matches the document.
    pub fn matches(&self, garage: &Garage) -> bool {
        if self.code.is_some_and(|code| code != garage.code()) {
            return false;
        }
        if self
            .name
            .as_deref()
            .is_some_and(|name| name != garage.name())
        {
            return false;
        }
        if self
            .created_by
            .as_ref()
            .is_some_and(|user| user != garage.created_by())
        {
            return false;
        }
        true
    }
}

/// Declarative list request assembled by inbound adapters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: GarageFilters,
    /// Requested page size; `None` or zero falls back to the default.
    pub limit: Option<u32>,
    /// Identity of the last item of the previous page.
    pub last_id: Option<Uuid>,
    /// Ordered sort specification; must contain at least one entry.
    pub sort_by: Vec<SortSpec>,
    /// Projection set; empty means the default visible-field set.
    pub fields: BTreeSet<ProjectField>,
    /// Reference fields to expand into sub-documents.
    pub populate: BTreeSet<PopulateField>,
}

/// Executable plan produced by [`plan`].
///
/// Only non-deleted documents are reachable through a plan: neither the
/// filters nor the projection can name the soft-delete flag.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    filters: GarageFilters,
    limit: usize,
    sort: Vec<SortSpec>,
    cursor: Option<Uuid>,
    fields: BTreeSet<ProjectField>,
    populate: BTreeSet<PopulateField>,
}

impl QueryPlan {
    pub fn filters(&self) -> &GarageFilters {
        &self.filters
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    /// Cursor anchor id, when the caller is resuming pagination.
    pub fn cursor(&self) -> Option<Uuid> {
        self.cursor
    }

    pub fn fields(&self) -> &BTreeSet<ProjectField> {
        &self.fields
    }

    pub fn populate(&self) -> &BTreeSet<PopulateField> {
        &self.populate
    }

    /// Total order over garages induced by the sort specification.
    ///
    /// Each entry applies in listed order; document identity breaks the final
    /// tie so the order is total and pagination terminates.
    pub fn compare(&self, a: &Garage, b: &Garage) -> Ordering {
        for spec in &self.sort {
            let ordering = spec.compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.id().cmp(&b.id())
    }

    /// Whether `document` comes strictly after `anchor` in the plan order.
    pub fn is_after_anchor(&self, document: &Garage, anchor: &Garage) -> bool {
        self.compare(document, anchor) == Ordering::Greater
    }
}

/// Build an executable plan from a declarative request.
///
/// # Errors
/// Returns a validation error when the sort specification is empty; unknown
/// sort or projection fields cannot reach this function because the enums are
/// closed at parse time.
pub fn plan(query: ListQuery) -> Result<QueryPlan, Error> {
    if query.sort_by.is_empty() {
        return Err(Error::invalid_request(
            "sortBy must contain at least one entry",
        ));
    }

    let limit = match query.limit {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(requested) => (requested as usize).min(MAX_PAGE_SIZE),
    };

    let fields = if query.fields.is_empty() {
        ProjectField::default_set()
    } else {
        query.fields
    };

    Ok(QueryPlan {
        filters: query.filters,
        limit,
        sort: query.sort_by,
        cursor: query.last_id,
        fields,
        populate: query.populate,
    })
}

/// A user reference field: a bare id, or the populated sub-document.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserRef {
    Id(UserId),
    Populated(UserSummary),
}

impl UserRef {
    /// Bare id of the referenced user, whichever shape is held.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Id(id) => *id,
            Self::Populated(summary) => summary.id,
        }
    }
}

/// Projected garage document returned by the read path.
///
/// Absent fields were not requested; the soft-delete flag is never carried.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GarageProjection {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
}

/// Project a garage document to the requested field set.
pub fn project(garage: &Garage, fields: &BTreeSet<ProjectField>) -> GarageProjection {
    GarageProjection {
        id: garage.id(),
        code: fields
            .contains(&ProjectField::Code)
            .then(|| garage.code()),
        name: fields
            .contains(&ProjectField::Name)
            .then(|| garage.name().to_owned()),
        description: fields
            .contains(&ProjectField::Description)
            .then(|| garage.description().map(str::to_owned))
            .flatten(),
        address: fields
            .contains(&ProjectField::Address)
            .then(|| garage.address().map(str::to_owned))
            .flatten(),
        location: fields
            .contains(&ProjectField::Location)
            .then(|| garage.location().clone()),
        created_by: fields
            .contains(&ProjectField::CreatedBy)
            .then(|| UserRef::Id(*garage.created_by())),
        created_date: fields
            .contains(&ProjectField::CreatedDate)
            .then(|| garage.created_date()),
        updated_by: fields
            .contains(&ProjectField::UpdatedBy)
            .then(|| garage.updated_by().map(|user| UserRef::Id(*user)))
            .flatten(),
        updated_date: fields
            .contains(&ProjectField::UpdatedDate)
            .then(|| garage.updated_date())
            .flatten(),
        services: fields
            .contains(&ProjectField::Services)
            .then(|| garage.services().to_vec()),
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
