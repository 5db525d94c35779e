//! Garage HTTP handlers.
//!
//! ```text
//! POST   /api/v1/garages/query
//! POST   /api/v1/garages
//! PUT    /api/v1/garages/{garageId}
//! POST   /api/v1/garages/{garageId}/services
//! DELETE /api/v1/garages/{garageId}/services
//! DELETE /api/v1/garages/{garageId}
//! ```
//!
//! Request bodies are parsed by pure validation functions into the domain's
//! closed types before any use-case runs; unknown sort or projection field
//! names fail here with a structured validation error.

use std::collections::BTreeSet;
use std::str::FromStr;

use actix_web::{delete, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::garage::{
    Coordinates, GarageInput, GaragePatch, Location, Service, ServiceInput,
};
use crate::domain::ports::{
    AddServicesRequest, CreateGarageRequest, DeleteGarageRequest, GarageCommand, GarageQuery,
    ListGaragesRequest, RemoveServicesRequest, UpdateGarageRequest,
};
use crate::domain::query::{
    GarageFilters, GarageProjection, ListQuery, PopulateField, ProjectField, SortField,
    SortOrder, SortSpec,
};
use crate::domain::user::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_uuid, parse_uuid_list,
};

/// Request payload for listing garages.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryGaragesBody {
    pub limit: Option<u32>,
    pub last_id: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub code: Option<i64>,
    pub name: Option<String>,
    pub created_by: Option<String>,
    pub fields: Option<Vec<String>>,
    pub populate: Option<Vec<String>>,
}

/// Coordinates payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatesBody {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationBody {
    pub place_id: String,
    pub coordinates: CoordinatesBody,
}

/// Request payload for creating a garage.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGarageBody {
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: LocationBody,
}

/// Request payload for patching a garage.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGarageBody {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Option<LocationBody>,
}

/// One service in an add-services payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBody {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

/// Request payload for appending services to a garage.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddServicesBody {
    pub services: Vec<ServiceBody>,
}

/// Request payload for removing services from a garage.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveServicesBody {
    pub service_ids: Vec<String>,
}

/// Response payload carrying one page of garages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListGaragesResponseBody {
    pub data: Vec<GarageProjection>,
}

/// Response payload carrying a single garage.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GarageResponseBody {
    pub data: GarageProjection,
}

/// Response payload carrying a garage's services list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServicesResponseBody {
    pub data: Vec<Service>,
}

/// Response payload for service removal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RemoveServicesResponseBody {
    pub data: Vec<Service>,
    #[schema(value_type = Vec<String>)]
    pub removed: Vec<Uuid>,
}

/// Response payload for garage deletion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteGarageResponseBody {
    pub success: bool,
}

fn parse_sort_field(raw: &str) -> Result<SortField, Error> {
    SortField::from_str(raw).map_err(|()| {
        invalid_value_error(
            FieldName::new("sortField"),
            raw,
            "invalid_sort_field",
            "sortField must be one of code, name, createdDate, updatedDate",
        )
    })
}

fn parse_sort_order(raw: &str) -> Result<SortOrder, Error> {
    SortOrder::from_str(raw).map_err(|()| {
        invalid_value_error(
            FieldName::new("sortOrder"),
            raw,
            "invalid_sort_order",
            "sortOrder must be asc or desc",
        )
    })
}

fn parse_project_fields(raw_fields: Vec<String>) -> Result<BTreeSet<ProjectField>, Error> {
    let mut fields = BTreeSet::new();
    for raw in raw_fields {
        let field = ProjectField::from_str(&raw).map_err(|()| {
            invalid_value_error(
                FieldName::new("fields"),
                &raw,
                "invalid_projection_field",
                format!("{raw} is not a projectable field"),
            )
        })?;
        fields.insert(field);
    }
    Ok(fields)
}

fn parse_populate_fields(raw_fields: Vec<String>) -> Result<BTreeSet<PopulateField>, Error> {
    let mut fields = BTreeSet::new();
    for raw in raw_fields {
        let field = PopulateField::from_str(&raw).map_err(|()| {
            invalid_value_error(
                FieldName::new("populate"),
                &raw,
                "invalid_populate_field",
                format!("{raw} is not a populatable reference"),
            )
        })?;
        fields.insert(field);
    }
    Ok(fields)
}

fn parse_list_query(body: QueryGaragesBody) -> Result<ListQuery, Error> {
    let last_id = body
        .last_id
        .map(|raw| parse_uuid(raw, FieldName::new("lastId")))
        .transpose()?;
    let created_by = body
        .created_by
        .map(|raw| parse_uuid(raw, FieldName::new("createdBy")))
        .transpose()?
        .map(UserId::from);

    let sort_field = match body.sort_field.as_deref() {
        Some(raw) => parse_sort_field(raw)?,
        None => SortField::CreatedDate,
    };
    let sort_order = match body.sort_order.as_deref() {
        Some(raw) => parse_sort_order(raw)?,
        None => SortOrder::Desc,
    };

    Ok(ListQuery {
        filters: GarageFilters {
            code: body.code,
            name: body.name,
            created_by,
        },
        limit: body.limit,
        last_id,
        sort_by: vec![SortSpec {
            field: sort_field,
            order: sort_order,
        }],
        fields: body.fields.map(parse_project_fields).transpose()?.unwrap_or_default(),
        populate: body
            .populate
            .map(parse_populate_fields)
            .transpose()?
            .unwrap_or_default(),
    })
}

fn map_validation(err: crate::domain::garage::GarageValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn parse_location(body: LocationBody) -> Result<Location, Error> {
    let coordinates = Coordinates::new(body.coordinates.latitude, body.coordinates.longitude)
        .map_err(map_validation)?;
    Location::new(body.place_id, coordinates).map_err(map_validation)
}

fn parse_garage_input(body: CreateGarageBody) -> Result<GarageInput, Error> {
    let location = parse_location(body.location)?;
    GarageInput::new(body.code, body.name, body.description, body.address, location)
        .map_err(map_validation)
}

fn parse_garage_patch(body: UpdateGarageBody) -> Result<GaragePatch, Error> {
    let patch = GaragePatch {
        code: body.code,
        name: body.name,
        description: body.description,
        address: body.address,
        location: body.location.map(parse_location).transpose()?,
    };
    patch.validate().map_err(map_validation)?;
    Ok(patch)
}

fn parse_services(bodies: Vec<ServiceBody>) -> Result<Vec<ServiceInput>, Error> {
    bodies
        .into_iter()
        .map(|body| {
            ServiceInput::new(body.name, body.price, body.description).map_err(map_validation)
        })
        .collect()
}

/// List garages by declarative query.
#[utoipa::path(
    post,
    path = "/api/v1/garages/query",
    request_body = QueryGaragesBody,
    responses(
        (status = 200, description = "One page of garages", body = ListGaragesResponseBody),
        (status = 400, description = "Invalid query or stale cursor", body = Error)
    ),
    tags = ["garages"],
    operation_id = "listGarages"
)]
#[post("/garages/query")]
pub async fn query_garages(
    state: web::Data<HttpState>,
    payload: web::Json<QueryGaragesBody>,
) -> ApiResult<web::Json<ListGaragesResponseBody>> {
    let query = parse_list_query(payload.into_inner())?;
    let response = state
        .garages_query
        .list(ListGaragesRequest { query })
        .await?;
    Ok(web::Json(ListGaragesResponseBody {
        data: response.data,
    }))
}

/// Create a garage owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/garages",
    request_body = CreateGarageBody,
    responses(
        (status = 200, description = "Garage created", body = GarageResponseBody),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid session", body = Error)
    ),
    tags = ["garages"],
    operation_id = "createGarage"
)]
#[post("/garages")]
pub async fn create_garage(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGarageBody>,
) -> ApiResult<web::Json<GarageResponseBody>> {
    let input = parse_garage_input(payload.into_inner())?;
    let response = state
        .garages
        .create(CreateGarageRequest {
            input,
            acting_user: session.user_id(),
        })
        .await?;
    Ok(web::Json(GarageResponseBody {
        data: response.garage,
    }))
}

/// Patch a garage by id.
#[utoipa::path(
    put,
    path = "/api/v1/garages/{garageId}",
    request_body = UpdateGarageBody,
    params(("garageId" = String, Path, description = "Garage identifier")),
    responses(
        (status = 200, description = "Garage updated", body = GarageResponseBody),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid session", body = Error),
        (status = 404, description = "Garage absent or deleted", body = Error)
    ),
    tags = ["garages"],
    operation_id = "updateGarage"
)]
#[put("/garages/{garageId}")]
pub async fn update_garage(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateGarageBody>,
) -> ApiResult<web::Json<GarageResponseBody>> {
    let garage_id = parse_uuid(path.into_inner(), FieldName::new("garageId"))?;
    let patch = parse_garage_patch(payload.into_inner())?;
    let response = state
        .garages
        .update(UpdateGarageRequest {
            garage_id,
            patch,
            acting_user: session.user_id(),
        })
        .await?;
    Ok(web::Json(GarageResponseBody {
        data: response.garage,
    }))
}

/// Append services to a garage.
#[utoipa::path(
    post,
    path = "/api/v1/garages/{garageId}/services",
    request_body = AddServicesBody,
    params(("garageId" = String, Path, description = "Garage identifier")),
    responses(
        (status = 200, description = "Services appended", body = ServicesResponseBody),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid session", body = Error),
        (status = 404, description = "Garage absent or deleted", body = Error)
    ),
    tags = ["garages"],
    operation_id = "addServices"
)]
#[post("/garages/{garageId}/services")]
pub async fn add_services(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AddServicesBody>,
) -> ApiResult<web::Json<ServicesResponseBody>> {
    let garage_id = parse_uuid(path.into_inner(), FieldName::new("garageId"))?;
    let services = parse_services(payload.into_inner().services)?;
    let response = state
        .garages
        .add_services(AddServicesRequest {
            garage_id,
            services,
            acting_user: session.user_id(),
        })
        .await?;
    Ok(web::Json(ServicesResponseBody {
        data: response.services,
    }))
}

/// Remove services from a garage by id.
#[utoipa::path(
    delete,
    path = "/api/v1/garages/{garageId}/services",
    request_body = RemoveServicesBody,
    params(("garageId" = String, Path, description = "Garage identifier")),
    responses(
        (status = 200, description = "Services removed", body = RemoveServicesResponseBody),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid session", body = Error),
        (status = 404, description = "Garage absent or deleted", body = Error)
    ),
    tags = ["garages"],
    operation_id = "removeServices"
)]
#[delete("/garages/{garageId}/services")]
pub async fn remove_services(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RemoveServicesBody>,
) -> ApiResult<web::Json<RemoveServicesResponseBody>> {
    let garage_id = parse_uuid(path.into_inner(), FieldName::new("garageId"))?;
    let service_ids = parse_uuid_list(
        payload.into_inner().service_ids,
        FieldName::new("serviceIds"),
    )?;
    let response = state
        .garages
        .remove_services(RemoveServicesRequest {
            garage_id,
            service_ids,
            acting_user: session.user_id(),
        })
        .await?;
    Ok(web::Json(RemoveServicesResponseBody {
        data: response.services,
        removed: response.removed,
    }))
}

/// Soft-delete a garage.
#[utoipa::path(
    delete,
    path = "/api/v1/garages/{garageId}",
    params(("garageId" = String, Path, description = "Garage identifier")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteGarageResponseBody),
        (status = 401, description = "Missing or invalid session", body = Error)
    ),
    tags = ["garages"],
    operation_id = "deleteGarage"
)]
#[delete("/garages/{garageId}")]
pub async fn delete_garage(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteGarageResponseBody>> {
    let garage_id = parse_uuid(path.into_inner(), FieldName::new("garageId"))?;
    let response = state
        .garages
        .delete(DeleteGarageRequest {
            garage_id,
            acting_user: session.user_id(),
        })
        .await?;
    Ok(web::Json(DeleteGarageResponseBody {
        success: response.deleted,
    }))
}

#[cfg(test)]
#[path = "garages_tests.rs"]
mod tests;
