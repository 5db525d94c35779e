//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

/// Aggregated OpenAPI description of the REST endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::auth::login_social,
        crate::inbound::http::garages::query_garages,
        crate::inbound::http::garages::create_garage,
        crate::inbound::http::garages::update_garage,
        crate::inbound::http::garages::add_services,
        crate::inbound::http::garages::remove_services,
        crate::inbound::http::garages::delete_garage,
    ),
    components(schemas(
        crate::domain::error::Error,
        crate::domain::error::ErrorCode,
        crate::domain::garage::Coordinates,
        crate::domain::garage::Location,
        crate::domain::garage::Service,
        crate::domain::query::GarageProjection,
        crate::domain::query::UserRef,
        crate::domain::user::User,
        crate::domain::user::UserId,
        crate::domain::user::UserSummary,
        crate::inbound::http::auth::SocialLoginBody,
        crate::inbound::http::auth::SocialLoginResponseBody,
        crate::inbound::http::garages::AddServicesBody,
        crate::inbound::http::garages::CoordinatesBody,
        crate::inbound::http::garages::CreateGarageBody,
        crate::inbound::http::garages::DeleteGarageResponseBody,
        crate::inbound::http::garages::GarageResponseBody,
        crate::inbound::http::garages::ListGaragesResponseBody,
        crate::inbound::http::garages::LocationBody,
        crate::inbound::http::garages::QueryGaragesBody,
        crate::inbound::http::garages::RemoveServicesBody,
        crate::inbound::http::garages::RemoveServicesResponseBody,
        crate::inbound::http::garages::ServiceBody,
        crate::inbound::http::garages::ServicesResponseBody,
        crate::inbound::http::garages::UpdateGarageBody,
    )),
    tags(
        (name = "auth", description = "Social login and session bootstrap"),
        (name = "garages", description = "Garage records and embedded services")
    )
)]
pub struct ApiDoc;
