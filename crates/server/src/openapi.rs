use utoipa::OpenApi;
use utoipa::ToSchema;

use models::enums::{BusinessType, ResourceType, ServiceType, SubscriptionTier, Weekday};
use models::organization_settings::BusinessHours;
use models::{Location, Organization, OrganizationSettings, Resource, Service};
use service::location_service::{CreateLocation, UpdateLocation};
use service::offering_service::{CreateOffering, UpdateOffering};
use service::organization_service::{CreateOrganization, UpdateOrganization};
use service::pagination::{LocationPage, OrganizationPage, ResourcePage, ServicePage};
use service::resource_service::{CreateResource, UpdateResource};
use service::settings_service::UpsertSettings;

use crate::errors::ErrorBody;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::organizations::create,
        crate::routes::organizations::list,
        crate::routes::organizations::get,
        crate::routes::organizations::get_by_slug,
        crate::routes::organizations::update,
        crate::routes::organizations::delete,
        crate::routes::locations::create,
        crate::routes::locations::list,
        crate::routes::locations::get,
        crate::routes::locations::update,
        crate::routes::locations::delete,
        crate::routes::resources::create,
        crate::routes::resources::list,
        crate::routes::resources::get,
        crate::routes::resources::update,
        crate::routes::resources::delete,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::settings::get,
        crate::routes::settings::upsert,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            Organization,
            Location,
            Resource,
            Service,
            OrganizationSettings,
            BusinessHours,
            BusinessType,
            SubscriptionTier,
            ResourceType,
            ServiceType,
            Weekday,
            CreateOrganization,
            UpdateOrganization,
            CreateLocation,
            UpdateLocation,
            CreateResource,
            UpdateResource,
            CreateOffering,
            UpdateOffering,
            UpsertSettings,
            OrganizationPage,
            LocationPage,
            ResourcePage,
            ServicePage,
        )
    ),
    tags(
        (name = "health"),
        (name = "organizations"),
        (name = "locations"),
        (name = "resources"),
        (name = "services"),
        (name = "settings")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for p in [
            "/health",
            "/organizations",
            "/organizations/slug/{slug}",
            "/organizations/{orgId}",
            "/organizations/{orgId}/locations/{id}",
            "/organizations/{orgId}/resources",
            "/organizations/{orgId}/services/{id}",
            "/organizations/{orgId}/settings",
        ] {
            assert!(paths.contains_key(p), "missing {p}");
        }
        assert!(doc["components"]["schemas"]["OrganizationSettings"].is_object());
    }
}
