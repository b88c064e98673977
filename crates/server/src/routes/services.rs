//! `/services`: bookable offerings of an organization.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::enums::ServiceType;
use models::Service;
use service::offering_service::{self, CreateOffering, OfferingFilter, UpdateOffering};
use service::pagination::Page;

use crate::errors::{ErrorBody, JsonApiError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::pagination;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub include_inactive: bool,
    pub location_id: Option<Uuid>,
    pub service_type: Option<ServiceType>,
}

#[utoipa::path(
    post, path = "/organizations/{orgId}/services", tag = "services",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    request_body = CreateOffering,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Organization or location not found", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<CreateOffering>,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let svc = offering_service::create_offering(&state.db, org_id, input).await?;
    Ok((StatusCode::CREATED, Json(svc)))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/services", tag = "services",
    params(("orgId" = Uuid, Path, description = "Organization ID"), ListQuery),
    responses(
        (status = 200, description = "List OK", body = service::pagination::ServicePage),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Page<Service>>, JsonApiError> {
    let filter = OfferingFilter {
        location_id: q.location_id,
        service_type: q.service_type,
        include_inactive: q.include_inactive,
    };
    let page = offering_service::list_offerings(&state.db, org_id, filter, pagination(q.page, q.per_page)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/services/{id}", tag = "services",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "OK", body = Service),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(offering_service::get_offering(&state.db, org_id, id).await?))
}

#[utoipa::path(
    patch, path = "/organizations/{orgId}/services/{id}", tag = "services",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Service ID")
    ),
    request_body = UpdateOffering,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<UpdateOffering>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(offering_service::update_offering(&state.db, org_id, id, patch).await?))
}

#[utoipa::path(
    delete, path = "/organizations/{orgId}/services/{id}", tag = "services",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Deactivated", body = Service),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(offering_service::soft_delete_offering(&state.db, org_id, id).await?))
}
