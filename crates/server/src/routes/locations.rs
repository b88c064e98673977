use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::Location;
use service::location_service::{self, CreateLocation, UpdateLocation};
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
}

#[utoipa::path(
    post, path = "/organizations/{orgId}/locations", tag = "locations",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Created", body = Location),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Organization not found or inactive", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<CreateLocation>,
) -> Result<(StatusCode, Json<Location>), JsonApiError> {
    let loc = location_service::create_location(&state.db, org_id, input).await?;
    Ok((StatusCode::CREATED, Json(loc)))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/locations", tag = "locations",
    params(("orgId" = Uuid, Path, description = "Organization ID"), ListQuery),
    responses(
        (status = 200, description = "List OK", body = service::pagination::LocationPage),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Page<Location>>, JsonApiError> {
    let page = location_service::list_locations(&state.db, org_id, q.include_inactive, pagination(q.page, q.per_page)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/locations/{id}", tag = "locations",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "OK", body = Location),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Location>, JsonApiError> {
    Ok(Json(location_service::get_location(&state.db, org_id, id).await?))
}

#[utoipa::path(
    patch, path = "/organizations/{orgId}/locations/{id}", tag = "locations",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = UpdateLocation,
    responses(
        (status = 200, description = "Updated", body = Location),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<UpdateLocation>,
) -> Result<Json<Location>, JsonApiError> {
    Ok(Json(location_service::update_location(&state.db, org_id, id, patch).await?))
}

#[utoipa::path(
    delete, path = "/organizations/{orgId}/locations/{id}", tag = "locations",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Deactivated", body = Location),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Location>, JsonApiError> {
    Ok(Json(location_service::soft_delete_location(&state.db, org_id, id).await?))
}
