use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::enums::ResourceType;
use models::Resource;
use service::pagination::Page;
use service::resource_service::{self, CreateResource, ResourceFilter, UpdateResource};

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
    pub resource_type: Option<ResourceType>,
}

#[utoipa::path(
    post, path = "/organizations/{orgId}/resources", tag = "resources",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    request_body = CreateResource,
    responses(
        (status = 201, description = "Created", body = Resource),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Organization or location not found", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<CreateResource>,
) -> Result<(StatusCode, Json<Resource>), JsonApiError> {
    let res = resource_service::create_resource(&state.db, org_id, input).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/resources", tag = "resources",
    params(("orgId" = Uuid, Path, description = "Organization ID"), ListQuery),
    responses(
        (status = 200, description = "List OK", body = service::pagination::ResourcePage),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Page<Resource>>, JsonApiError> {
    let filter = ResourceFilter {
        location_id: q.location_id,
        resource_type: q.resource_type,
        include_inactive: q.include_inactive,
    };
    let page = resource_service::list_resources(&state.db, org_id, filter, pagination(q.page, q.per_page)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}/resources/{id}", tag = "resources",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "OK", body = Resource),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Resource>, JsonApiError> {
    Ok(Json(resource_service::get_resource(&state.db, org_id, id).await?))
}

#[utoipa::path(
    patch, path = "/organizations/{orgId}/resources/{id}", tag = "resources",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    request_body = UpdateResource,
    responses(
        (status = 200, description = "Updated", body = Resource),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(patch): ApiJson<UpdateResource>,
) -> Result<Json<Resource>, JsonApiError> {
    Ok(Json(resource_service::update_resource(&state.db, org_id, id, patch).await?))
}

#[utoipa::path(
    delete, path = "/organizations/{orgId}/resources/{id}", tag = "resources",
    params(
        ("orgId" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Deactivated", body = Resource),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath((org_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Resource>, JsonApiError> {
    Ok(Json(resource_service::soft_delete_resource(&state.db, org_id, id).await?))
}
