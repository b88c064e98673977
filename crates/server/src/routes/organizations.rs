use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::enums::BusinessType;
use models::Organization;
use service::organization_service::{self, CreateOrganization, OrganizationFilter, UpdateOrganization};
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
    pub business_type: Option<BusinessType>,
    pub search: Option<String>,
}

#[utoipa::path(
    post, path = "/organizations", tag = "organizations",
    request_body = CreateOrganization,
    responses(
        (status = 201, description = "Created", body = Organization),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 409, description = "Slug already in use", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateOrganization>,
) -> Result<(StatusCode, Json<Organization>), JsonApiError> {
    let org = organization_service::create_organization(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(org)))
}

#[utoipa::path(
    get, path = "/organizations", tag = "organizations",
    params(ListQuery),
    responses((status = 200, description = "List OK", body = service::pagination::OrganizationPage))
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Page<Organization>>, JsonApiError> {
    let filter = OrganizationFilter {
        include_inactive: q.include_inactive,
        business_type: q.business_type,
        search: q.search,
    };
    let page = organization_service::list_organizations(&state.db, filter, pagination(q.page, q.per_page)).await?;
    info!(count = page.items.len(), total = page.total, "list organizations");
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/organizations/{orgId}", tag = "organizations",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "OK", body = Organization),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Organization>, JsonApiError> {
    Ok(Json(organization_service::get_organization(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/organizations/slug/{slug}", tag = "organizations",
    params(("slug" = String, Path, description = "Organization slug")),
    responses(
        (status = 200, description = "OK", body = Organization),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Organization>, JsonApiError> {
    Ok(Json(organization_service::get_organization_by_slug(&state.db, &slug).await?))
}

#[utoipa::path(
    patch, path = "/organizations/{orgId}", tag = "organizations",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    request_body = UpdateOrganization,
    responses(
        (status = 200, description = "Updated", body = Organization),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 409, description = "Slug already in use", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UpdateOrganization>,
) -> Result<Json<Organization>, JsonApiError> {
    Ok(Json(organization_service::update_organization(&state.db, id, patch).await?))
}

/// Soft delete; returns the deactivated organization.
#[utoipa::path(
    delete, path = "/organizations/{orgId}", tag = "organizations",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Deactivated", body = Organization),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Organization>, JsonApiError> {
    Ok(Json(organization_service::soft_delete_organization(&state.db, id).await?))
}
