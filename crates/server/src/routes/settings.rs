use axum::{
    extract::State,
    Json,
};
use uuid::Uuid;

use models::OrganizationSettings;
use service::settings_service::{self, UpsertSettings};

use crate::errors::{ErrorBody, JsonApiError};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/organizations/{orgId}/settings", tag = "settings",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "OK", body = OrganizationSettings),
        (status = 404, description = "Organization or settings not found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
) -> Result<Json<OrganizationSettings>, JsonApiError> {
    Ok(Json(settings_service::get_settings(&state.db, org_id).await?))
}

/// Served for both PUT and PATCH: supplied fields are merged onto the
/// current settings, or onto defaults when none exist yet.
#[utoipa::path(
    put, path = "/organizations/{orgId}/settings", tag = "settings",
    params(("orgId" = Uuid, Path, description = "Organization ID")),
    request_body = UpsertSettings,
    responses(
        (status = 200, description = "Saved", body = OrganizationSettings),
        (status = 400, description = "Validation Error", body = ErrorBody),
        (status = 404, description = "Organization not found", body = ErrorBody)
    )
)]
pub async fn upsert(
    State(state): State<AppState>,
    ApiPath(org_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UpsertSettings>,
) -> Result<Json<OrganizationSettings>, JsonApiError> {
    Ok(Json(settings_service::upsert_settings(&state.db, org_id, patch).await?))
}
