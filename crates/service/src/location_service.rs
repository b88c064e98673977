use chrono::Utc;
use common::serde_ext::double_option;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::errors::ModelError;
use models::validation::{validate_name, validate_text, validate_timezone};
use models::{location, offering, resource};

use crate::errors::ServiceError;
use crate::fields::{nullable, optional};
use crate::organization_service::{find_active_organization, find_organization};
use crate::pagination::{fetch_page, Page, Pagination};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Defaults to `US`.
    pub country: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub postal_code: Option<Option<String>>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub timezone: Option<Option<String>>,
    pub is_primary: Option<bool>,
    /// Only `true` is accepted; deactivate with DELETE.
    pub is_active: Option<bool>,
}

fn short_text(field: &'static str) -> impl Fn(&str) -> Result<String, ModelError> {
    move |v| validate_text(field, v, 64)
}

fn validate_address(v: &str) -> Result<String, ModelError> {
    validate_text("address", v, 255)
}

/// Location of `organization_id`, active or not.
pub async fn find_location<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> Result<location::Model, ServiceError> {
    location::Entity::find_by_id(id)
        .filter(location::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("location"))
}

/// A location that resources and services of `organization_id` may reference.
pub async fn find_usable_location<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> Result<location::Model, ServiceError> {
    match location::Entity::find_by_id(id).one(db).await? {
        Some(loc) if loc.is_usable_by(organization_id) => Ok(loc),
        _ => Err(ServiceError::not_found("location")),
    }
}

async fn demote_other_primaries<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    keep: Uuid,
    now: DateTimeWithTimeZone,
) -> Result<u64, DbErr> {
    let res = location::Entity::update_many()
        .col_expr(location::Column::IsPrimary, Expr::value(false))
        .col_expr(location::Column::UpdatedAt, Expr::value(now))
        .filter(location::Column::OrganizationId.eq(organization_id))
        .filter(location::Column::Id.ne(keep))
        .filter(location::Column::IsPrimary.eq(true))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Create a location. The first active location of an organization is
/// always primary.
#[instrument(skip(db, input))]
pub async fn create_location(
    db: &DatabaseConnection,
    organization_id: Uuid,
    input: CreateLocation,
) -> Result<location::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let name = validate_name("name", &input.name)?;
    let address = validate_address(&input.address)?;
    let city = validate_text("city", &input.city, 128)?;
    let state = optional(input.state.as_deref(), short_text("state"))?;
    let postal_code = optional(input.postal_code.as_deref(), |v| validate_text("postalCode", v, 16))?;
    let country = optional(input.country.as_deref(), short_text("country"))?
        .unwrap_or_else(|| location::DEFAULT_COUNTRY.to_string());
    let phone = optional(input.phone.as_deref(), |v| validate_text("phone", v, 32))?;
    let timezone = optional(input.timezone.as_deref(), validate_timezone)?;

    let txn = db.begin().await?;
    let active = location::Entity::find()
        .filter(location::Column::OrganizationId.eq(organization_id))
        .filter(location::Column::IsActive.eq(true))
        .count(&txn)
        .await?;
    let is_primary = input.is_primary.unwrap_or(false) || active == 0;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let id = Uuid::new_v4();
    // demote before insert; idx_location_single_primary rejects two primaries
    if is_primary {
        demote_other_primaries(&txn, organization_id, id, now).await?;
    }
    let loc = location::ActiveModel {
        id: Set(id),
        organization_id: Set(organization_id),
        name: Set(name),
        address: Set(address),
        city: Set(city),
        state: Set(state),
        postal_code: Set(postal_code),
        country: Set(country),
        phone: Set(phone),
        timezone: Set(timezone),
        is_primary: Set(is_primary),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(event = "location_created", organization_id = %organization_id, location_id = %loc.id, is_primary, "location created");
    Ok(loc)
}

#[instrument(skip(db))]
pub async fn list_locations(
    db: &DatabaseConnection,
    organization_id: Uuid,
    include_inactive: bool,
    opts: Pagination,
) -> Result<Page<location::Model>, ServiceError> {
    find_organization(db, organization_id).await?;
    let mut q = location::Entity::find().filter(location::Column::OrganizationId.eq(organization_id));
    if !include_inactive {
        q = q.filter(location::Column::IsActive.eq(true));
    }
    let q = q.order_by_asc(location::Column::CreatedAt).order_by_asc(location::Column::Id);
    Ok(fetch_page(db, q, opts).await?)
}

pub async fn get_location(db: &DatabaseConnection, organization_id: Uuid, id: Uuid) -> Result<location::Model, ServiceError> {
    find_location(db, organization_id, id).await
}

#[instrument(skip(db, patch))]
pub async fn update_location(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
    patch: UpdateLocation,
) -> Result<location::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let existing = find_location(db, organization_id, id).await?;
    if patch.is_active == Some(false) {
        return Err(ServiceError::Validation("use DELETE to deactivate a location".into()));
    }
    let will_be_active = existing.is_active || patch.is_active == Some(true);
    if patch.is_primary == Some(true) && !will_be_active {
        return Err(ServiceError::Validation("an inactive location cannot be primary".into()));
    }

    let mut am: location::ActiveModel = existing.clone().into();
    if let Some(v) = patch.name.as_deref() {
        am.name = Set(validate_name("name", v)?);
    }
    if let Some(v) = patch.address.as_deref() {
        am.address = Set(validate_address(v)?);
    }
    if let Some(v) = patch.city.as_deref() {
        am.city = Set(validate_text("city", v, 128)?);
    }
    if let Some(v) = nullable(patch.state, short_text("state"))? {
        am.state = Set(v);
    }
    if let Some(v) = nullable(patch.postal_code, |v| validate_text("postalCode", v, 16))? {
        am.postal_code = Set(v);
    }
    if let Some(v) = patch.country.as_deref() {
        am.country = Set(short_text("country")(v)?);
    }
    if let Some(v) = nullable(patch.phone, |v| validate_text("phone", v, 32))? {
        am.phone = Set(v);
    }
    if let Some(v) = nullable(patch.timezone, validate_timezone)? {
        am.timezone = Set(v);
    }
    if patch.is_active == Some(true) {
        am.is_active = Set(true);
    }
    if let Some(p) = patch.is_primary {
        am.is_primary = Set(p);
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    am.updated_at = Set(now);

    let txn = db.begin().await?;
    if patch.is_primary == Some(true) {
        let demoted = demote_other_primaries(&txn, organization_id, id, now).await?;
        info!(event = "primary_location_changed", organization_id = %organization_id, location_id = %id, demoted, "primary location changed");
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;

    info!(event = "location_updated", organization_id = %organization_id, location_id = %id, "location updated");
    Ok(updated)
}

/// Soft delete: the location loses its primary flag and the resources and
/// services bound to it are deactivated.
#[instrument(skip(db))]
pub async fn soft_delete_location(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
) -> Result<location::Model, ServiceError> {
    let existing = find_location(db, organization_id, id).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();

    let txn = db.begin().await?;
    let resources = resource::Entity::update_many()
        .col_expr(resource::Column::IsActive, Expr::value(false))
        .col_expr(resource::Column::UpdatedAt, Expr::value(now))
        .filter(resource::Column::LocationId.eq(id))
        .filter(resource::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let offerings = offering::Entity::update_many()
        .col_expr(offering::Column::IsActive, Expr::value(false))
        .col_expr(offering::Column::UpdatedAt, Expr::value(now))
        .filter(offering::Column::LocationId.eq(id))
        .filter(offering::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let mut am: location::ActiveModel = existing.into();
    am.is_active = Set(false);
    am.is_primary = Set(false);
    am.updated_at = Set(now);
    let loc = am.update(&txn).await?;
    txn.commit().await?;

    info!(
        event = "location_deactivated",
        organization_id = %organization_id,
        location_id = %id,
        resources = resources.rows_affected,
        services = offerings.rows_affected,
        "location soft-deleted"
    );
    Ok(loc)
}
