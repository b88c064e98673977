use chrono::Utc;
use common::serde_ext::double_option;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::enums::ResourceType;
use models::resource;
use models::validation::{validate_capacity, validate_name, validate_text};

use crate::errors::ServiceError;
use crate::fields::{nullable, optional};
use crate::location_service::find_usable_location;
use crate::organization_service::{find_active_organization, find_organization};
use crate::pagination::{fetch_page, Page, Pagination};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    pub name: String,
    pub description: Option<String>,
    pub resource_type: ResourceType,
    /// Defaults to 1.
    pub capacity: Option<i32>,
    pub location_id: Option<Uuid>,
    pub is_bookable: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResource {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub resource_type: Option<ResourceType>,
    pub capacity: Option<i32>,
    /// `null` detaches the resource from its location.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub location_id: Option<Option<Uuid>>,
    pub is_bookable: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub location_id: Option<Uuid>,
    pub resource_type: Option<ResourceType>,
    pub include_inactive: bool,
}

fn validate_description(v: &str) -> Result<String, models::errors::ModelError> {
    validate_text("description", v, 2000)
}

async fn find_resource(db: &DatabaseConnection, organization_id: Uuid, id: Uuid) -> Result<resource::Model, ServiceError> {
    resource::Entity::find_by_id(id)
        .filter(resource::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("resource"))
}

#[instrument(skip(db, input))]
pub async fn create_resource(
    db: &DatabaseConnection,
    organization_id: Uuid,
    input: CreateResource,
) -> Result<resource::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let name = validate_name("name", &input.name)?;
    let description = optional(input.description.as_deref(), validate_description)?;
    let capacity = validate_capacity(input.capacity.unwrap_or(1))?;
    if let Some(loc) = input.location_id {
        find_usable_location(db, organization_id, loc).await?;
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = resource::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        location_id: Set(input.location_id),
        name: Set(name),
        description: Set(description),
        resource_type: Set(input.resource_type),
        capacity: Set(capacity),
        is_bookable: Set(input.is_bookable.unwrap_or(true)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(event = "resource_created", organization_id = %organization_id, resource_id = %res.id, "resource created");
    Ok(res)
}

#[instrument(skip(db))]
pub async fn list_resources(
    db: &DatabaseConnection,
    organization_id: Uuid,
    filter: ResourceFilter,
    opts: Pagination,
) -> Result<Page<resource::Model>, ServiceError> {
    find_organization(db, organization_id).await?;
    let mut q = resource::Entity::find().filter(resource::Column::OrganizationId.eq(organization_id));
    if !filter.include_inactive {
        q = q.filter(resource::Column::IsActive.eq(true));
    }
    if let Some(loc) = filter.location_id {
        q = q.filter(resource::Column::LocationId.eq(loc));
    }
    if let Some(rt) = filter.resource_type {
        q = q.filter(resource::Column::ResourceType.eq(rt));
    }
    let q = q.order_by_asc(resource::Column::CreatedAt).order_by_asc(resource::Column::Id);
    Ok(fetch_page(db, q, opts).await?)
}

pub async fn get_resource(db: &DatabaseConnection, organization_id: Uuid, id: Uuid) -> Result<resource::Model, ServiceError> {
    find_resource(db, organization_id, id).await
}

#[instrument(skip(db, patch))]
pub async fn update_resource(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
    patch: UpdateResource,
) -> Result<resource::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let existing = find_resource(db, organization_id, id).await?;
    if patch.is_active == Some(false) {
        return Err(ServiceError::Validation("use DELETE to deactivate a resource".into()));
    }

    let mut am: resource::ActiveModel = existing.clone().into();
    if let Some(v) = patch.name.as_deref() {
        am.name = Set(validate_name("name", v)?);
    }
    if let Some(v) = nullable(patch.description, validate_description)? {
        am.description = Set(v);
    }
    if let Some(rt) = patch.resource_type {
        am.resource_type = Set(rt);
    }
    if let Some(c) = patch.capacity {
        am.capacity = Set(validate_capacity(c)?);
    }
    match patch.location_id {
        Some(Some(loc)) if existing.location_id != Some(loc) => {
            find_usable_location(db, organization_id, loc).await?;
            am.location_id = Set(Some(loc));
        }
        Some(None) => am.location_id = Set(None),
        _ => {}
    }
    if let Some(b) = patch.is_bookable {
        am.is_bookable = Set(b);
    }
    if patch.is_active == Some(true) {
        am.is_active = Set(true);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(event = "resource_updated", organization_id = %organization_id, resource_id = %id, "resource updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn soft_delete_resource(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
) -> Result<resource::Model, ServiceError> {
    let existing = find_resource(db, organization_id, id).await?;
    let mut am: resource::ActiveModel = existing.into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let res = am.update(db).await?;
    info!(event = "resource_deactivated", organization_id = %organization_id, resource_id = %id, "resource soft-deleted");
    Ok(res)
}
