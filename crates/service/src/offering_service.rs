//! Bookable services (classes, appointments, workshops, personal training).
//!
//! Named `offering` internally so it does not read like the crate itself.

use chrono::Utc;
use common::serde_ext::double_option;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::enums::ServiceType;
use models::offering::{self, validate_duration, validate_price};
use models::validation::{validate_capacity, validate_color, validate_currency, validate_name, validate_text};

use crate::errors::ServiceError;
use crate::fields::{nullable, optional};
use crate::location_service::find_usable_location;
use crate::organization_service::{find_active_organization, find_organization};
use crate::pagination::{fetch_page, Page, Pagination};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOffering {
    pub name: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub duration_minutes: i32,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub requires_approval: Option<bool>,
    pub allow_waitlist: Option<bool>,
    pub color: Option<String>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOffering {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub service_type: Option<ServiceType>,
    pub duration_minutes: Option<i32>,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub requires_approval: Option<bool>,
    pub allow_waitlist: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub location_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferingFilter {
    pub location_id: Option<Uuid>,
    pub service_type: Option<ServiceType>,
    pub include_inactive: bool,
}

fn validate_description(v: &str) -> Result<String, models::errors::ModelError> {
    validate_text("description", v, 2000)
}

fn validate_service_color(v: &str) -> Result<String, models::errors::ModelError> {
    validate_color("color", v)
}

async fn find_offering(db: &DatabaseConnection, organization_id: Uuid, id: Uuid) -> Result<offering::Model, ServiceError> {
    offering::Entity::find_by_id(id)
        .filter(offering::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

#[instrument(skip(db, input))]
pub async fn create_offering(
    db: &DatabaseConnection,
    organization_id: Uuid,
    input: CreateOffering,
) -> Result<offering::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let name = validate_name("name", &input.name)?;
    let description = optional(input.description.as_deref(), validate_description)?;
    let duration = validate_duration(input.duration_minutes)?;
    let capacity = validate_capacity(input.capacity.unwrap_or(1))?;
    let price = validate_price(input.price.unwrap_or(0.0))?;
    let currency = match input.currency.as_deref() {
        Some(c) => validate_currency(c)?,
        None => offering::DEFAULT_CURRENCY.to_string(),
    };
    let color = optional(input.color.as_deref(), validate_service_color)?;
    if let Some(loc) = input.location_id {
        find_usable_location(db, organization_id, loc).await?;
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let svc = offering::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        location_id: Set(input.location_id),
        name: Set(name),
        description: Set(description),
        service_type: Set(input.service_type),
        duration_minutes: Set(duration),
        capacity: Set(capacity),
        price: Set(price),
        currency: Set(currency),
        requires_approval: Set(input.requires_approval.unwrap_or(false)),
        allow_waitlist: Set(input.allow_waitlist.unwrap_or(false)),
        color: Set(color),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(event = "service_created", organization_id = %organization_id, service_id = %svc.id, "service created");
    Ok(svc)
}

#[instrument(skip(db))]
pub async fn list_offerings(
    db: &DatabaseConnection,
    organization_id: Uuid,
    filter: OfferingFilter,
    opts: Pagination,
) -> Result<Page<offering::Model>, ServiceError> {
    find_organization(db, organization_id).await?;
    let mut q = offering::Entity::find().filter(offering::Column::OrganizationId.eq(organization_id));
    if !filter.include_inactive {
        q = q.filter(offering::Column::IsActive.eq(true));
    }
    if let Some(loc) = filter.location_id {
        q = q.filter(offering::Column::LocationId.eq(loc));
    }
    if let Some(st) = filter.service_type {
        q = q.filter(offering::Column::ServiceType.eq(st));
    }
    let q = q.order_by_asc(offering::Column::CreatedAt).order_by_asc(offering::Column::Id);
    Ok(fetch_page(db, q, opts).await?)
}

pub async fn get_offering(db: &DatabaseConnection, organization_id: Uuid, id: Uuid) -> Result<offering::Model, ServiceError> {
    find_offering(db, organization_id, id).await
}

#[instrument(skip(db, patch))]
pub async fn update_offering(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
    patch: UpdateOffering,
) -> Result<offering::Model, ServiceError> {
    find_active_organization(db, organization_id).await?;
    let existing = find_offering(db, organization_id, id).await?;
    if patch.is_active == Some(false) {
        return Err(ServiceError::Validation("use DELETE to deactivate a service".into()));
    }

    let mut am: offering::ActiveModel = existing.clone().into();
    if let Some(v) = patch.name.as_deref() {
        am.name = Set(validate_name("name", v)?);
    }
    if let Some(v) = nullable(patch.description, validate_description)? {
        am.description = Set(v);
    }
    if let Some(st) = patch.service_type {
        am.service_type = Set(st);
    }
    if let Some(d) = patch.duration_minutes {
        am.duration_minutes = Set(validate_duration(d)?);
    }
    if let Some(c) = patch.capacity {
        am.capacity = Set(validate_capacity(c)?);
    }
    if let Some(p) = patch.price {
        am.price = Set(validate_price(p)?);
    }
    if let Some(c) = patch.currency.as_deref() {
        am.currency = Set(validate_currency(c)?);
    }
    if let Some(b) = patch.requires_approval {
        am.requires_approval = Set(b);
    }
    if let Some(b) = patch.allow_waitlist {
        am.allow_waitlist = Set(b);
    }
    if let Some(v) = nullable(patch.color, validate_service_color)? {
        am.color = Set(v);
    }
    match patch.location_id {
        Some(Some(loc)) if existing.location_id != Some(loc) => {
            find_usable_location(db, organization_id, loc).await?;
            am.location_id = Set(Some(loc));
        }
        Some(None) => am.location_id = Set(None),
        _ => {}
    }
    if patch.is_active == Some(true) {
        am.is_active = Set(true);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(event = "service_updated", organization_id = %organization_id, service_id = %id, "service updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn soft_delete_offering(
    db: &DatabaseConnection,
    organization_id: Uuid,
    id: Uuid,
) -> Result<offering::Model, ServiceError> {
    let existing = find_offering(db, organization_id, id).await?;
    let mut am: offering::ActiveModel = existing.into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let svc = am.update(db).await?;
    info!(event = "service_deactivated", organization_id = %organization_id, service_id = %id, "service soft-deleted");
    Ok(svc)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::location_service::{self, tests::new_location};
    use crate::organization_service::{self, tests::new_org};
    use crate::test_support::get_db;

    pub(crate) fn new_offering(name: &str, service_type: ServiceType) -> CreateOffering {
        CreateOffering {
            name: name.to_string(),
            description: None,
            service_type,
            duration_minutes: 60,
            capacity: None,
            price: None,
            currency: None,
            requires_approval: None,
            allow_waitlist: None,
            color: None,
            location_id: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_normalizes() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Class Gym")).await?;
        let plain = create_offering(&db, org.id, new_offering("Yoga Flow", ServiceType::Class)).await?;
        assert_eq!(plain.capacity, 1);
        assert_eq!(plain.price, 0.0);
        assert_eq!(plain.currency, "USD");
        assert!(!plain.requires_approval);
        assert!(!plain.allow_waitlist);

        let mut pt = new_offering("1:1 Coaching", ServiceType::PersonalTraining);
        pt.price = Some(49.999);
        pt.currency = Some("eur".into());
        pt.color = Some("#ff8800".into());
        let pt = create_offering(&db, org.id, pt).await?;
        assert_eq!(pt.price, 50.0);
        assert_eq!(pt.currency, "EUR");
        assert_eq!(pt.color.as_deref(), Some("#FF8800"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_values_are_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Strict Gym")).await?;
        let mut bad_color = new_offering("Painted", ServiceType::Workshop);
        bad_color.color = Some("orange".into());
        assert!(matches!(create_offering(&db, org.id, bad_color).await, Err(ServiceError::Model(_))));

        let mut short = new_offering("Blink", ServiceType::Class);
        short.duration_minutes = 1;
        assert!(matches!(create_offering(&db, org.id, short).await, Err(ServiceError::Model(_))));

        let mut negative = new_offering("Refund", ServiceType::Appointment);
        negative.price = Some(-5.0);
        assert!(matches!(create_offering(&db, org.id, negative).await, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn foreign_location_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mine = organization_service::create_organization(&db, new_org("Home Studio")).await?;
        let theirs = organization_service::create_organization(&db, new_org("Away Studio")).await?;
        let their_loc = location_service::create_location(&db, theirs.id, new_location("Away Hall")).await?;
        let mut input = new_offering("Borrowed", ServiceType::Class);
        input.location_id = Some(their_loc.id);
        assert!(matches!(create_offering(&db, mine.id, input).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn other_organization_cannot_read_or_delete() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = organization_service::create_organization(&db, new_org("Owner Studio")).await?;
        let b = organization_service::create_organization(&db, new_org("Snoop Studio")).await?;
        let svc = create_offering(&db, a.id, new_offering("Private", ServiceType::Appointment)).await?;
        assert!(matches!(get_offering(&db, b.id, svc.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(soft_delete_offering(&db, b.id, svc.id).await, Err(ServiceError::NotFound(_))));
        assert!(get_offering(&db, a.id, svc.id).await?.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_update() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Mixed Studio")).await?;
        let loc = location_service::create_location(&db, org.id, new_location("Main")).await?;
        let mut spin = new_offering("Spin", ServiceType::Class);
        spin.location_id = Some(loc.id);
        let spin = create_offering(&db, org.id, spin).await?;
        create_offering(&db, org.id, new_offering("Massage", ServiceType::Appointment)).await?;

        let classes = OfferingFilter { service_type: Some(ServiceType::Class), ..Default::default() };
        assert_eq!(list_offerings(&db, org.id, classes, Pagination::default()).await?.total, 1);
        let at_loc = OfferingFilter { location_id: Some(loc.id), ..Default::default() };
        assert_eq!(list_offerings(&db, org.id, at_loc, Pagination::default()).await?.total, 1);

        let patch = UpdateOffering {
            duration_minutes: Some(45),
            color: Some(Some("#000000".into())),
            location_id: Some(None),
            ..Default::default()
        };
        let updated = update_offering(&db, org.id, spin.id, patch).await?;
        assert_eq!(updated.duration_minutes, 45);
        assert_eq!(updated.color.as_deref(), Some("#000000"));
        assert_eq!(updated.location_id, None);

        soft_delete_offering(&db, org.id, spin.id).await?;
        assert_eq!(list_offerings(&db, org.id, OfferingFilter::default(), Pagination::default()).await?.total, 1);
        Ok(())
    }
}
