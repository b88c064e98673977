use chrono::Utc;
use common::serde_ext::double_option;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::enums::{BusinessType, SubscriptionTier};
use models::validation::{slugify, validate_email, validate_name, validate_slug, validate_text, validate_timezone, validate_url};
use models::{location, offering, organization, resource};

use crate::errors::ServiceError;
use crate::fields::{nullable, optional};
use crate::pagination::{fetch_page, Page, Pagination};
use crate::settings_service;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganization {
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub business_type: BusinessType,
    pub subscription_tier: Option<SubscriptionTier>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub business_type: Option<BusinessType>,
    pub subscription_tier: Option<SubscriptionTier>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    pub timezone: Option<String>,
    /// Only `true` is accepted (re-activation); deactivate with DELETE.
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationFilter {
    pub include_inactive: bool,
    pub business_type: Option<BusinessType>,
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
}

fn validate_phone(phone: &str) -> Result<String, models::errors::ModelError> {
    validate_text("phone", phone, 32)
}

/// Load an organization regardless of its active flag.
pub async fn find_organization<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<organization::Model, ServiceError> {
    organization::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("organization"))
}

/// Load an organization that may still receive new sub-resources.
pub async fn find_active_organization<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<organization::Model, ServiceError> {
    let org = find_organization(db, id).await?;
    if !org.is_active {
        return Err(ServiceError::not_found("organization"));
    }
    Ok(org)
}

async fn slug_taken<C: ConnectionTrait>(db: &C, slug: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
    let mut q = organization::Entity::find().filter(organization::Column::Slug.eq(slug));
    if let Some(id) = except {
        q = q.filter(organization::Column::Id.ne(id));
    }
    Ok(q.one(db).await?.is_some())
}

/// Create an organization and bootstrap its default settings.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_organization(db: &DatabaseConnection, input: CreateOrganization) -> Result<organization::Model, ServiceError> {
    let name = validate_name("name", &input.name)?;
    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => validate_slug(s)?,
        None => validate_slug(&slugify(&name))?,
    };
    let description = optional(input.description.as_deref(), |v| validate_text("description", v, 2000))?;
    let email = optional(input.email.as_deref(), validate_email)?;
    let phone = optional(input.phone.as_deref(), validate_phone)?;
    let website = optional(input.website.as_deref(), |v| validate_url("website", v))?;
    let logo_url = optional(input.logo_url.as_deref(), |v| validate_url("logoUrl", v))?;
    let timezone = optional(input.timezone.as_deref(), validate_timezone)?
        .unwrap_or_else(|| organization::DEFAULT_TIMEZONE.to_string());

    if slug_taken(db, &slug, None).await? {
        return Err(ServiceError::Conflict(format!("slug '{slug}' is already in use")));
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let txn = db.begin().await?;
    let org = organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(description),
        business_type: Set(input.business_type),
        subscription_tier: Set(input.subscription_tier.unwrap_or_default()),
        email: Set(email),
        phone: Set(phone),
        website: Set(website),
        logo_url: Set(logo_url),
        timezone: Set(timezone),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    let settings = settings_service::default_settings(org.id, now).insert(&txn).await?;
    txn.commit().await?;

    info!(event = "organization_created", organization_id = %org.id, slug = %org.slug, settings_id = %settings.id, "organization created");
    Ok(org)
}

/// Case-insensitive substring match; `%` and `_` in the term match literally.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// List organizations, active ones only unless `include_inactive`.
#[instrument(skip(db))]
pub async fn list_organizations(
    db: &DatabaseConnection,
    filter: OrganizationFilter,
    opts: Pagination,
) -> Result<Page<organization::Model>, ServiceError> {
    let mut q = organization::Entity::find();
    if !filter.include_inactive {
        q = q.filter(organization::Column::IsActive.eq(true));
    }
    if let Some(bt) = filter.business_type {
        q = q.filter(organization::Column::BusinessType.eq(bt));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        q = q.filter(Expr::expr(Func::lower(Expr::col(organization::Column::Name))).like(contains_pattern(term)));
    }
    let q = q.order_by_asc(organization::Column::CreatedAt).order_by_asc(organization::Column::Id);
    Ok(fetch_page(db, q, opts).await?)
}

/// Get by id; soft-deleted organizations are still returned.
pub async fn get_organization(db: &DatabaseConnection, id: Uuid) -> Result<organization::Model, ServiceError> {
    find_organization(db, id).await
}

pub async fn get_organization_by_slug(db: &DatabaseConnection, slug: &str) -> Result<organization::Model, ServiceError> {
    organization::Entity::find()
        .filter(organization::Column::Slug.eq(slug.trim()))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("organization"))
}

/// Apply a partial update; a slug change must stay unique.
#[instrument(skip(db, patch))]
pub async fn update_organization(
    db: &DatabaseConnection,
    id: Uuid,
    patch: UpdateOrganization,
) -> Result<organization::Model, ServiceError> {
    let existing = find_organization(db, id).await?;
    if patch.is_active == Some(false) {
        return Err(ServiceError::Validation("use DELETE to deactivate an organization".into()));
    }

    let mut am: organization::ActiveModel = existing.clone().into();
    if let Some(name) = patch.name.as_deref() {
        am.name = Set(validate_name("name", name)?);
    }
    if let Some(slug) = patch.slug.as_deref() {
        let slug = validate_slug(slug)?;
        if slug != existing.slug {
            if slug_taken(db, &slug, Some(id)).await? {
                return Err(ServiceError::Conflict(format!("slug '{slug}' is already in use")));
            }
            am.slug = Set(slug);
        }
    }
    if let Some(v) = nullable(patch.description, |v| validate_text("description", v, 2000))? {
        am.description = Set(v);
    }
    if let Some(bt) = patch.business_type {
        am.business_type = Set(bt);
    }
    if let Some(tier) = patch.subscription_tier {
        am.subscription_tier = Set(tier);
    }
    if let Some(v) = nullable(patch.email, validate_email)? {
        am.email = Set(v);
    }
    if let Some(v) = nullable(patch.phone, validate_phone)? {
        am.phone = Set(v);
    }
    if let Some(v) = nullable(patch.website, |v| validate_url("website", v))? {
        am.website = Set(v);
    }
    if let Some(v) = nullable(patch.logo_url, |v| validate_url("logoUrl", v))? {
        am.logo_url = Set(v);
    }
    if let Some(tz) = patch.timezone.as_deref() {
        am.timezone = Set(validate_timezone(tz)?);
    }
    if patch.is_active == Some(true) && !existing.is_active {
        am.is_active = Set(true);
        info!(event = "organization_reactivated", organization_id = %id, "organization reactivated");
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(event = "organization_updated", organization_id = %id, "organization updated");
    Ok(updated)
}

/// Soft delete: the organization and every location, resource and service
/// it owns are marked inactive. No row is removed.
#[instrument(skip(db))]
pub async fn soft_delete_organization(db: &DatabaseConnection, id: Uuid) -> Result<organization::Model, ServiceError> {
    let existing = find_organization(db, id).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();

    let txn = db.begin().await?;
    let locations = location::Entity::update_many()
        .col_expr(location::Column::IsActive, Expr::value(false))
        .col_expr(location::Column::IsPrimary, Expr::value(false))
        .col_expr(location::Column::UpdatedAt, Expr::value(now))
        .filter(location::Column::OrganizationId.eq(id))
        .filter(location::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let resources = resource::Entity::update_many()
        .col_expr(resource::Column::IsActive, Expr::value(false))
        .col_expr(resource::Column::UpdatedAt, Expr::value(now))
        .filter(resource::Column::OrganizationId.eq(id))
        .filter(resource::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let offerings = offering::Entity::update_many()
        .col_expr(offering::Column::IsActive, Expr::value(false))
        .col_expr(offering::Column::UpdatedAt, Expr::value(now))
        .filter(offering::Column::OrganizationId.eq(id))
        .filter(offering::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let mut am: organization::ActiveModel = existing.into();
    am.is_active = Set(false);
    am.updated_at = Set(now);
    let org = am.update(&txn).await?;
    txn.commit().await?;

    info!(
        event = "organization_deactivated",
        organization_id = %id,
        locations = locations.rows_affected,
        resources = resources.rows_affected,
        services = offerings.rows_affected,
        "organization soft-deleted"
    );
    Ok(org)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::{location_service, offering_service, resource_service};
    use models::enums::{ResourceType, ServiceType};
    use models::organization_settings;
    use sea_orm::PaginatorTrait;

    pub(crate) fn new_org(name: &str) -> CreateOrganization {
        CreateOrganization {
            name: name.to_string(),
            slug: None,
            description: None,
            business_type: BusinessType::Gym,
            subscription_tier: None,
            email: None,
            phone: None,
            website: None,
            logo_url: None,
            timezone: None,
        }
    }

    #[tokio::test]
    async fn create_derives_slug_and_bootstraps_settings() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = create_organization(&db, new_org("Iron & Steel Gym")).await?;
        assert_eq!(org.slug, "iron-steel-gym");
        assert_eq!(org.subscription_tier, SubscriptionTier::Free);
        assert_eq!(org.timezone, "UTC");
        assert!(org.is_active);

        let settings = organization_settings::Entity::find()
            .filter(organization_settings::Column::OrganizationId.eq(org.id))
            .one(&db)
            .await?
            .expect("default settings");
        assert_eq!(settings.booking_window_days, organization_settings::DEFAULT_BOOKING_WINDOW_DAYS);
        assert_eq!(settings.business_hours.0.len(), 7);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut first = new_org("Zen Studio");
        first.slug = Some("zen".into());
        create_organization(&db, first).await?;

        let mut second = new_org("Another Zen");
        second.slug = Some("zen".into());
        let err = create_organization(&db, second).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn slug_of_soft_deleted_org_stays_reserved() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = create_organization(&db, new_org("Retired Gym")).await?;
        soft_delete_organization(&db, org.id).await?;
        let err = create_organization(&db, new_org("Retired Gym")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut bad_slug = new_org("Valid Name");
        bad_slug.slug = Some("Not Valid".into());
        assert!(matches!(create_organization(&db, bad_slug).await, Err(ServiceError::Model(_))));

        let mut bad_email = new_org("Valid Name");
        bad_email.email = Some("nobody".into());
        assert!(matches!(create_organization(&db, bad_email).await, Err(ServiceError::Model(_))));

        assert!(matches!(create_organization(&db, new_org("   ")).await, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn soft_delete_keeps_rows_and_cascades() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = create_organization(&db, new_org("Cascade Fitness")).await?;
        let loc = location_service::create_location(&db, org.id, location_service::tests::new_location("Main")).await?;
        let res = resource_service::create_resource(
            &db,
            org.id,
            resource_service::CreateResource {
                name: "Studio A".into(),
                description: None,
                resource_type: ResourceType::Room,
                capacity: Some(20),
                location_id: Some(loc.id),
                is_bookable: None,
            },
        )
        .await?;
        let svc = offering_service::create_offering(
            &db,
            org.id,
            offering_service::tests::new_offering("Spin", ServiceType::Class),
        )
        .await?;

        let deleted = soft_delete_organization(&db, org.id).await?;
        assert!(!deleted.is_active);

        // row still there
        let count = organization::Entity::find().filter(organization::Column::Id.eq(org.id)).count(&db).await?;
        assert_eq!(count, 1);
        let fetched = get_organization(&db, org.id).await?;
        assert!(!fetched.is_active);

        let loc_after = location::Entity::find_by_id(loc.id).one(&db).await?.unwrap();
        assert!(loc.is_primary);
        assert!(!loc_after.is_active);
        assert!(!loc_after.is_primary);
        assert!(!resource::Entity::find_by_id(res.id).one(&db).await?.unwrap().is_active);
        assert!(!offering::Entity::find_by_id(svc.id).one(&db).await?.unwrap().is_active);

        // hidden from the default listing
        let page = list_organizations(&db, OrganizationFilter::default(), Pagination::default()).await?;
        assert!(page.items.iter().all(|o| o.id != org.id));
        let all = list_organizations(
            &db,
            OrganizationFilter { include_inactive: true, ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert!(all.items.iter().any(|o| o.id == org.id));
        Ok(())
    }

    #[tokio::test]
    async fn missing_organization_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let id = Uuid::new_v4();
        assert!(matches!(get_organization(&db, id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(soft_delete_organization(&db, id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            update_organization(&db, id, UpdateOrganization::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(get_organization_by_slug(&db, "ghost").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_applies_patch_and_guards_slug() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_organization(&db, new_org("Alpha Yoga")).await?;
        let b = create_organization(&db, new_org("Beta Yoga")).await?;

        let patch = UpdateOrganization {
            name: Some("Alpha Yoga Loft".into()),
            business_type: Some(BusinessType::YogaStudio),
            email: Some(Some("hello@alpha.example".into())),
            ..Default::default()
        };
        let updated = update_organization(&db, a.id, patch).await?;
        assert_eq!(updated.name, "Alpha Yoga Loft");
        assert_eq!(updated.business_type, BusinessType::YogaStudio);
        assert_eq!(updated.email.as_deref(), Some("hello@alpha.example"));
        assert_eq!(updated.slug, "alpha-yoga");

        let clear = UpdateOrganization { email: Some(None), ..Default::default() };
        assert_eq!(update_organization(&db, a.id, clear).await?.email, None);

        let steal = UpdateOrganization { slug: Some(b.slug.clone()), ..Default::default() };
        assert!(matches!(update_organization(&db, a.id, steal).await, Err(ServiceError::Conflict(_))));

        let same = UpdateOrganization { slug: Some(a.slug.clone()), ..Default::default() };
        assert!(update_organization(&db, a.id, same).await.is_ok());

        let deactivate = UpdateOrganization { is_active: Some(false), ..Default::default() };
        assert!(matches!(update_organization(&db, a.id, deactivate).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn reactivation_only_touches_the_organization() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = create_organization(&db, new_org("Phoenix Gym")).await?;
        let loc = location_service::create_location(&db, org.id, location_service::tests::new_location("Main")).await?;
        soft_delete_organization(&db, org.id).await?;

        let back = update_organization(&db, org.id, UpdateOrganization { is_active: Some(true), ..Default::default() }).await?;
        assert!(back.is_active);
        let loc_after = location::Entity::find_by_id(loc.id).one(&db).await?.unwrap();
        assert!(loc.is_primary);
        assert!(!loc_after.is_active);
        assert!(!loc_after.is_primary);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_paginates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for name in ["North Gym", "South Gym", "East Gym"] {
            create_organization(&db, new_org(name)).await?;
        }
        let mut spa = new_org("Calm Spa");
        spa.business_type = BusinessType::Spa;
        create_organization(&db, spa).await?;

        let page = list_organizations(&db, OrganizationFilter::default(), Pagination { page: 1, per_page: 2 }).await?;
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 2);

        let spas = list_organizations(
            &db,
            OrganizationFilter { business_type: Some(BusinessType::Spa), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(spas.total, 1);

        let search = list_organizations(
            &db,
            OrganizationFilter { search: Some("GYM".into()), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(search.total, 3);
        Ok(())
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_organization(&db, new_org("100% Fitness")).await?;
        create_organization(&db, new_org("Fit_Club")).await?;
        create_organization(&db, new_org("Plain Gym")).await?;

        let search = |term: &str| OrganizationFilter { search: Some(term.into()), ..Default::default() };
        assert_eq!(list_organizations(&db, search("%"), Pagination::default()).await?.total, 1);
        assert_eq!(list_organizations(&db, search("100%"), Pagination::default()).await?.total, 1);
        assert_eq!(list_organizations(&db, search("_"), Pagination::default()).await?.total, 1);
        assert_eq!(list_organizations(&db, search("gy_"), Pagination::default()).await?.total, 0);
        assert_eq!(list_organizations(&db, search("fit"), Pagination::default()).await?.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_by_slug() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = create_organization(&db, new_org("Slug Lookup Studio")).await?;
        let found = get_organization_by_slug(&db, "slug-lookup-studio").await?;
        assert_eq!(found.id, org.id);
        Ok(())
    }
}
