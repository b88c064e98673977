use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::organization_settings::{self as settings, validate_business_hours, BusinessHours, BusinessHoursList};
use models::validation::{validate_color, validate_range};

use crate::errors::ServiceError;
use crate::organization_service::find_organization;

/// Partial settings document. Used for both PUT and PATCH; absent fields
/// keep their current (or default) value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettings {
    pub booking_window_days: Option<i32>,
    pub min_booking_notice_hours: Option<i32>,
    pub cancellation_window_hours: Option<i32>,
    pub max_bookings_per_member: Option<i32>,
    pub auto_confirm_bookings: Option<bool>,
    pub allow_waitlist: Option<bool>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub reminder_hours_before: Option<i32>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub business_hours: Option<Vec<BusinessHours>>,
}

/// Default settings row for a freshly created organization.
pub fn default_settings(organization_id: Uuid, now: DateTimeWithTimeZone) -> settings::ActiveModel {
    settings::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        booking_window_days: Set(settings::DEFAULT_BOOKING_WINDOW_DAYS),
        min_booking_notice_hours: Set(settings::DEFAULT_MIN_BOOKING_NOTICE_HOURS),
        cancellation_window_hours: Set(settings::DEFAULT_CANCELLATION_WINDOW_HOURS),
        max_bookings_per_member: Set(settings::DEFAULT_MAX_BOOKINGS_PER_MEMBER),
        auto_confirm_bookings: Set(true),
        allow_waitlist: Set(true),
        email_notifications: Set(true),
        sms_notifications: Set(false),
        reminder_hours_before: Set(settings::DEFAULT_REMINDER_HOURS_BEFORE),
        primary_color: Set(settings::DEFAULT_PRIMARY_COLOR.to_string()),
        secondary_color: Set(settings::DEFAULT_SECONDARY_COLOR.to_string()),
        business_hours: Set(BusinessHoursList::default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

impl UpsertSettings {
    /// Validate every supplied field and write it onto `am`.
    fn apply(self, am: &mut settings::ActiveModel) -> Result<(), ServiceError> {
        if let Some(v) = self.booking_window_days {
            am.booking_window_days = Set(validate_range("bookingWindowDays", v, 1, 365)?);
        }
        if let Some(v) = self.min_booking_notice_hours {
            am.min_booking_notice_hours = Set(validate_range("minBookingNoticeHours", v, 0, 720)?);
        }
        if let Some(v) = self.cancellation_window_hours {
            am.cancellation_window_hours = Set(validate_range("cancellationWindowHours", v, 0, 720)?);
        }
        if let Some(v) = self.max_bookings_per_member {
            am.max_bookings_per_member = Set(validate_range("maxBookingsPerMember", v, 1, 1000)?);
        }
        if let Some(v) = self.auto_confirm_bookings {
            am.auto_confirm_bookings = Set(v);
        }
        if let Some(v) = self.allow_waitlist {
            am.allow_waitlist = Set(v);
        }
        if let Some(v) = self.email_notifications {
            am.email_notifications = Set(v);
        }
        if let Some(v) = self.sms_notifications {
            am.sms_notifications = Set(v);
        }
        if let Some(v) = self.reminder_hours_before {
            am.reminder_hours_before = Set(validate_range("reminderHoursBefore", v, 0, 168)?);
        }
        if let Some(v) = self.primary_color.as_deref() {
            am.primary_color = Set(validate_color("primaryColor", v)?);
        }
        if let Some(v) = self.secondary_color.as_deref() {
            am.secondary_color = Set(validate_color("secondaryColor", v)?);
        }
        if let Some(hours) = self.business_hours {
            am.business_hours = Set(validate_business_hours(hours)?);
        }
        Ok(())
    }
}

#[instrument(skip(db))]
pub async fn get_settings(db: &DatabaseConnection, organization_id: Uuid) -> Result<settings::Model, ServiceError> {
    find_organization(db, organization_id).await?;
    settings::Entity::find()
        .filter(settings::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("organization settings"))
}

/// Update the organization's settings, creating them from defaults first
/// when the organization has none.
#[instrument(skip(db, patch))]
pub async fn upsert_settings(
    db: &DatabaseConnection,
    organization_id: Uuid,
    patch: UpsertSettings,
) -> Result<settings::Model, ServiceError> {
    find_organization(db, organization_id).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let existing = settings::Entity::find()
        .filter(settings::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?;

    let saved = match existing {
        Some(current) => {
            let mut am: settings::ActiveModel = current.into();
            patch.apply(&mut am)?;
            am.updated_at = Set(now);
            am.update(db).await?
        }
        None => {
            let mut am = default_settings(organization_id, now);
            patch.apply(&mut am)?;
            let created = am.insert(db).await?;
            info!(event = "settings_created", organization_id = %organization_id, "settings created from defaults");
            created
        }
    };
    info!(event = "settings_updated", organization_id = %organization_id, "settings saved");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization_service::{self, tests::new_org};
    use crate::test_support::get_db;
    use models::enums::Weekday;
    use sea_orm::ModelTrait;

    #[tokio::test]
    async fn get_returns_bootstrapped_defaults() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Settings Gym")).await?;
        let s = get_settings(&db, org.id).await?;
        assert_eq!(s.organization_id, org.id);
        assert_eq!(s.min_booking_notice_hours, 2);
        assert!(s.auto_confirm_bookings);
        assert!(!s.sms_notifications);
        assert_eq!(s.primary_color, "#3B82F6");
        Ok(())
    }

    #[tokio::test]
    async fn upsert_without_row_merges_onto_defaults() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Bare Gym")).await?;
        get_settings(&db, org.id).await?.delete(&db).await?;
        assert!(matches!(get_settings(&db, org.id).await, Err(ServiceError::NotFound(_))));

        let patch = UpsertSettings { booking_window_days: Some(60), sms_notifications: Some(true), ..Default::default() };
        let s = upsert_settings(&db, org.id, patch).await?;
        assert_eq!(s.organization_id, org.id);
        assert_eq!(s.booking_window_days, 60);
        assert!(s.sms_notifications);
        assert_eq!(s.cancellation_window_hours, settings::DEFAULT_CANCELLATION_WINDOW_HOURS);
        assert_eq!(s.business_hours, BusinessHoursList::default());
        Ok(())
    }

    #[tokio::test]
    async fn upsert_updates_existing_row_in_place() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Brand Gym")).await?;
        let before = get_settings(&db, org.id).await?;
        let patch = UpsertSettings {
            primary_color: Some("#112233".into()),
            business_hours: Some(vec![
                BusinessHours::new(Weekday::Sunday, "10:00", "14:00", true),
                BusinessHours::new(Weekday::Monday, "05:30", "23:00", true),
            ]),
            ..Default::default()
        };
        let after = upsert_settings(&db, org.id, patch).await?;
        assert_eq!(after.id, before.id);
        assert_eq!(after.primary_color, "#112233");
        assert_eq!(after.business_hours.0.len(), 2);
        assert_eq!(after.business_hours.0[0].day, Weekday::Monday);
        assert_eq!(after.booking_window_days, before.booking_window_days);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_values_leave_settings_untouched() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let org = organization_service::create_organization(&db, new_org("Careful Gym")).await?;
        let bad_color = UpsertSettings { secondary_color: Some("green".into()), ..Default::default() };
        assert!(matches!(upsert_settings(&db, org.id, bad_color).await, Err(ServiceError::Model(_))));

        let overlapping = UpsertSettings {
            business_hours: Some(vec![
                BusinessHours::new(Weekday::Tuesday, "06:00", "12:00", true),
                BusinessHours::new(Weekday::Tuesday, "11:00", "20:00", true),
            ]),
            ..Default::default()
        };
        assert!(matches!(upsert_settings(&db, org.id, overlapping).await, Err(ServiceError::Model(_))));

        let window = UpsertSettings { booking_window_days: Some(0), ..Default::default() };
        assert!(matches!(upsert_settings(&db, org.id, window).await, Err(ServiceError::Model(_))));

        assert_eq!(get_settings(&db, org.id).await?.secondary_color, "#10B981");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_organization_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let id = Uuid::new_v4();
        assert!(matches!(get_settings(&db, id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(upsert_settings(&db, id, UpsertSettings::default()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
