use std::collections::HashSet;

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::enums::Weekday;
use crate::errors::ModelError;
use crate::organization;

pub const DEFAULT_BOOKING_WINDOW_DAYS: i32 = 30;
pub const DEFAULT_MIN_BOOKING_NOTICE_HOURS: i32 = 2;
pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i32 = 24;
pub const DEFAULT_MAX_BOOKINGS_PER_MEMBER: i32 = 10;
pub const DEFAULT_REMINDER_HOURS_BEFORE: i32 = 24;
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#10B981";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "organization_settings")]
#[serde(rename_all = "camelCase")]
#[schema(as = OrganizationSettings)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub organization_id: Uuid,
    pub booking_window_days: i32,
    pub min_booking_notice_hours: i32,
    pub cancellation_window_hours: i32,
    pub max_bookings_per_member: i32,
    pub auto_confirm_bookings: bool,
    pub allow_waitlist: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub reminder_hours_before: i32,
    pub primary_color: String,
    pub secondary_color: String,
    #[sea_orm(column_type = "Json")]
    pub business_hours: BusinessHoursList,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

/// One day of the weekly opening schedule. Times are `HH:MM`, 24h.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub day: Weekday,
    pub open: String,
    pub close: String,
    pub is_open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
#[serde(transparent)]
pub struct BusinessHoursList(pub Vec<BusinessHours>);

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrganizationId)
                .to(organization::Column::Id)
                .into(),
        }
    }
}

impl Related<organization::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl BusinessHours {
    pub fn new(day: Weekday, open: &str, close: &str, is_open: bool) -> Self {
        Self { day, open: open.to_string(), close: close.to_string(), is_open }
    }
}

impl Default for BusinessHoursList {
    /// Weekdays 06:00-22:00, weekends 08:00-20:00, all open.
    fn default() -> Self {
        let days = Weekday::ALL
            .iter()
            .map(|&day| {
                if day.is_weekend() {
                    BusinessHours::new(day, "08:00", "20:00", true)
                } else {
                    BusinessHours::new(day, "06:00", "22:00", true)
                }
            })
            .collect();
        Self(days)
    }
}

/// Minutes since midnight for an `HH:MM` string.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// Each day at most once, times well formed, `open < close` on open days.
/// Entries are returned sorted Monday..Sunday.
pub fn validate_business_hours(hours: Vec<BusinessHours>) -> Result<BusinessHoursList, ModelError> {
    let mut seen = HashSet::new();
    for h in &hours {
        if !seen.insert(h.day) {
            return Err(ModelError::invalid(format!("businessHours lists {:?} more than once", h.day)));
        }
        let open = parse_hhmm(&h.open)
            .ok_or_else(|| ModelError::invalid(format!("businessHours {:?} open must be HH:MM", h.day)))?;
        let close = parse_hhmm(&h.close)
            .ok_or_else(|| ModelError::invalid(format!("businessHours {:?} close must be HH:MM", h.day)))?;
        if h.is_open && open >= close {
            return Err(ModelError::invalid(format!("businessHours {:?} must open before it closes", h.day)));
        }
    }
    let mut hours = hours;
    hours.sort_by_key(|h| h.day);
    Ok(BusinessHoursList(hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hours_cover_the_week() {
        let list = BusinessHoursList::default();
        assert_eq!(list.0.len(), 7);
        assert_eq!(list.0[0], BusinessHours::new(Weekday::Monday, "06:00", "22:00", true));
        assert_eq!(list.0[6], BusinessHours::new(Weekday::Sunday, "08:00", "20:00", true));
        assert!(validate_business_hours(list.0).is_ok());
    }

    #[test]
    fn parse_hhmm_bounds() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(23 * 60 + 59));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("7:30"), None);
        assert_eq!(parse_hhmm("07-30"), None);
    }

    #[test]
    fn rejects_duplicate_days_and_inverted_times() {
        let dup = vec![
            BusinessHours::new(Weekday::Monday, "06:00", "22:00", true),
            BusinessHours::new(Weekday::Monday, "07:00", "21:00", true),
        ];
        assert!(validate_business_hours(dup).is_err());

        let inverted = vec![BusinessHours::new(Weekday::Friday, "22:00", "06:00", true)];
        assert!(validate_business_hours(inverted).is_err());

        // closed days may carry placeholder times
        let closed = vec![BusinessHours::new(Weekday::Sunday, "00:00", "00:00", false)];
        assert!(validate_business_hours(closed).is_ok());
    }

    #[test]
    fn sorts_by_weekday_and_serializes_camel_case() {
        let list = validate_business_hours(vec![
            BusinessHours::new(Weekday::Sunday, "09:00", "12:00", true),
            BusinessHours::new(Weekday::Monday, "06:00", "22:00", true),
        ])
        .unwrap();
        assert_eq!(list.0[0].day, Weekday::Monday);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[1]["day"], "SUNDAY");
        assert_eq!(json[1]["isOpen"], true);
    }
}
