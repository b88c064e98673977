//! Bookable offering, exposed over HTTP as a "service" (class, appointment,
//! workshop, personal training).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::enums::ServiceType;
use crate::errors::ModelError;
use crate::validation::validate_range;
use crate::{location, organization};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DURATION_MIN: i32 = 5;
pub const DURATION_MAX: i32 = 24 * 60;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "service")]
#[serde(rename_all = "camelCase")]
#[schema(as = Service)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub location_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub duration_minutes: i32,
    pub capacity: i32,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub currency: String,
    pub requires_approval: bool,
    pub allow_waitlist: bool,
    pub color: Option<String>,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
    Location,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrganizationId)
                .to(organization::Column::Id)
                .into(),
            Relation::Location => Entity::belongs_to(location::Entity)
                .from(Column::LocationId)
                .to(location::Column::Id)
                .into(),
        }
    }
}

impl Related<organization::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl Related<location::Entity> for Entity {
    fn to() -> RelationDef { Relation::Location.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_duration(minutes: i32) -> Result<i32, ModelError> {
    validate_range("durationMinutes", minutes, DURATION_MIN, DURATION_MAX)
}

pub fn validate_price(price: f64) -> Result<f64, ModelError> {
    // Stored with cent precision
    let cents = (price * 100.0).round() / 100.0;
    if !cents.is_finite() || price < 0.0 {
        return Err(ModelError::invalid("price must be a non-negative number"));
    }
    Ok(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds() {
        assert!(validate_duration(4).is_err());
        assert_eq!(validate_duration(60).unwrap(), 60);
        assert!(validate_duration(DURATION_MAX + 1).is_err());
    }

    #[test]
    fn price_rounds_to_cents() {
        assert_eq!(validate_price(19.999).unwrap(), 20.0);
        assert_eq!(validate_price(0.0).unwrap(), 0.0);
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn price_overflowing_cent_scale_is_rejected() {
        assert!(validate_price(1e307).is_err());
        assert!(validate_price(f64::MAX).is_err());
        assert_eq!(validate_price(1e9).unwrap(), 1e9);
        assert!(validate_price(-0.004).is_err());
    }
}
