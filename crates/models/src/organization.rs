use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::enums::{BusinessType, SubscriptionTier};
use crate::{location, offering, organization_settings, resource};

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "organization")]
#[serde(rename_all = "camelCase")]
#[schema(as = Organization)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub business_type: BusinessType,
    pub subscription_tier: SubscriptionTier,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub timezone: String,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Location,
    Resource,
    Offering,
    Settings,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Location => Entity::has_many(location::Entity).into(),
            Relation::Resource => Entity::has_many(resource::Entity).into(),
            Relation::Offering => Entity::has_many(offering::Entity).into(),
            Relation::Settings => Entity::has_one(organization_settings::Entity).into(),
        }
    }
}

impl Related<location::Entity> for Entity {
    fn to() -> RelationDef { Relation::Location.def() }
}

impl Related<resource::Entity> for Entity {
    fn to() -> RelationDef { Relation::Resource.def() }
}

impl Related<offering::Entity> for Entity {
    fn to() -> RelationDef { Relation::Offering.def() }
}

impl Related<organization_settings::Entity> for Entity {
    fn to() -> RelationDef { Relation::Settings.def() }
}

impl ActiveModelBehavior for ActiveModel {}
