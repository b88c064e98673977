use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{offering, organization, resource};

pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "location")]
#[serde(rename_all = "camelCase")]
#[schema(as = Location)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub is_primary: bool,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
    Resource,
    Offering,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrganizationId)
                .to(organization::Column::Id)
                .into(),
            Relation::Resource => Entity::has_many(resource::Entity).into(),
            Relation::Offering => Entity::has_many(offering::Entity).into(),
        }
    }
}

impl Related<organization::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl Related<resource::Entity> for Entity {
    fn to() -> RelationDef { Relation::Resource.def() }
}

impl Related<offering::Entity> for Entity {
    fn to() -> RelationDef { Relation::Offering.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when this location may be referenced by resources and services
    /// of `organization_id`.
    pub fn is_usable_by(&self, organization_id: Uuid) -> bool {
        self.organization_id == organization_id && self.is_active
    }
}
