//! Create `resource` table.
//!
//! Bookable rooms and equipment; `location_id` is optional and nulled when
//! the location row goes away.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resource::Table)
                    .if_not_exists()
                    .col(uuid(Resource::Id).primary_key())
                    .col(uuid(Resource::OrganizationId).not_null())
                    .col(uuid_null(Resource::LocationId))
                    .col(string_len(Resource::Name, 128).not_null())
                    .col(text_null(Resource::Description))
                    .col(string_len(Resource::ResourceType, 32).not_null())
                    .col(integer(Resource::Capacity).not_null().default(1))
                    .col(boolean(Resource::IsBookable).not_null().default(true))
                    .col(boolean(Resource::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Resource::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Resource::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_organization")
                            .from(Resource::Table, Resource::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_location")
                            .from(Resource::Table, Resource::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Resource::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Resource {
    Table,
    Id,
    OrganizationId,
    LocationId,
    Name,
    Description,
    ResourceType,
    Capacity,
    IsBookable,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }

#[derive(DeriveIden)]
enum Location { Table, Id }
