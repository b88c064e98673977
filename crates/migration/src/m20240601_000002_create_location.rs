//! Create `location` table with FK to `organization`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(uuid(Location::Id).primary_key())
                    .col(uuid(Location::OrganizationId).not_null())
                    .col(string_len(Location::Name, 128).not_null())
                    .col(string_len(Location::Address, 255).not_null())
                    .col(string_len(Location::City, 128).not_null())
                    .col(string_len_null(Location::State, 128))
                    .col(string_len_null(Location::PostalCode, 32))
                    .col(string_len(Location::Country, 64).not_null())
                    .col(string_len_null(Location::Phone, 32))
                    .col(string_len_null(Location::Timezone, 64))
                    .col(boolean(Location::IsPrimary).not_null().default(false))
                    .col(boolean(Location::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Location::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Location::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_organization")
                            .from(Location::Table, Location::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Location::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Location {
    Table,
    Id,
    OrganizationId,
    Name,
    Address,
    City,
    State,
    PostalCode,
    Country,
    Phone,
    Timezone,
    IsPrimary,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }
