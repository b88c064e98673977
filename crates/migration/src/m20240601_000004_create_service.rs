//! Create `service` table: bookable offerings (classes, appointments,
//! workshops, personal training).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::OrganizationId).not_null())
                    .col(uuid_null(Service::LocationId))
                    .col(string_len(Service::Name, 128).not_null())
                    .col(text_null(Service::Description))
                    .col(string_len(Service::ServiceType, 32).not_null())
                    .col(integer(Service::DurationMinutes).not_null())
                    .col(integer(Service::Capacity).not_null().default(1))
                    .col(double(Service::Price).not_null().default(0.0))
                    .col(string_len(Service::Currency, 3).not_null())
                    .col(boolean(Service::RequiresApproval).not_null().default(false))
                    .col(boolean(Service::AllowWaitlist).not_null().default(false))
                    .col(string_len_null(Service::Color, 7))
                    .col(boolean(Service::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_organization")
                            .from(Service::Table, Service::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_location")
                            .from(Service::Table, Service::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    OrganizationId,
    LocationId,
    Name,
    Description,
    ServiceType,
    DurationMinutes,
    Capacity,
    Price,
    Currency,
    RequiresApproval,
    AllowWaitlist,
    Color,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }

#[derive(DeriveIden)]
enum Location { Table, Id }
