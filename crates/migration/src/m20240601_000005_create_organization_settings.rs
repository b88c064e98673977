//! Create `organization_settings` table (one row per organization).
//!
//! Business hours are stored as a JSON array of day entries.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationSettings::Table)
                    .if_not_exists()
                    .col(uuid(OrganizationSettings::Id).primary_key())
                    .col(uuid(OrganizationSettings::OrganizationId).unique_key().not_null())
                    .col(integer(OrganizationSettings::BookingWindowDays).not_null())
                    .col(integer(OrganizationSettings::MinBookingNoticeHours).not_null())
                    .col(integer(OrganizationSettings::CancellationWindowHours).not_null())
                    .col(integer(OrganizationSettings::MaxBookingsPerMember).not_null())
                    .col(boolean(OrganizationSettings::AutoConfirmBookings).not_null())
                    .col(boolean(OrganizationSettings::AllowWaitlist).not_null())
                    .col(boolean(OrganizationSettings::EmailNotifications).not_null())
                    .col(boolean(OrganizationSettings::SmsNotifications).not_null())
                    .col(integer(OrganizationSettings::ReminderHoursBefore).not_null())
                    .col(string_len(OrganizationSettings::PrimaryColor, 7).not_null())
                    .col(string_len(OrganizationSettings::SecondaryColor, 7).not_null())
                    .col(json(OrganizationSettings::BusinessHours).not_null())
                    .col(timestamp_with_time_zone(OrganizationSettings::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(OrganizationSettings::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_settings_organization")
                            .from(OrganizationSettings::Table, OrganizationSettings::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganizationSettings {
    Table,
    Id,
    OrganizationId,
    BookingWindowDays,
    MinBookingNoticeHours,
    CancellationWindowHours,
    MaxBookingsPerMember,
    AutoConfirmBookings,
    AllowWaitlist,
    EmailNotifications,
    SmsNotifications,
    ReminderHoursBefore,
    PrimaryColor,
    SecondaryColor,
    BusinessHours,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }
