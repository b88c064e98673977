//! Create `organization` table.
//!
//! Tenant root; every other table references it. Rows are soft-deleted
//! through `is_active`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(uuid(Organization::Id).primary_key())
                    .col(string_len(Organization::Name, 128).not_null())
                    .col(string_len(Organization::Slug, 64).unique_key().not_null())
                    .col(text_null(Organization::Description))
                    .col(string_len(Organization::BusinessType, 32).not_null())
                    .col(string_len(Organization::SubscriptionTier, 32).not_null())
                    .col(string_len_null(Organization::Email, 255))
                    .col(string_len_null(Organization::Phone, 32))
                    .col(string_len_null(Organization::Website, 512))
                    .col(string_len_null(Organization::LogoUrl, 512))
                    .col(string_len(Organization::Timezone, 64).not_null())
                    .col(boolean(Organization::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Organization::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Organization::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Organization::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
    Name,
    Slug,
    Description,
    BusinessType,
    SubscriptionTier,
    Email,
    Phone,
    Website,
    LogoUrl,
    Timezone,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
