use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Location: tenant scoping
        manager
            .create_index(
                Index::create()
                    .name("idx_location_organization")
                    .table(Location::Table)
                    .col(Location::OrganizationId)
                    .to_owned(),
            )
            .await?;

        // Resource: tenant scoping and location filter
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_organization")
                    .table(Resource::Table)
                    .col(Resource::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_location")
                    .table(Resource::Table)
                    .col(Resource::LocationId)
                    .to_owned(),
            )
            .await?;

        // Service: tenant scoping and location filter
        manager
            .create_index(
                Index::create()
                    .name("idx_service_organization")
                    .table(Service::Table)
                    .col(Service::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_location")
                    .table(Service::Table)
                    .col(Service::LocationId)
                    .to_owned(),
            )
            .await?;

        // Organization: listing filters on active flag
        manager
            .create_index(
                Index::create()
                    .name("idx_organization_active")
                    .table(Organization::Table)
                    .col(Organization::IsActive)
                    .to_owned(),
            )
            .await?;

        // Location: at most one primary per organization
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_location_single_primary \
                 ON location (organization_id) WHERE is_primary",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_location_organization").table(Location::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_resource_organization").table(Resource::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_resource_location").table(Resource::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_organization").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_location").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_organization_active").table(Organization::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_location_single_primary").table(Location::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Organization { Table, IsActive }

#[derive(DeriveIden)]
enum Location { Table, OrganizationId }

#[derive(DeriveIden)]
enum Resource { Table, OrganizationId, LocationId }

#[derive(DeriveIden)]
enum Service { Table, OrganizationId, LocationId }
