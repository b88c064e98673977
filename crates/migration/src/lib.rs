//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_organization;
mod m20240601_000002_create_location;
mod m20240601_000003_create_resource;
mod m20240601_000004_create_service;
mod m20240601_000005_create_organization_settings;
mod m20240601_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_organization::Migration),
            Box::new(m20240601_000002_create_location::Migration),
            Box::new(m20240601_000003_create_resource::Migration),
            Box::new(m20240601_000004_create_service::Migration),
            Box::new(m20240601_000005_create_organization_settings::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000010_add_indexes::Migration),
        ]
    }
}
