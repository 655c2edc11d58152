//! Schema migrations for the catalog, vote log and session tables.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_catalog_tables;
mod m20250101_000002_create_session_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Override the name of migration table to avoid conflicts
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("smashpass_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_catalog_tables::Migration),
            Box::new(m20250101_000002_create_session_table::Migration),
        ]
    }
}
