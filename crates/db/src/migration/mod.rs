//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. They create the
//! ledger tables inside the connection's current `search_path`, so
//! they are run once per tenant schema.

pub use sea_orm_migration::prelude::*;

mod m20260830_000001_initial;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260830_000001_initial::Migration)]
    }
}
