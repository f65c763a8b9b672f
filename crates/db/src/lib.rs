//! Database layer with `SeaORM` entities and the ledger store adapter.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The Postgres-backed [`SeaOrmLedgerStore`]
//! - Database migrations

pub mod entities;
pub mod mapping;
pub mod migration;
pub mod schema;
pub mod store;

pub use store::SeaOrmLedgerStore;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
