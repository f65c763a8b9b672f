//! Per-tenant schema scoping.
//!
//! Each tenant's tables live in a dedicated `PostgreSQL` schema. Every
//! store operation runs inside a transaction whose `search_path` is
//! pinned to that schema with `SET LOCAL`, so the setting cannot leak
//! onto other connections in the pool. The `tenant_id` column is still
//! filtered on every query as a second line of isolation.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use tally_shared::TenantContext;

/// Validates a schema name before it is interpolated into SQL.
///
/// Identifiers cannot be bound as statement parameters, so the name is
/// restricted to ASCII alphanumerics and underscores.
#[must_use]
pub fn is_valid_schema_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

/// A transaction pinned to one tenant's schema.
pub struct ScopedTxn {
    txn: DatabaseTransaction,
}

impl ScopedTxn {
    /// Begins a transaction and pins its `search_path` to the tenant's
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid schema name or if the
    /// transaction cannot be started.
    pub async fn begin(db: &DatabaseConnection, ctx: &TenantContext) -> Result<Self, DbErr> {
        if !is_valid_schema_name(&ctx.schema) {
            return Err(DbErr::Custom(format!(
                "invalid schema name: {:?}",
                ctx.schema
            )));
        }
        let txn = db.begin().await?;
        let sql = format!("SET LOCAL search_path TO \"{}\", public", ctx.schema);
        txn.execute_unprepared(&sql).await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn txn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_valid_schema_name("tenant_acme"));
        assert!(is_valid_schema_name("t1"));
        assert!(is_valid_schema_name("_shadow"));
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(!is_valid_schema_name(""));
        assert!(!is_valid_schema_name("tenant\"; DROP SCHEMA public"));
        assert!(!is_valid_schema_name("tenant-acme"));
        assert!(!is_valid_schema_name("tenant acme"));
        assert!(!is_valid_schema_name("1tenant"));
        assert!(!is_valid_schema_name(&"x".repeat(64)));
    }
}
