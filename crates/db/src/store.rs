//! `SeaORM` implementation of the core `LedgerStore` trait.
//!
//! Every method runs inside a schema-scoped transaction (see
//! [`crate::schema`]) and additionally filters on `tenant_id`. Status
//! transitions are expressed as conditional `UPDATE ... WHERE status =
//! expected` statements, so concurrent writers race on the database
//! row and exactly one wins.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use tracing::debug;
use uuid::Uuid;

use tally_core::journal::{EntryStatus, JournalEntry};
use tally_core::registry::Account;
use tally_core::store::{AccountActivity, LedgerStore, StatusChange, StoreError, VoidChange};
use tally_shared::{AccountId, EntryId, TenantContext};

use crate::entities::{accounts, journal_entries, journal_entry_lines, sea_orm_active_enums};
use crate::mapping;
use crate::schema::ScopedTxn;

/// Postgres-backed ledger store.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns the next sequential entry number for this tenant.
    ///
    /// Two concurrent inserts can read the same maximum; the unique
    /// index on `(tenant_id, entry_number)` makes the loser fail
    /// instead of silently duplicating a number.
    async fn next_entry_number<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<i64, DbErr> {
        let latest = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .order_by_desc(journal_entries::Column::EntryNumber)
            .limit(1)
            .one(conn)
            .await?;
        Ok(latest.map_or(1, |entry| entry.entry_number + 1))
    }

    /// Inserts an entry header and its lines on an open transaction.
    async fn insert_entry_rows<C: ConnectionTrait>(
        conn: &C,
        entry: &JournalEntry,
        entry_number: i64,
    ) -> Result<(), DbErr> {
        mapping::entry_into_row(entry, entry_number).insert(conn).await?;
        let lines: Vec<journal_entry_lines::ActiveModel> = entry
            .lines
            .iter()
            .enumerate()
            .map(|(position, line)| {
                let position = i32::try_from(position).unwrap_or(i32::MAX);
                mapping::line_into_row(line, position)
            })
            .collect();
        if !lines.is_empty() {
            journal_entry_lines::Entity::insert_many(lines).exec(conn).await?;
        }
        Ok(())
    }

    /// Collects the IDs of posted entries dated within `[from, before)`.
    async fn posted_entry_ids<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<Vec<Uuid>, DbErr> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted))
            .filter(journal_entries::Column::EntryDate.lt(before));
        if let Some(from) = from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        Ok(query.all(conn).await?.into_iter().map(|e| e.id).collect())
    }
}

fn backend(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::UniqueViolation,
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn insert_account(
        &self,
        ctx: &TenantContext,
        account: &Account,
    ) -> Result<(), StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        mapping::account_into_row(account)
            .insert(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn update_account(
        &self,
        ctx: &TenantContext,
        account: &Account,
    ) -> Result<(), StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        mapping::account_into_row(account)
            .update(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let row = accounts::Entity::find_by_id(id.into_inner())
            .filter(accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .one(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(row.map(mapping::account_from_row))
    }

    async fn find_account_by_code(
        &self,
        ctx: &TenantContext,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let row = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(accounts::Column::Code.eq(code))
            .one(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(row.map(mapping::account_from_row))
    }

    async fn list_accounts(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<Account>, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()));
        if active_only {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }
        let rows = query
            .order_by_asc(accounts::Column::Code)
            .all(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(rows.into_iter().map(mapping::account_from_row).collect())
    }

    async fn insert_entry(
        &self,
        ctx: &TenantContext,
        entry: &JournalEntry,
    ) -> Result<i64, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let number = Self::next_entry_number(scoped.txn(), ctx.tenant_id.into_inner())
            .await
            .map_err(backend)?;
        Self::insert_entry_rows(scoped.txn(), entry, number)
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        debug!(entry_id = %entry.id, entry_number = number, "inserted journal entry");
        Ok(number)
    }

    async fn get_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let header = journal_entries::Entity::find_by_id(id.into_inner())
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .one(scoped.txn())
            .await
            .map_err(backend)?;
        let Some(header) = header else {
            scoped.commit().await.map_err(backend)?;
            return Ok(None);
        };
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.eq(id.into_inner()))
            .order_by_asc(journal_entry_lines::Column::Position)
            .all(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(Some(mapping::entry_from_rows(header, lines)))
    }

    async fn update_entry_status(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        expected: EntryStatus,
        change: &StatusChange,
    ) -> Result<bool, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let mut update = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(sea_orm_active_enums::EntryStatus::from(change.status)),
            )
            .filter(journal_entries::Column::Id.eq(id.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(
                journal_entries::Column::Status
                    .eq(sea_orm_active_enums::EntryStatus::from(expected)),
            );
        if change.status == EntryStatus::Posted {
            update = update
                .col_expr(
                    journal_entries::Column::PostedAt,
                    Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(change.at)),
                )
                .col_expr(
                    journal_entries::Column::PostedBy,
                    Expr::value(change.by.into_inner()),
                );
        }
        let result = update.exec(scoped.txn()).await.map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        debug!(
            entry_id = %id,
            applied = result.rows_affected == 1,
            "conditional status update"
        );
        Ok(result.rows_affected == 1)
    }

    async fn void_entry(
        &self,
        ctx: &TenantContext,
        original: EntryId,
        reversal: &JournalEntry,
        change: &VoidChange,
    ) -> Result<i64, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;

        let result = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(sea_orm_active_enums::EntryStatus::Voided),
            )
            .col_expr(
                journal_entries::Column::VoidedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(
                    change.voided_at,
                )),
            )
            .col_expr(
                journal_entries::Column::VoidedBy,
                Expr::value(change.voided_by.into_inner()),
            )
            .col_expr(
                journal_entries::Column::VoidReason,
                Expr::value(change.reason.clone()),
            )
            .filter(journal_entries::Column::Id.eq(original.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(
                journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted),
            )
            .exec(scoped.txn())
            .await
            .map_err(backend)?;

        if result.rows_affected == 0 {
            scoped.rollback().await.map_err(backend)?;
            return Err(StoreError::PreconditionFailed);
        }

        let number = Self::next_entry_number(scoped.txn(), ctx.tenant_id.into_inner())
            .await
            .map_err(backend)?;
        Self::insert_entry_rows(scoped.txn(), reversal, number)
            .await
            .map_err(backend)?;

        scoped.commit().await.map_err(backend)?;
        debug!(original = %original, reversal = %reversal.id, "voided journal entry");
        Ok(number)
    }

    async fn delete_draft_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<bool, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        // Lines go with the entry via ON DELETE CASCADE.
        let result = journal_entries::Entity::delete_many()
            .filter(journal_entries::Column::Id.eq(id.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Draft))
            .exec(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;
        Ok(result.rows_affected > 0)
    }

    async fn account_totals(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<(Decimal, Decimal), StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let ids = Self::posted_entry_ids(scoped.txn(), ctx.tenant_id.into_inner(), from, before)
            .await
            .map_err(backend)?;
        if ids.is_empty() {
            scoped.commit().await.map_err(backend)?;
            return Ok((Decimal::ZERO, Decimal::ZERO));
        }
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.is_in(ids))
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .all(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;

        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for line in lines {
            debit += line.base_debit;
            credit += line.base_credit;
        }
        Ok((debit, credit))
    }

    async fn account_activity(
        &self,
        ctx: &TenantContext,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<Vec<AccountActivity>, StoreError> {
        let scoped = ScopedTxn::begin(&self.db, ctx).await.map_err(backend)?;
        let ids = Self::posted_entry_ids(scoped.txn(), ctx.tenant_id.into_inner(), from, before)
            .await
            .map_err(backend)?;
        if ids.is_empty() {
            scoped.commit().await.map_err(backend)?;
            return Ok(Vec::new());
        }

        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.is_in(ids))
            .all(scoped.txn())
            .await
            .map_err(backend)?;

        let mut sums: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            let slot = sums.entry(line.account_id).or_default();
            slot.0 += line.base_debit;
            slot.1 += line.base_credit;
        }

        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(accounts::Column::Id.is_in(sums.keys().copied().collect::<Vec<_>>()))
            .order_by_asc(accounts::Column::Code)
            .all(scoped.txn())
            .await
            .map_err(backend)?;
        scoped.commit().await.map_err(backend)?;

        Ok(account_rows
            .into_iter()
            .filter_map(|account| {
                sums.get(&account.id).map(|(debit, credit)| AccountActivity {
                    account_id: AccountId::from_uuid(account.id),
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type.clone().into(),
                    debit: *debit,
                    credit: *credit,
                })
            })
            .collect())
    }
}
