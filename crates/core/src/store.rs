//! Storage abstraction for ledger data.
//!
//! [`LedgerStore`] is the only seam between the business logic in this
//! crate and a storage backend. Every method takes a
//! [`TenantContext`](tally_shared::TenantContext) and must scope all
//! reads and writes to that tenant.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use tally_shared::{AccountId, EntryId, TenantContext, UserId};

use crate::journal::{EntryStatus, JournalEntry};
use crate::registry::{Account, AccountType};

/// Errors a storage backend can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write found the record in an unexpected state.
    #[error("Precondition failed")]
    PreconditionFailed,

    /// An insert collided with a unique index, typically because a
    /// concurrent writer took the same account code or entry number.
    #[error("Unique constraint violated")]
    UniqueViolation,

    /// The backend itself failed (connection, constraint, ...).
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Fields written when an entry transitions status.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Status to transition to.
    pub status: EntryStatus,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Who triggered the transition.
    pub by: UserId,
}

/// Fields written onto the original entry when it is voided.
#[derive(Debug, Clone)]
pub struct VoidChange {
    /// When the void happened.
    pub voided_at: DateTime<Utc>,
    /// Who voided the entry.
    pub voided_by: UserId,
    /// Caller-supplied reason for the void.
    pub reason: String,
}

/// One account's posted debit/credit totals within a date window.
///
/// Produced by [`LedgerStore::account_activity`] for trial balance and
/// period reports.
#[derive(Debug, Clone)]
pub struct AccountActivity {
    /// The account.
    pub account_id: AccountId,
    /// Account code, for report ordering and display.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type, used to compute the net balance side.
    pub account_type: AccountType,
    /// Sum of base-currency debits.
    pub debit: Decimal,
    /// Sum of base-currency credits.
    pub credit: Decimal,
}

/// Persistence interface for accounts and journal entries.
///
/// Implementations must guarantee:
/// - every operation is scoped to the given tenant;
/// - `insert_entry` and `void_entry` are atomic (all rows or none);
/// - `update_entry_status` and `void_entry` only succeed when the
///   entry is still in the expected status, so concurrent writers
///   cannot both win.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // ========== Accounts ==========

    /// Inserts a new account.
    async fn insert_account(&self, ctx: &TenantContext, account: &Account)
    -> Result<(), StoreError>;

    /// Updates an existing account in place.
    async fn update_account(&self, ctx: &TenantContext, account: &Account)
    -> Result<(), StoreError>;

    /// Fetches an account by ID.
    async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError>;

    /// Fetches an account by its code.
    async fn find_account_by_code(
        &self,
        ctx: &TenantContext,
        code: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Lists accounts ordered by code.
    async fn list_accounts(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<Account>, StoreError>;

    // ========== Journal entries ==========

    /// Inserts an entry and its lines atomically.
    ///
    /// Assigns and returns the tenant-scoped sequential entry number.
    async fn insert_entry(
        &self,
        ctx: &TenantContext,
        entry: &JournalEntry,
    ) -> Result<i64, StoreError>;

    /// Fetches an entry with its lines.
    async fn get_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Transitions an entry's status, conditional on its current status.
    ///
    /// Returns `true` if the transition applied, `false` if the entry
    /// was no longer in `expected` status.
    async fn update_entry_status(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        expected: EntryStatus,
        change: &StatusChange,
    ) -> Result<bool, StoreError>;

    /// Marks an entry voided and inserts its reversal, atomically.
    ///
    /// Returns the entry number assigned to the reversal. Fails with
    /// [`StoreError::PreconditionFailed`] if the original is no longer
    /// posted, in which case the reversal must not be written.
    async fn void_entry(
        &self,
        ctx: &TenantContext,
        original: EntryId,
        reversal: &JournalEntry,
        change: &VoidChange,
    ) -> Result<i64, StoreError>;

    /// Deletes a draft entry and its lines.
    ///
    /// Returns `true` if a draft was deleted, `false` if the entry was
    /// no longer a draft.
    async fn delete_draft_entry(&self, ctx: &TenantContext, id: EntryId)
    -> Result<bool, StoreError>;

    // ========== Aggregation ==========

    /// Sums posted base-currency debits and credits for one account.
    ///
    /// Covers entry dates in the half-open window `[from, before)`;
    /// `from = None` means from the beginning of time.
    async fn account_totals(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<(Decimal, Decimal), StoreError>;

    /// Sums posted base-currency debits and credits per account.
    ///
    /// Same window semantics as [`Self::account_totals`]. Accounts with
    /// no posted activity in the window are omitted.
    async fn account_activity(
        &self,
        ctx: &TenantContext,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<Vec<AccountActivity>, StoreError>;
}
