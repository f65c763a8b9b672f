//! In-memory `LedgerStore` for engine and query tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_core::journal::{EntryStatus, JournalEntry};
use tally_core::registry::Account;
use tally_core::store::{AccountActivity, LedgerStore, StatusChange, StoreError, VoidChange};
use tally_shared::{AccountId, EntryId, TenantContext, TenantId};

type Key = (String, TenantId);

#[derive(Debug, Default)]
struct State {
    accounts: Vec<(Key, Account)>,
    entries: Vec<(Key, JournalEntry)>,
    counters: HashMap<Key, i64>,
}

/// Stores everything in a mutex-guarded vec; good enough for tests and
/// honest about the conditional-write semantics the engine relies on.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<State>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(ctx: &TenantContext) -> Key {
        (ctx.schema.clone(), ctx.tenant_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

fn in_window(date: NaiveDate, from: Option<NaiveDate>, before: NaiveDate) -> bool {
    from.is_none_or(|f| date >= f) && date < before
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_account(
        &self,
        ctx: &TenantContext,
        account: &Account,
    ) -> Result<(), StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();
        // Same uniqueness the database enforces on (tenant_id, code).
        if state
            .accounts
            .iter()
            .any(|(k, a)| *k == key && a.code == account.code)
        {
            return Err(StoreError::UniqueViolation);
        }
        state.accounts.push((key, account.clone()));
        Ok(())
    }

    async fn update_account(
        &self,
        ctx: &TenantContext,
        account: &Account,
    ) -> Result<(), StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();
        for (k, stored) in &mut state.accounts {
            if *k == key && stored.id == account.id {
                *stored = account.clone();
                return Ok(());
            }
        }
        Err(StoreError::Backend("account not found".to_string()))
    }

    async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .find(|(k, a)| *k == key && a.id == id)
            .map(|(_, a)| a.clone()))
    }

    async fn find_account_by_code(
        &self,
        ctx: &TenantContext,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .find(|(k, a)| *k == key && a.code == code)
            .map(|(_, a)| a.clone()))
    }

    async fn list_accounts(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<Account>, StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        let mut accounts: Vec<Account> = state
            .accounts
            .iter()
            .filter(|(k, a)| *k == key && (!active_only || a.is_active))
            .map(|(_, a)| a.clone())
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn insert_entry(
        &self,
        ctx: &TenantContext,
        entry: &JournalEntry,
    ) -> Result<i64, StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();
        let number = state.counters.entry(key.clone()).or_insert(0);
        *number += 1;
        let number = *number;
        let mut entry = entry.clone();
        entry.entry_number = number;
        state.entries.push((key, entry));
        Ok(number)
    }

    async fn get_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        Ok(state
            .entries
            .iter()
            .find(|(k, e)| *k == key && e.id == id)
            .map(|(_, e)| e.clone()))
    }

    async fn update_entry_status(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        expected: EntryStatus,
        change: &StatusChange,
    ) -> Result<bool, StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();
        for (k, entry) in &mut state.entries {
            if *k == key && entry.id == id {
                if entry.status != expected {
                    return Ok(false);
                }
                entry.status = change.status;
                if change.status == EntryStatus::Posted {
                    entry.posted_at = Some(change.at);
                    entry.posted_by = Some(change.by);
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn void_entry(
        &self,
        ctx: &TenantContext,
        original: EntryId,
        reversal: &JournalEntry,
        change: &VoidChange,
    ) -> Result<i64, StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();

        let mut found = false;
        for (k, entry) in &mut state.entries {
            if *k == key && entry.id == original {
                if entry.status != EntryStatus::Posted {
                    return Err(StoreError::PreconditionFailed);
                }
                entry.status = EntryStatus::Voided;
                entry.voided_at = Some(change.voided_at);
                entry.voided_by = Some(change.voided_by);
                entry.void_reason = Some(change.reason.clone());
                found = true;
                break;
            }
        }
        if !found {
            return Err(StoreError::PreconditionFailed);
        }

        let number = state.counters.entry(key.clone()).or_insert(0);
        *number += 1;
        let number = *number;
        let mut reversal = reversal.clone();
        reversal.entry_number = number;
        state.entries.push((key, reversal));
        Ok(number)
    }

    async fn delete_draft_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<bool, StoreError> {
        let key = Self::key(ctx);
        let mut state = self.lock();
        let before = state.entries.len();
        state
            .entries
            .retain(|(k, e)| !(*k == key && e.id == id && e.status == EntryStatus::Draft));
        Ok(state.entries.len() < before)
    }

    async fn account_totals(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<(Decimal, Decimal), StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for (k, entry) in &state.entries {
            if *k != key
                || entry.status != EntryStatus::Posted
                || !in_window(entry.entry_date, from, before)
            {
                continue;
            }
            for line in &entry.lines {
                if line.account_id == account_id {
                    debit += line.base_debit;
                    credit += line.base_credit;
                }
            }
        }
        Ok((debit, credit))
    }

    async fn account_activity(
        &self,
        ctx: &TenantContext,
        from: Option<NaiveDate>,
        before: NaiveDate,
    ) -> Result<Vec<AccountActivity>, StoreError> {
        let key = Self::key(ctx);
        let state = self.lock();
        let mut sums: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for (k, entry) in &state.entries {
            if *k != key
                || entry.status != EntryStatus::Posted
                || !in_window(entry.entry_date, from, before)
            {
                continue;
            }
            for line in &entry.lines {
                let slot = sums.entry(line.account_id).or_default();
                slot.0 += line.base_debit;
                slot.1 += line.base_credit;
            }
        }
        let activity = state
            .accounts
            .iter()
            .filter(|(k, _)| *k == key)
            .filter_map(|(_, account)| {
                sums.get(&account.id).map(|(debit, credit)| AccountActivity {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    debit: *debit,
                    credit: *credit,
                })
            })
            .collect();
        Ok(activity)
    }
}
