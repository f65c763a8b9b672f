//! Balance queries over posted journal entries.
//!
//! Only posted entries contribute to balances; drafts are invisible
//! and a voided entry cancels against its reversal, so the sums here
//! already reflect voids without any special casing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tally_shared::{AccountId, TenantContext};

use crate::error::LedgerError;
use crate::registry::AccountType;
use crate::store::{AccountActivity, LedgerStore};

/// An account's debit/credit totals and net balance.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total base-currency debits.
    pub debit: Decimal,
    /// Total base-currency credits.
    pub credit: Decimal,
    /// Net balance on the account's normal side.
    pub net: Decimal,
}

/// Computes the net balance on an account's normal side.
///
/// Debit-normal accounts (assets, expenses) net `debit - credit`;
/// credit-normal accounts net `credit - debit`.
#[must_use]
pub fn net_balance(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    if account_type.is_debit_normal() {
        debit - credit
    } else {
        credit - debit
    }
}

/// Read-side queries over posted entries.
#[derive(Debug, Clone)]
pub struct BalanceQuery<S> {
    store: S,
}

impl<S: LedgerStore> BalanceQuery<S> {
    /// Creates a query service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns one account's balance as of the end of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the account does not
    /// exist for this tenant.
    pub async fn account_balance(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<AccountBalance, LedgerError> {
        let account = self
            .store
            .get_account(ctx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        let (debit, credit) = self
            .store
            .account_totals(ctx, account_id, None, day_after(as_of))
            .await?;

        Ok(AccountBalance {
            account_id,
            code: account.code,
            name: account.name,
            account_type: account.account_type,
            debit,
            credit,
            net: net_balance(account.account_type, debit, credit),
        })
    }

    /// Returns all accounts with posted activity up to and including
    /// `as_of`, ordered by account code.
    ///
    /// Total debits always equal total credits across the result,
    /// since every contributing entry is individually balanced.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub async fn trial_balance(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        let activity = self
            .store
            .account_activity(ctx, None, day_after(as_of))
            .await?;
        Ok(to_balances(activity))
    }

    /// Returns per-account activity within the half-open window
    /// `[start, end)`, ordered by account code.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDateRange`] if `start` is after
    /// `end`.
    pub async fn period_balances(
        &self,
        ctx: &TenantContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        let activity = self.store.account_activity(ctx, Some(start), end).await?;
        Ok(to_balances(activity))
    }
}

/// Exclusive upper bound covering all of `date`.
fn day_after(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

fn to_balances(activity: Vec<AccountActivity>) -> Vec<AccountBalance> {
    let mut balances: Vec<AccountBalance> = activity
        .into_iter()
        .filter(|row| !row.debit.is_zero() || !row.credit.is_zero())
        .map(|row| AccountBalance {
            net: net_balance(row.account_type, row.debit, row.credit),
            account_id: row.account_id,
            code: row.code,
            name: row.name,
            account_type: row.account_type,
            debit: row.debit,
            credit: row.credit,
        })
        .collect();
    balances.sort_by(|a, b| a.code.cmp(&b.code));
    balances
}
