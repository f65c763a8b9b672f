//! Journal entry and line records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_shared::{AccountId, EntryId, LineId, TenantId, UserId};

use super::status::EntryStatus;

/// Link back to the business document an entry was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Kind of source document (e.g. "invoice", "payment").
    pub source_type: String,
    /// ID of the source document.
    pub source_id: Uuid,
}

/// A journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry ID.
    pub id: EntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Tenant-scoped sequential number, assigned at insert.
    pub entry_number: i64,
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Human-readable description.
    pub description: String,
    /// Optional external reference (e.g. document number).
    pub reference: Option<String>,
    /// Optional source document link.
    pub source: Option<SourceRef>,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// When the entry was posted, if ever.
    pub posted_at: Option<DateTime<Utc>>,
    /// Who posted the entry.
    pub posted_by: Option<UserId>,
    /// When the entry was voided, if ever.
    pub voided_at: Option<DateTime<Utc>>,
    /// Who voided the entry.
    pub voided_by: Option<UserId>,
    /// Reason given when voiding.
    pub void_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Who created the entry.
    pub created_by: UserId,
    /// The entry's lines, in creation order.
    pub lines: Vec<JournalLine>,
}

/// One line of a journal entry.
///
/// Exactly one of `debit` and `credit` is strictly positive; the other
/// is zero. `base_debit`/`base_credit` hold the same side converted
/// into base currency, and are what balancing and balances sum over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique line ID.
    pub id: LineId,
    /// Owning entry.
    pub entry_id: EntryId,
    /// Account this line hits.
    pub account_id: AccountId,
    /// Debit amount in line currency (zero if credit).
    pub debit: Decimal,
    /// Credit amount in line currency (zero if debit).
    pub credit: Decimal,
    /// ISO 4217 currency code of the line amounts.
    pub currency: String,
    /// Exchange rate from line currency to base currency.
    pub exchange_rate: Decimal,
    /// Debit converted into base currency.
    pub base_debit: Decimal,
    /// Credit converted into base currency.
    pub base_credit: Decimal,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDraft {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Optional source document link.
    pub source: Option<SourceRef>,
    /// The lines; at least two.
    pub lines: Vec<LineDraft>,
}

/// Input for one line of a new entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LineDraft {
    /// Account this line hits.
    pub account_id: AccountId,
    /// Debit amount in line currency (zero if credit).
    pub debit: Decimal,
    /// Credit amount in line currency (zero if debit).
    pub credit: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Exchange rate to base currency; use 1 for base-currency lines.
    pub exchange_rate: Decimal,
}

/// Base-currency totals of an entry's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of base-currency debits.
    pub base_debit: Decimal,
    /// Sum of base-currency credits.
    pub base_credit: Decimal,
}

impl EntryTotals {
    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.base_debit == self.base_credit
    }
}

impl JournalEntry {
    /// Sums this entry's base-currency debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals {
            base_debit: self.lines.iter().map(|l| l.base_debit).sum(),
            base_credit: self.lines.iter().map(|l| l.base_credit).sum(),
        }
    }
}
