//! Hand-written mapping between entity rows and domain types.
//!
//! Kept explicit so a schema drift shows up as a compile error here
//! rather than as silently misread data.

use chrono::Utc;
use sea_orm::Set;

use tally_core::journal::{EntryStatus, JournalEntry, JournalLine, SourceRef};
use tally_core::registry::{Account, AccountType};
use tally_shared::{AccountId, EntryId, LineId, TenantId, UserId};

use crate::entities::{accounts, journal_entries, journal_entry_lines, sea_orm_active_enums};

impl From<sea_orm_active_enums::AccountType> for AccountType {
    fn from(value: sea_orm_active_enums::AccountType) -> Self {
        match value {
            sea_orm_active_enums::AccountType::Asset => Self::Asset,
            sea_orm_active_enums::AccountType::Liability => Self::Liability,
            sea_orm_active_enums::AccountType::Equity => Self::Equity,
            sea_orm_active_enums::AccountType::Revenue => Self::Revenue,
            sea_orm_active_enums::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for sea_orm_active_enums::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<sea_orm_active_enums::EntryStatus> for EntryStatus {
    fn from(value: sea_orm_active_enums::EntryStatus) -> Self {
        match value {
            sea_orm_active_enums::EntryStatus::Draft => Self::Draft,
            sea_orm_active_enums::EntryStatus::Posted => Self::Posted,
            sea_orm_active_enums::EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<EntryStatus> for sea_orm_active_enums::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}

/// Converts an accounts row into the domain account.
#[must_use]
pub fn account_from_row(row: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(row.id),
        tenant_id: TenantId::from_uuid(row.tenant_id),
        code: row.code,
        name: row.name,
        description: row.description,
        account_type: row.account_type.into(),
        parent_id: row.parent_id.map(AccountId::from_uuid),
        is_active: row.is_active,
        is_system: row.is_system,
        created_at: row.created_at.with_timezone(&Utc),
        updated_at: row.updated_at.with_timezone(&Utc),
    }
}

/// Converts a domain account into an insert/update model.
#[must_use]
pub fn account_into_row(account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        tenant_id: Set(account.tenant_id.into_inner()),
        code: Set(account.code.clone()),
        name: Set(account.name.clone()),
        description: Set(account.description.clone()),
        account_type: Set(account.account_type.into()),
        parent_id: Set(account.parent_id.map(AccountId::into_inner)),
        is_active: Set(account.is_active),
        is_system: Set(account.is_system),
        created_at: Set(account.created_at.into()),
        updated_at: Set(account.updated_at.into()),
    }
}

/// Reassembles a domain entry from its header row and line rows.
///
/// Lines are ordered by their stored position.
#[must_use]
pub fn entry_from_rows(
    header: journal_entries::Model,
    mut lines: Vec<journal_entry_lines::Model>,
) -> JournalEntry {
    lines.sort_by_key(|line| line.position);
    let source = match (header.source_type, header.source_id) {
        (Some(source_type), Some(source_id)) => Some(SourceRef {
            source_type,
            source_id,
        }),
        _ => None,
    };
    JournalEntry {
        id: EntryId::from_uuid(header.id),
        tenant_id: TenantId::from_uuid(header.tenant_id),
        entry_number: header.entry_number,
        entry_date: header.entry_date,
        description: header.description,
        reference: header.reference,
        source,
        status: header.status.into(),
        posted_at: header.posted_at.map(|at| at.with_timezone(&Utc)),
        posted_by: header.posted_by.map(UserId::from_uuid),
        voided_at: header.voided_at.map(|at| at.with_timezone(&Utc)),
        voided_by: header.voided_by.map(UserId::from_uuid),
        void_reason: header.void_reason,
        created_at: header.created_at.with_timezone(&Utc),
        created_by: UserId::from_uuid(header.created_by),
        lines: lines.into_iter().map(line_from_row).collect(),
    }
}

fn line_from_row(row: journal_entry_lines::Model) -> JournalLine {
    JournalLine {
        id: LineId::from_uuid(row.id),
        entry_id: EntryId::from_uuid(row.entry_id),
        account_id: AccountId::from_uuid(row.account_id),
        debit: row.debit,
        credit: row.credit,
        currency: row.currency,
        exchange_rate: row.exchange_rate,
        base_debit: row.base_debit,
        base_credit: row.base_credit,
    }
}

/// Converts a domain entry header into an insert model.
///
/// `entry_number` must already hold the number assigned for this
/// tenant.
#[must_use]
pub fn entry_into_row(entry: &JournalEntry, entry_number: i64) -> journal_entries::ActiveModel {
    journal_entries::ActiveModel {
        id: Set(entry.id.into_inner()),
        tenant_id: Set(entry.tenant_id.into_inner()),
        entry_number: Set(entry_number),
        entry_date: Set(entry.entry_date),
        description: Set(entry.description.clone()),
        reference: Set(entry.reference.clone()),
        source_type: Set(entry.source.as_ref().map(|s| s.source_type.clone())),
        source_id: Set(entry.source.as_ref().map(|s| s.source_id)),
        status: Set(entry.status.into()),
        posted_at: Set(entry.posted_at.map(Into::into)),
        posted_by: Set(entry.posted_by.map(UserId::into_inner)),
        voided_at: Set(entry.voided_at.map(Into::into)),
        voided_by: Set(entry.voided_by.map(UserId::into_inner)),
        void_reason: Set(entry.void_reason.clone()),
        created_at: Set(entry.created_at.into()),
        created_by: Set(entry.created_by.into_inner()),
    }
}

/// Converts one domain line into an insert model at `position`.
#[must_use]
pub fn line_into_row(line: &JournalLine, position: i32) -> journal_entry_lines::ActiveModel {
    journal_entry_lines::ActiveModel {
        id: Set(line.id.into_inner()),
        entry_id: Set(line.entry_id.into_inner()),
        position: Set(position),
        account_id: Set(line.account_id.into_inner()),
        debit: Set(line.debit),
        credit: Set(line.credit),
        currency: Set(line.currency.clone()),
        exchange_rate: Set(line.exchange_rate),
        base_debit: Set(line.base_debit),
        base_credit: Set(line.base_credit),
    }
}
