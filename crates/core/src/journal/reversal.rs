//! Reversing entries for voiding posted journal entries.
//!
//! A posted entry is never edited or deleted. Voiding it posts a new
//! entry that mirrors the original line for line with debits and
//! credits swapped, so the pair nets to zero in every account.

use chrono::{DateTime, NaiveDate, Utc};

use tally_shared::{EntryId, LineId, UserId};

use super::entry::{JournalEntry, JournalLine, SourceRef};
use super::status::EntryStatus;

/// Builds the reversing entry for `original`.
///
/// The reversal is born posted: it exists only to cancel the original
/// and must never sit around as an editable draft. Its entry number is
/// assigned by the store at insert time.
#[must_use]
pub fn build_reversal(
    original: &JournalEntry,
    entry_date: NaiveDate,
    now: DateTime<Utc>,
    created_by: UserId,
    reason: &str,
) -> JournalEntry {
    let id = EntryId::new();
    let lines = original
        .lines
        .iter()
        .map(|line| JournalLine {
            id: LineId::new(),
            entry_id: id,
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            currency: line.currency.clone(),
            exchange_rate: line.exchange_rate,
            base_debit: line.base_credit,
            base_credit: line.base_debit,
        })
        .collect();

    JournalEntry {
        id,
        tenant_id: original.tenant_id,
        entry_number: 0,
        entry_date,
        description: format!(
            "Reversal of entry #{}. Reason: {reason}",
            original.entry_number
        ),
        reference: original.reference.clone(),
        source: Some(SourceRef {
            source_type: "reversal".to_string(),
            source_id: original.id.into_inner(),
        }),
        status: EntryStatus::Posted,
        posted_at: Some(now),
        posted_by: Some(created_by),
        voided_at: None,
        voided_by: None,
        void_reason: None,
        created_at: now,
        created_by,
        lines,
    }
}

/// Returns true if `reversal` is an exact line-for-line mirror of
/// `original`: same accounts in the same order, with each line's debit
/// equal to the other's credit in both line and base currency.
#[must_use]
pub fn mirrors(original: &JournalEntry, reversal: &JournalEntry) -> bool {
    if original.lines.len() != reversal.lines.len() {
        return false;
    }
    original
        .lines
        .iter()
        .zip(reversal.lines.iter())
        .all(|(orig, rev)| {
            orig.account_id == rev.account_id
                && orig.currency == rev.currency
                && orig.exchange_rate == rev.exchange_rate
                && orig.debit == rev.credit
                && orig.credit == rev.debit
                && orig.base_debit == rev.base_credit
                && orig.base_credit == rev.base_debit
        })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_shared::{AccountId, TenantId};

    use super::*;

    fn posted_entry() -> JournalEntry {
        let id = EntryId::new();
        let now = Utc::now();
        let make_line = |debit: Decimal, credit: Decimal| JournalLine {
            id: LineId::new(),
            entry_id: id,
            account_id: AccountId::new(),
            debit,
            credit,
            currency: "USD".to_string(),
            exchange_rate: dec!(1),
            base_debit: debit,
            base_credit: credit,
        };
        JournalEntry {
            id,
            tenant_id: TenantId::new(),
            entry_number: 42,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "Office supplies".to_string(),
            reference: Some("INV-100".to_string()),
            source: None,
            status: EntryStatus::Posted,
            posted_at: Some(now),
            posted_by: Some(UserId::new()),
            voided_at: None,
            voided_by: None,
            void_reason: None,
            created_at: now,
            created_by: UserId::new(),
            lines: vec![make_line(dec!(100), dec!(0)), make_line(dec!(0), dec!(100))],
        }
    }

    #[test]
    fn reversal_swaps_sides() {
        let original = posted_entry();
        let reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Duplicate entry",
        );

        assert_eq!(reversal.lines.len(), 2);
        assert_eq!(reversal.lines[0].credit, dec!(100));
        assert_eq!(reversal.lines[0].debit, dec!(0));
        assert_eq!(reversal.lines[1].debit, dec!(100));
        assert_eq!(reversal.lines[0].account_id, original.lines[0].account_id);
        assert!(reversal.totals().is_balanced());
    }

    #[test]
    fn reversal_is_born_posted() {
        let original = posted_entry();
        let reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Error",
        );
        assert_eq!(reversal.status, EntryStatus::Posted);
        assert!(reversal.posted_at.is_some());
    }

    #[test]
    fn reversal_links_back_to_original() {
        let original = posted_entry();
        let reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Duplicate entry",
        );
        let source = reversal.source.unwrap();
        assert_eq!(source.source_type, "reversal");
        assert_eq!(source.source_id, original.id.into_inner());
        assert!(reversal.description.contains("Reversal of entry #42"));
        assert!(reversal.description.contains("Duplicate entry"));
    }

    #[test]
    fn built_reversal_mirrors_original() {
        let original = posted_entry();
        let reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Error",
        );
        assert!(mirrors(&original, &reversal));
    }

    #[test]
    fn mirror_check_rejects_amount_drift() {
        let original = posted_entry();
        let mut reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Error",
        );
        reversal.lines[0].credit = dec!(99);
        assert!(!mirrors(&original, &reversal));
    }

    #[test]
    fn mirror_check_rejects_wrong_account() {
        let original = posted_entry();
        let mut reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Error",
        );
        reversal.lines[1].account_id = AccountId::new();
        assert!(!mirrors(&original, &reversal));
    }

    #[test]
    fn mirror_check_rejects_line_count_mismatch() {
        let original = posted_entry();
        let mut reversal = build_reversal(
            &original,
            original.entry_date,
            Utc::now(),
            UserId::new(),
            "Error",
        );
        reversal.lines.pop();
        assert!(!mirrors(&original, &reversal));
    }
}
