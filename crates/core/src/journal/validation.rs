//! Pure validation and conversion of entry drafts.
//!
//! These functions have no storage access; the engine calls them after
//! resolving accounts. Line amounts are converted to base currency here
//! so that the balance check always runs over rounded base amounts.

use rust_decimal::Decimal;

use tally_shared::{EntryId, LineId};

use crate::currency::CurrencyConverter;
use crate::error::LedgerError;

use super::entry::{EntryTotals, JournalLine, LineDraft};

/// Minimum number of lines a journal entry must carry.
pub const MIN_LINES: usize = 2;

/// Checks that each draft line carries exactly one positive side.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientLines`] for fewer than
/// [`MIN_LINES`] lines, or [`LedgerError::InvalidLine`] naming the
/// first offending line.
pub fn check_line_sides(lines: &[LineDraft]) -> Result<(), LedgerError> {
    if lines.len() < MIN_LINES {
        return Err(LedgerError::InsufficientLines);
    }
    for (index, line) in lines.iter().enumerate() {
        let debit_set = line.debit > Decimal::ZERO;
        let credit_set = line.credit > Decimal::ZERO;
        let negative = line.debit < Decimal::ZERO || line.credit < Decimal::ZERO;
        if negative || debit_set == credit_set {
            return Err(LedgerError::InvalidLine { index });
        }
    }
    Ok(())
}

/// Converts draft lines into [`JournalLine`]s with base amounts.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRate`] if any line's exchange rate is
/// not strictly positive.
pub fn resolve_lines(
    converter: &CurrencyConverter,
    entry_id: EntryId,
    drafts: &[LineDraft],
) -> Result<Vec<JournalLine>, LedgerError> {
    drafts
        .iter()
        .map(|draft| {
            let base_debit = converter.to_base(draft.debit, draft.exchange_rate)?;
            let base_credit = converter.to_base(draft.credit, draft.exchange_rate)?;
            Ok(JournalLine {
                id: LineId::new(),
                entry_id,
                account_id: draft.account_id,
                debit: draft.debit,
                credit: draft.credit,
                currency: draft.currency.clone(),
                exchange_rate: draft.exchange_rate,
                base_debit,
                base_credit,
            })
        })
        .collect()
}

/// Sums base-currency totals over resolved lines.
#[must_use]
pub fn totals(lines: &[JournalLine]) -> EntryTotals {
    EntryTotals {
        base_debit: lines.iter().map(|l| l.base_debit).sum(),
        base_credit: lines.iter().map(|l| l.base_credit).sum(),
    }
}

/// Checks that base-currency debits equal credits.
///
/// # Errors
///
/// Returns [`LedgerError::Unbalanced`] with both totals otherwise.
pub fn ensure_balanced(totals: EntryTotals) -> Result<(), LedgerError> {
    if totals.is_balanced() {
        Ok(())
    } else {
        Err(LedgerError::Unbalanced {
            debit: totals.base_debit,
            credit: totals.base_credit,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tally_shared::AccountId;

    use super::*;

    fn line(debit: Decimal, credit: Decimal) -> LineDraft {
        LineDraft {
            account_id: AccountId::new(),
            debit,
            credit,
            currency: "USD".to_string(),
            exchange_rate: dec!(1),
        }
    }

    #[test]
    fn accepts_one_positive_side() {
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        assert!(check_line_sides(&lines).is_ok());
    }

    #[test]
    fn rejects_single_line() {
        let lines = vec![line(dec!(100), dec!(0))];
        assert!(matches!(
            check_line_sides(&lines),
            Err(LedgerError::InsufficientLines)
        ));
    }

    #[test]
    fn rejects_both_sides_set() {
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(50), dec!(50))];
        assert!(matches!(
            check_line_sides(&lines),
            Err(LedgerError::InvalidLine { index: 1 })
        ));
    }

    #[test]
    fn rejects_neither_side_set() {
        let lines = vec![line(dec!(0), dec!(0)), line(dec!(0), dec!(100))];
        assert!(matches!(
            check_line_sides(&lines),
            Err(LedgerError::InvalidLine { index: 0 })
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        let lines = vec![line(dec!(-100), dec!(0)), line(dec!(0), dec!(100))];
        assert!(matches!(
            check_line_sides(&lines),
            Err(LedgerError::InvalidLine { index: 0 })
        ));
    }

    #[test]
    fn resolve_converts_to_base() {
        let converter = CurrencyConverter::new();
        let entry_id = EntryId::new();
        let drafts = vec![
            LineDraft {
                account_id: AccountId::new(),
                debit: dec!(100),
                credit: dec!(0),
                currency: "EUR".to_string(),
                exchange_rate: dec!(1.0875),
            },
            LineDraft {
                account_id: AccountId::new(),
                debit: dec!(0),
                credit: dec!(108.75),
                currency: "USD".to_string(),
                exchange_rate: dec!(1),
            },
        ];

        let lines = resolve_lines(&converter, entry_id, &drafts).unwrap();
        assert_eq!(lines[0].base_debit, dec!(108.75));
        assert_eq!(lines[0].base_credit, dec!(0));
        assert_eq!(lines[1].base_credit, dec!(108.75));
        assert!(ensure_balanced(totals(&lines)).is_ok());
    }

    #[test]
    fn resolve_rejects_bad_rate() {
        let converter = CurrencyConverter::new();
        let drafts = vec![LineDraft {
            account_id: AccountId::new(),
            debit: dec!(100),
            credit: dec!(0),
            currency: "EUR".to_string(),
            exchange_rate: dec!(0),
        }];
        assert!(matches!(
            resolve_lines(&converter, EntryId::new(), &drafts),
            Err(LedgerError::InvalidRate)
        ));
    }

    #[test]
    fn unbalanced_reports_totals() {
        let converter = CurrencyConverter::new();
        let drafts = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(90))];
        let lines = resolve_lines(&converter, EntryId::new(), &drafts).unwrap();
        match ensure_balanced(totals(&lines)) {
            Err(LedgerError::Unbalanced { debit, credit }) => {
                assert_eq!(debit, dec!(100));
                assert_eq!(credit, dec!(90));
            }
            other => panic!("expected Unbalanced, got {other:?}"),
        }
    }
}
