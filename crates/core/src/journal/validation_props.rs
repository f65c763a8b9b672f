//! Property tests for entry validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::{AccountId, EntryId};

use crate::currency::CurrencyConverter;

use super::validation::{check_line_sides, ensure_balanced, resolve_lines, totals};
use super::{EntryStatus, LineDraft};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1_i64..=10_000_000_000_i64).prop_map(|m| Decimal::new(m, 2))
}

fn rate() -> impl Strategy<Value = Decimal> {
    (1_i64..=100_000_000_i64).prop_map(|m| Decimal::new(m, 6))
}

/// A balanced pair: one amount debited and the same amount credited,
/// both in base currency.
fn balanced_pair() -> impl Strategy<Value = Vec<LineDraft>> {
    positive_amount().prop_map(|amount| {
        vec![
            LineDraft {
                account_id: AccountId::new(),
                debit: amount,
                credit: Decimal::ZERO,
                currency: "USD".to_string(),
                exchange_rate: Decimal::ONE,
            },
            LineDraft {
                account_id: AccountId::new(),
                debit: Decimal::ZERO,
                credit: amount,
                currency: "USD".to_string(),
                exchange_rate: Decimal::ONE,
            },
        ]
    })
}

proptest! {
    #[test]
    fn balanced_base_currency_pairs_always_validate(lines in balanced_pair()) {
        let converter = CurrencyConverter::new();
        prop_assert!(check_line_sides(&lines).is_ok());
        let resolved = resolve_lines(&converter, EntryId::new(), &lines).unwrap();
        prop_assert!(ensure_balanced(totals(&resolved)).is_ok());
    }

    #[test]
    fn same_rate_mirror_lines_stay_balanced(amount in positive_amount(), rate in rate()) {
        // Converting both sides of the same amount at the same rate
        // rounds identically, so the entry still balances.
        let converter = CurrencyConverter::new();
        let lines = vec![
            LineDraft {
                account_id: AccountId::new(),
                debit: amount,
                credit: Decimal::ZERO,
                currency: "EUR".to_string(),
                exchange_rate: rate,
            },
            LineDraft {
                account_id: AccountId::new(),
                debit: Decimal::ZERO,
                credit: amount,
                currency: "EUR".to_string(),
                exchange_rate: rate,
            },
        ];
        let resolved = resolve_lines(&converter, EntryId::new(), &lines).unwrap();
        prop_assert!(ensure_balanced(totals(&resolved)).is_ok());
    }

    #[test]
    fn tampering_one_side_breaks_balance(
        lines in balanced_pair(),
        extra in positive_amount(),
    ) {
        let converter = CurrencyConverter::new();
        let mut lines = lines;
        lines[0].debit += extra;
        let resolved = resolve_lines(&converter, EntryId::new(), &lines).unwrap();
        prop_assert!(ensure_balanced(totals(&resolved)).is_err());
    }

    #[test]
    fn negative_amounts_never_pass(lines in balanced_pair(), index in 0_usize..2) {
        let mut lines = lines;
        if lines[index].debit > Decimal::ZERO {
            lines[index].debit = -lines[index].debit;
        } else {
            lines[index].credit = -lines[index].credit;
        }
        prop_assert!(check_line_sides(&lines).is_err());
    }
}

#[test]
fn transition_targets_are_exhaustive() {
    // Every status has at most one legal successor.
    let all = [EntryStatus::Draft, EntryStatus::Posted, EntryStatus::Voided];
    for from in all {
        let successors = all
            .iter()
            .filter(|to| from.allows_transition(**to))
            .count();
        assert!(successors <= 1);
    }
}
