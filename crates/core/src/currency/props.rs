//! Property tests for currency conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{BASE_SCALE, CurrencyConverter};

fn amounts() -> impl Strategy<Value = Decimal> {
    // Up to a trillion at 2 decimal places, both signs.
    (-100_000_000_000_000_i64..=100_000_000_000_000_i64).prop_map(|m| Decimal::new(m, 2))
}

fn rates() -> impl Strategy<Value = Decimal> {
    // Strictly positive rates at 6 decimal places, up to a million.
    (1_i64..=1_000_000_000_000_i64).prop_map(|m| Decimal::new(m, 6))
}

proptest! {
    #[test]
    fn conversion_never_exceeds_base_scale(amount in amounts(), rate in rates()) {
        let converter = CurrencyConverter::new();
        let converted = converter.to_base(amount, rate).unwrap();
        prop_assert!(converted.scale() <= BASE_SCALE);
    }

    #[test]
    fn conversion_preserves_sign(amount in amounts(), rate in rates()) {
        let converter = CurrencyConverter::new();
        let converted = converter.to_base(amount, rate).unwrap();
        if amount.is_zero() {
            prop_assert!(converted.is_zero());
        } else {
            // Rounding can collapse tiny products to zero but never flip sign.
            prop_assert!(converted.is_zero()
                || converted.is_sign_positive() == amount.is_sign_positive());
        }
    }

    #[test]
    fn rounding_error_is_at_most_half_ulp(amount in amounts(), rate in rates()) {
        let converter = CurrencyConverter::new();
        let exact = amount * rate;
        let converted = converter.to_base(amount, rate).unwrap();
        let half_ulp = dec!(0.000000005);
        prop_assert!((exact - converted).abs() <= half_ulp);
    }

    #[test]
    fn round_trip_stays_within_one_ulp(
        amount in amounts(),
        rate in (1_000_000_i64..=1_000_000_000_i64).prop_map(|m| Decimal::new(m, 6)),
    ) {
        // Converting at r and back at 1/r loses at most one unit at
        // BASE_SCALE when r >= 1.
        let converter = CurrencyConverter::new();
        let inverse = Decimal::ONE / rate;
        let there = converter.to_base(amount, rate).unwrap();
        let back = converter.to_base(there, inverse).unwrap();
        prop_assert!((back - amount).abs() <= dec!(0.00000001));
    }

    #[test]
    fn rounding_is_idempotent(amount in amounts(), rate in rates()) {
        let converter = CurrencyConverter::new();
        let once = converter.to_base(amount, rate).unwrap();
        let twice = CurrencyConverter::round(once, BASE_SCALE);
        prop_assert_eq!(once, twice);
    }
}
