//! Fixed-point currency conversion.
//!
//! All ledger math is decimal; floats never touch monetary amounts.
//! Foreign-currency line amounts are converted into base currency at a
//! caller-supplied rate and rounded to [`BASE_SCALE`] decimal places
//! using round-half-away-from-zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::LedgerError;

/// Decimal scale of base-currency amounts.
///
/// Eight places keeps conversion residue well below any display
/// precision while staying inside `Decimal`'s 96-bit mantissa for
/// realistic amounts.
pub const BASE_SCALE: u32 = 8;

/// Converts foreign-currency amounts into base currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyConverter;

impl CurrencyConverter {
    /// Creates a converter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Converts `amount` at `rate` into base currency at [`BASE_SCALE`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRate`] if the rate is zero or
    /// negative.
    pub fn to_base(&self, amount: Decimal, rate: Decimal) -> Result<Decimal, LedgerError> {
        self.to_base_with_scale(amount, rate, BASE_SCALE)
    }

    /// Converts `amount` at `rate`, rounding to `scale` decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRate`] if the rate is zero or
    /// negative.
    pub fn to_base_with_scale(
        &self,
        amount: Decimal,
        rate: Decimal,
        scale: u32,
    ) -> Result<Decimal, LedgerError> {
        if rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidRate);
        }
        Ok(Self::round(amount * rate, scale))
    }

    /// Rounds half-away-from-zero to `scale` decimal places.
    #[must_use]
    pub fn round(value: Decimal, scale: u32) -> Decimal {
        value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod props;
