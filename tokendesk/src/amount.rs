//! Fixed-point handling of user-entered token amounts.
//!
//! Amounts are typed as decimal strings (`"1.5"`) and have to be turned into
//! the integer base units an SPL instruction carries. Scaling goes through
//! [`rust_decimal::Decimal`] and integer arithmetic so that `"0.1"` with nine
//! decimals is exactly `100_000_000` base units.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// A strictly positive token amount in display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount(Decimal);

impl TokenAmount {
    /// Parses a user-entered amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] for empty, non-numeric, zero
    /// or negative input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidAmount {
            input: trimmed.to_owned(),
            purpose: None,
        };
        let value = Decimal::from_str(trimmed).map_err(|_| invalid())?;
        if value <= Decimal::ZERO {
            return Err(invalid());
        }
        Ok(Self(value.normalize()))
    }

    /// Returns the amount as a decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Scales the amount to integer base units for a mint with `decimals`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ExcessPrecision`] if the amount has more
    /// fractional digits than `decimals`, and [`ValidationError::AmountOverflow`]
    /// if the result does not fit into a `u64`.
    pub fn to_base_units(&self, decimals: u8) -> Result<u64, ValidationError> {
        let decimals_u32 = u32::from(decimals);
        let scale = self.0.scale();
        if scale > decimals_u32 {
            return Err(ValidationError::ExcessPrecision {
                amount: self.to_string(),
                decimals,
            });
        }
        let overflow = || ValidationError::AmountOverflow {
            amount: self.to_string(),
            decimals,
        };
        let factor = 10i128
            .checked_pow(decimals_u32 - scale)
            .ok_or_else(overflow)?;
        let raw = self.0.mantissa().checked_mul(factor).ok_or_else(overflow)?;
        u64::try_from(raw).map_err(|_| overflow())
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts integer base units back to display units.
#[must_use]
pub fn from_base_units(raw: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(raw), u32::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_fractional_amount() {
        let amount = TokenAmount::parse("1.5").unwrap();
        assert_eq!(amount.to_base_units(2).unwrap(), 150);
    }

    #[test]
    fn test_scales_without_float_error() {
        let amount = TokenAmount::parse("0.1").unwrap();
        assert_eq!(amount.to_base_units(9).unwrap(), 100_000_000);
        let amount = TokenAmount::parse("1234567.891234567").unwrap();
        assert_eq!(amount.to_base_units(9).unwrap(), 1_234_567_891_234_567);
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let amount = TokenAmount::parse("2.500").unwrap();
        assert_eq!(amount.to_base_units(1).unwrap(), 25);
    }

    #[test]
    fn test_whole_amount_with_zero_decimals() {
        let amount = TokenAmount::parse("42").unwrap();
        assert_eq!(amount.to_base_units(0).unwrap(), 42);
    }

    #[test]
    fn test_rejects_non_positive_and_garbage() {
        for input in ["", "  ", "0", "0.000", "-1", "abc", "1.2.3"] {
            assert!(
                matches!(
                    TokenAmount::parse(input),
                    Err(ValidationError::InvalidAmount { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_excess_precision() {
        let amount = TokenAmount::parse("1.005").unwrap();
        assert_eq!(
            amount.to_base_units(2),
            Err(ValidationError::ExcessPrecision {
                amount: "1.005".to_owned(),
                decimals: 2,
            })
        );
    }

    #[test]
    fn test_rejects_overflow() {
        let amount = TokenAmount::parse("18446744073709551616").unwrap();
        assert!(matches!(
            amount.to_base_units(0),
            Err(ValidationError::AmountOverflow { .. })
        ));
        let amount = TokenAmount::parse("20000000000").unwrap();
        assert!(matches!(
            amount.to_base_units(9),
            Err(ValidationError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(1_500_000_000, 9).to_string(), "1.500000000");
        assert_eq!(from_base_units(150, 2).normalize().to_string(), "1.5");
    }
}
