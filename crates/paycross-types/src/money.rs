//! Exact base-10 amount scaling.
//!
//! Final stored amounts must never pass through binary floating point (see
//! SPEC_FULL.md §9, "Fee arithmetic"). [`rust_decimal::Decimal`] gives us a
//! base-10 fixed-point type; the helpers here convert between a token's
//! smallest-unit integer representation (`u128`, e.g. wei or an SPL token's
//! raw amount) and its human decimal representation, and back, without ever
//! routing through `f64`.

use rust_decimal::Decimal;
use std::fmt;

/// An exact decimal amount of smallest-unit tokens, paired with its decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledAmount {
    /// Smallest-unit integer amount (e.g. wei, or an SPL token's raw amount).
    pub smallest_unit: u128,
    /// Number of decimal places the token uses.
    pub decimals: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum MoneyError {
    #[error("amount {0:?} is not a valid non-negative decimal string")]
    InvalidAmount(String),
    #[error("decimal scale {0} exceeds the supported maximum of 28")]
    ScaleTooLarge(u8),
    #[error("amount does not fit in a u128 smallest-unit representation")]
    Overflow,
}

impl ScaledAmount {
    pub fn new(smallest_unit: u128, decimals: u8) -> Self {
        Self {
            smallest_unit,
            decimals,
        }
    }

    /// Parses a human decimal string (e.g. `"12.5"`) into smallest-unit
    /// integer form at the given number of decimals, with exact base-10
    /// scaling (no `f64` intermediate).
    pub fn from_human_decimal(amount: &str, decimals: u8) -> Result<Self, MoneyError> {
        if decimals > 28 {
            return Err(MoneyError::ScaleTooLarge(decimals));
        }
        let parsed = amount
            .trim()
            .parse::<Decimal>()
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        if parsed.is_sign_negative() {
            return Err(MoneyError::InvalidAmount(amount.to_string()));
        }
        let scale = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
        let scaled = (parsed * scale).round();
        let smallest_unit: u128 = scaled
            .to_string()
            .parse()
            .map_err(|_| MoneyError::Overflow)?;
        Ok(Self {
            smallest_unit,
            decimals,
        })
    }

    /// Renders the smallest-unit amount back to its human decimal string.
    pub fn to_human_decimal(self) -> String {
        let mut decimal = Decimal::from(self.smallest_unit);
        decimal.set_scale(self.decimals as u32).ok();
        decimal.normalize().to_string()
    }

    pub fn as_decimal(self) -> Decimal {
        let mut decimal = Decimal::from(self.smallest_unit);
        decimal.set_scale(self.decimals as u32).ok();
        decimal
    }
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_human_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_human_decimal_exactly() {
        let amount = ScaledAmount::from_human_decimal("12.5", 6).unwrap();
        assert_eq!(amount.smallest_unit, 12_500_000);
    }

    #[test]
    fn renders_smallest_unit_back_to_decimal() {
        let amount = ScaledAmount::new(1_250_000, 6);
        assert_eq!(amount.to_human_decimal(), "1.25");
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(ScaledAmount::from_human_decimal("-1", 6).is_err());
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(ScaledAmount::from_human_decimal("not-a-number", 6).is_err());
    }

    #[test]
    fn zero_decimals_round_trips_integers() {
        let amount = ScaledAmount::from_human_decimal("42", 0).unwrap();
        assert_eq!(amount.smallest_unit, 42);
        assert_eq!(amount.to_human_decimal(), "42");
    }
}
