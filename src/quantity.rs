//! Quantities

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places kept for quantities (tenths of a kg).
pub const QUANTITY_SCALE: u32 = 1;

/// Largest quantity a single line can hold.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Why a value is not a valid quantity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative after rounding.
    #[error("quantity must be greater than zero, got {0}")]
    NonPositive(Decimal),

    /// Above [`MAX_QUANTITY`].
    #[error("quantity must be at most {max}, got {0}", max = MAX_QUANTITY)]
    TooLarge(Decimal),
}

/// A positive quantity with one decimal place, at most [`MAX_QUANTITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Rounds `value` to one decimal place and checks it is in range.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NonPositive`] when the rounded value is zero
    /// or below, and [`QuantityError::TooLarge`] above [`MAX_QUANTITY`].
    pub fn new(value: Decimal) -> Result<Self, QuantityError> {
        let rounded = round(value);

        if rounded <= Decimal::ZERO {
            Err(QuantityError::NonPositive(rounded))
        } else if rounded > MAX_QUANTITY {
            Err(QuantityError::TooLarge(rounded))
        } else {
            Ok(Self(rounded))
        }
    }

    /// Add two quantities, capping the result at [`MAX_QUANTITY`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(round(self.0 + other.0).min(MAX_QUANTITY))
    }

    /// Returns the underlying decimal value.
    pub fn value(self) -> Decimal {
        self.0
    }
}

/// Rounds a raw quantity the same way [`Quantity::new`] does.
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0.normalize(), f)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rounds_to_one_decimal_place() -> TestResult {
        let quantity = Quantity::new(Decimal::new(125, 2))?;

        assert_eq!(quantity.value(), Decimal::new(13, 1));

        Ok(())
    }

    #[test]
    fn rejects_zero_after_rounding() {
        let result = Quantity::new(Decimal::new(4, 2));

        assert_eq!(result, Err(QuantityError::NonPositive(Decimal::ZERO)));
    }

    #[test]
    fn rejects_values_above_the_cap() {
        assert_eq!(
            Quantity::new(Decimal::MAX),
            Err(QuantityError::TooLarge(Decimal::MAX))
        );
        assert!(Quantity::new(MAX_QUANTITY).is_ok());
    }

    #[test]
    fn saturating_add_stops_at_the_cap() -> TestResult {
        let near_cap = Quantity::new(MAX_QUANTITY - Decimal::ONE)?;

        assert_eq!(near_cap.saturating_add(Quantity::new(Decimal::TEN)?).value(), MAX_QUANTITY);

        Ok(())
    }

    #[test]
    fn rejects_negative() {
        assert!(Quantity::new(Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn deserializing_validates() {
        assert!(serde_json::from_str::<Quantity>("\"0\"").is_err());
        assert!(serde_json::from_str::<Quantity>("\"2.5\"").is_ok());
    }

    #[test]
    fn display_drops_trailing_zeros() -> TestResult {
        assert_eq!(Quantity::new(Decimal::new(20, 1))?.to_string(), "2");
        assert_eq!(Quantity::new(Decimal::new(25, 1))?.to_string(), "2.5");

        Ok(())
    }
}
