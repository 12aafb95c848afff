//! Payment

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local payment validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The tendered amount does not cover the total.
    #[error("insufficient payment: received {received}, due {due}")]
    Insufficient {
        /// Amount tendered
        received: Decimal,

        /// Order total
        due: Decimal,
    },

    /// Zero or negative amount.
    #[error("payment amount must be positive")]
    NonPositive,
}

/// A validated cash payment for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashTender {
    amount: Decimal,
    due: Decimal,
}

impl CashTender {
    /// Validate `amount` against `due`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] when the amount is not positive or is below the total.
    pub fn new(amount: Decimal, due: Decimal) -> Result<Self, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositive);
        }

        if amount < due {
            return Err(PaymentError::Insufficient {
                received: amount,
                due,
            });
        }

        Ok(CashTender { amount, due })
    }

    /// Amount handed over.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Change the cashier expects to return.
    pub fn expected_change(&self) -> Decimal {
        self.amount.saturating_sub(self.due)
    }

    /// Body of `POST /orders/:id/pay`.
    pub fn request(&self) -> PaymentRequest {
        PaymentRequest {
            amount_paid: self.amount,
        }
    }
}

/// Body of the pay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Cash received
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
}

/// The backend's record of a settled payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Amount recorded as paid
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,

    /// Change returned to the customer
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
}
