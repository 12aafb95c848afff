//! Checkout

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartLine},
    ids::{OrderId, ServiceId, UserId},
};

/// The cart had no lines when checkout was requested.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot check out an empty cart")]
pub struct EmptyCart;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer
    Bank,

    /// Cash on delivery
    Cod,

    /// Settled later at the counter
    Unpaid,
}

impl PaymentMethod {
    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Bank => "bank",
            PaymentMethod::Cod => "cod",
            PaymentMethod::Unpaid => "unpaid",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Bank => "Bank transfer",
            PaymentMethod::Cod => "Cash on delivery",
            PaymentMethod::Unpaid => "Pay at counter",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method `{0}`, expected bank, cod or unpaid")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank" | "transfer" => Ok(PaymentMethod::Bank),
            "cod" => Ok(PaymentMethod::Cod),
            "unpaid" => Ok(PaymentMethod::Unpaid),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Snapshot of a cart taken when the customer proceeds to checkout.
///
/// Prices are frozen at snapshot time; later catalog changes do not affect
/// `total`. The idempotency key is reused by every submission of the same
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheckout {
    /// Cart lines at snapshot time
    pub items: Vec<CartLine>,

    /// Total at snapshot time
    pub total: Decimal,

    /// Key sent with the order submission
    pub idempotency_key: Uuid,
}

impl PendingCheckout {
    /// Snapshot `cart` with a fresh idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCart`] if the cart has no lines.
    pub fn from_cart(cart: &Cart) -> Result<Self, EmptyCart> {
        if cart.is_empty() {
            return Err(EmptyCart);
        }

        Ok(PendingCheckout {
            items: cart.lines().to_vec(),
            total: cart.total(),
            idempotency_key: Uuid::now_v7(),
        })
    }

    /// Build the order request for this snapshot.
    pub fn order_request(
        &self,
        payment_method: PaymentMethod,
        customer_id: Option<UserId>,
    ) -> NewOrderRequest {
        NewOrderRequest {
            items: self
                .items
                .iter()
                .map(|line| NewOrderItem {
                    service_id: line.service_id,
                    quantity: line.quantity.value(),
                })
                .collect(),
            payment_method,
            customer_id,
        }
    }
}

/// One line of an order submission. Prices are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// Service id
    pub service_id: ServiceId,

    /// Quantity
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    /// Ordered services
    pub items: Vec<NewOrderItem>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Customer the order is placed for (counter intake)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
}

/// Where a checkout session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStage {
    /// Building the cart, nothing snapshotted.
    Selecting,

    /// A snapshot is waiting to be paid for.
    AwaitingPayment(PendingCheckout),

    /// The order was created.
    Confirmed(OrderId),
}

impl CheckoutStage {
    /// The snapshot, when one is pending.
    pub fn pending(&self) -> Option<&PendingCheckout> {
        match self {
            CheckoutStage::AwaitingPayment(pending) => Some(pending),
            _ => None,
        }
    }
}
