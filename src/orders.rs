//! Orders

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    checkout::PaymentMethod,
    ids::{OrderId, UserId},
    status::{OrderStatus, PaymentStatus},
};

/// Order header as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Payment status
    #[serde(default = "unpaid")]
    pub payment_status: PaymentStatus,

    /// Payment method as reported by the backend
    #[serde(default)]
    pub payment_method: Option<String>,

    /// Order total
    #[serde(with = "rust_decimal::serde::float", default)]
    pub total_price: Decimal,

    /// Customer name
    #[serde(default)]
    pub customer_name: Option<String>,

    /// Customer phone
    #[serde(default)]
    pub customer_phone: Option<String>,

    /// Assigned driver
    #[serde(default)]
    pub driver_id: Option<UserId>,

    /// Creation time, raw backend text
    #[serde(default)]
    pub created_at: Option<String>,
}

fn unpaid() -> PaymentStatus {
    PaymentStatus::Unpaid
}

impl Order {
    /// Customer-facing reference, `#ORD-<id>`.
    pub fn reference(&self) -> String {
        self.id.reference()
    }

    /// Parsed payment method, if the backend sent a known one.
    pub fn method(&self) -> Option<PaymentMethod> {
        self.payment_method.as_deref()?.parse().ok()
    }

    /// Case-insensitive customer name match, or a substring match on the id.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();

        if query.is_empty() {
            return true;
        }

        let needle = query.to_lowercase();

        self.customer_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
            || self.id.to_string().contains(query)
    }

    /// The driver transition that applies to this order.
    pub fn delivery_action(&self) -> DeliveryAction {
        DeliveryAction::for_status(&self.status)
    }
}

/// Filter orders by a search query.
pub fn search<'a>(orders: &'a [Order], query: &str) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| order.matches_search(query))
        .collect()
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Service name at order time
    pub service_name: String,

    /// Unit label
    #[serde(default)]
    pub unit: Option<String>,

    /// Unit price at order time
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub unit_price: Option<Decimal>,

    /// Quantity
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Line subtotal
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Body of `GET /orders/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Header
    pub order: Order,

    /// Lines
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Driver transition for a delivery task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryAction {
    /// Collect the laundry from the shop (`PUT /orders/:id/pickup`).
    Pickup,

    /// Hand it to the customer (`PUT /orders/:id/deliver`).
    Deliver,
}

impl DeliveryAction {
    /// `ready_for_delivery` orders are picked up; everything else is delivered.
    pub fn for_status(status: &OrderStatus) -> Self {
        if *status == OrderStatus::ReadyForDelivery {
            DeliveryAction::Pickup
        } else {
            DeliveryAction::Deliver
        }
    }

    /// Button text for the transition.
    pub fn label(self) -> &'static str {
        match self {
            DeliveryAction::Pickup => "Pick up",
            DeliveryAction::Deliver => "Mark delivered",
        }
    }

    /// Final path segment of the endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            DeliveryAction::Pickup => "pickup",
            DeliveryAction::Deliver => "deliver",
        }
    }
}

/// Body of `PUT /orders/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// New status
    pub status: OrderStatus,
}

/// Body of `PUT /orders/:id/assign-driver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverAssignment {
    /// Driver to assign
    pub driver_id: UserId,
}

/// Body returned by `POST /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    /// Id of the created order
    pub order_id: OrderId,
}
