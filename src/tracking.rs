//! Order Tracking

use std::mem;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::OrderId,
    orders::{Order, OrderDetail, OrderItem},
    status::{OrderStatus, Progress},
};

/// Errors raised before a tracking lookup is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The input contained no digits.
    #[error("`{0}` does not contain an order number")]
    NoDigits(String),

    /// The digits do not fit an order id.
    #[error("`{0}` is not a valid order number")]
    OutOfRange(String),
}

/// Strip every non-digit character from user input and parse the rest.
///
/// `"#ORD-42"` becomes order 42.
///
/// # Errors
///
/// Returns a [`TrackingError`] when no digits remain or they overflow.
pub fn normalize_order_id(input: &str) -> Result<OrderId, TrackingError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(TrackingError::NoDigits(input.to_string()));
    }

    digits
        .parse::<u64>()
        .map(OrderId::new)
        .map_err(|_parse_error| TrackingError::OutOfRange(input.to_string()))
}

/// One entry of an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Status entered
    pub status: OrderStatus,

    /// When it happened, raw backend text
    #[serde(default)]
    pub created_at: Option<String>,

    /// Free text supplied by staff
    #[serde(default)]
    pub description: Option<String>,
}

impl LogEntry {
    /// The description, or a generated one naming the status.
    pub fn message(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description.to_string(),
            _ => format!(
                "Status updated to {}",
                self.status.as_str().replace('_', " ")
            ),
        }
    }
}

/// Body of `GET /tracking/:id`. Logs are newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    /// Order header
    pub order: Order,

    /// Status history
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Everything a tracking view shows for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingSnapshot {
    /// Order header
    pub order: Order,

    /// Order lines; empty for public lookups
    pub items: Vec<OrderItem>,

    /// Status history, newest first
    pub logs: Vec<LogEntry>,
}

impl TrackingSnapshot {
    /// Combine the order detail and tracking reads.
    ///
    /// The two reads are not reconciled; the header comes from the detail.
    pub fn from_reads(detail: OrderDetail, record: TrackingRecord) -> Self {
        TrackingSnapshot {
            order: detail.order,
            items: detail.items,
            logs: record.logs,
        }
    }

    /// Progress through the stage list.
    pub fn progress(&self) -> Progress {
        Progress::of(&self.order.status)
    }
}

impl From<TrackingRecord> for TrackingSnapshot {
    fn from(record: TrackingRecord) -> Self {
        TrackingSnapshot {
            order: record.order,
            items: Vec::new(),
            logs: record.logs,
        }
    }
}

/// Which endpoints a tracking view uses and how it treats failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    /// Anonymous lookup; a failure stops polling until the id is resubmitted.
    Public,

    /// Signed-in view; failures are retried on the next tick.
    Authenticated,
}

/// State of a tracking view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrackingState {
    /// First fetch in flight, nothing to show yet.
    #[default]
    Loading,

    /// Showing fetched data.
    Displaying(TrackingSnapshot),

    /// Re-fetching while the previous data stays visible.
    Refreshing(TrackingSnapshot),

    /// The last fetch failed.
    Error {
        /// What went wrong
        message: String,

        /// Last good data, kept in authenticated mode
        last: Option<TrackingSnapshot>,
    },
}

impl TrackingState {
    /// Enter the fetching state for a poll tick.
    pub fn begin_refresh(&mut self) {
        *self = match mem::take(self) {
            TrackingState::Displaying(data)
            | TrackingState::Refreshing(data)
            | TrackingState::Error {
                last: Some(data), ..
            } => TrackingState::Refreshing(data),
            TrackingState::Loading | TrackingState::Error { last: None, .. } => {
                TrackingState::Loading
            }
        };
    }

    /// Apply the outcome of a fetch.
    pub fn settle(&mut self, outcome: Result<TrackingSnapshot, String>, mode: TrackingMode) {
        *self = match outcome {
            Ok(data) => TrackingState::Displaying(data),
            Err(message) => {
                let last = match mode {
                    TrackingMode::Public => None,
                    TrackingMode::Authenticated => mem::take(self).into_data(),
                };

                TrackingState::Error { message, last }
            }
        };
    }

    /// Whether the poller should keep issuing fetches.
    pub fn keeps_polling(&self, mode: TrackingMode) -> bool {
        !matches!(
            (self, mode),
            (TrackingState::Error { .. }, TrackingMode::Public)
        )
    }

    /// The data currently on screen, if any.
    pub fn data(&self) -> Option<&TrackingSnapshot> {
        match self {
            TrackingState::Displaying(data) | TrackingState::Refreshing(data) => Some(data),
            TrackingState::Error { last, .. } => last.as_ref(),
            TrackingState::Loading => None,
        }
    }

    /// The error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            TrackingState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Check if a fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        matches!(self, TrackingState::Loading | TrackingState::Refreshing(_))
    }

    fn into_data(self) -> Option<TrackingSnapshot> {
        match self {
            TrackingState::Displaying(data) | TrackingState::Refreshing(data) => Some(data),
            TrackingState::Error { last, .. } => last,
            TrackingState::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::status::PaymentStatus;

    fn snapshot(status: OrderStatus) -> TrackingSnapshot {
        TrackingSnapshot {
            order: Order {
                id: OrderId::new(42),
                status,
                payment_status: PaymentStatus::Unpaid,
                payment_method: None,
                total_price: Decimal::new(14_000, 0),
                customer_name: Some("Budi".to_string()),
                customer_phone: None,
                driver_id: None,
                created_at: None,
            },
            items: Vec::new(),
            logs: Vec::new(),
        }
    }

    #[test]
    fn strips_prefix_from_order_reference() -> TestResult {
        assert_eq!(normalize_order_id("#ORD-42")?, OrderId::new(42));
        assert_eq!(normalize_order_id(" 7 ")?.to_string(), "7");

        Ok(())
    }

    #[test]
    fn rejects_input_without_digits() {
        assert_eq!(
            normalize_order_id("#ORD-"),
            Err(TrackingError::NoDigits("#ORD-".to_string()))
        );
    }

    #[test]
    fn rejects_overflowing_ids() {
        assert!(matches!(
            normalize_order_id("99999999999999999999999"),
            Err(TrackingError::OutOfRange(_))
        ));
    }

    #[test]
    fn missing_description_names_status() {
        let entry = LogEntry {
            status: OrderStatus::ReadyForDelivery,
            created_at: None,
            description: None,
        };

        assert_eq!(entry.message(), "Status updated to ready for delivery");
    }

    #[test]
    fn loading_to_displaying_to_refreshing() {
        let mut state = TrackingState::default();

        state.settle(Ok(snapshot(OrderStatus::Pending)), TrackingMode::Authenticated);
        assert!(matches!(state, TrackingState::Displaying(_)));

        state.begin_refresh();
        assert!(matches!(state, TrackingState::Refreshing(_)));
        assert_eq!(
            state.data().map(|d| d.order.status.clone()),
            Some(OrderStatus::Pending)
        );

        state.settle(Ok(snapshot(OrderStatus::Washing)), TrackingMode::Authenticated);
        assert_eq!(
            state.data().map(|d| d.order.status.clone()),
            Some(OrderStatus::Washing)
        );
    }

    #[test]
    fn authenticated_error_keeps_last_data_and_polls() {
        let mut state = TrackingState::Refreshing(snapshot(OrderStatus::Drying));

        state.settle(Err("offline".to_string()), TrackingMode::Authenticated);

        assert_eq!(state.error(), Some("offline"));
        assert!(state.data().is_some());
        assert!(state.keeps_polling(TrackingMode::Authenticated));

        state.begin_refresh();
        assert!(matches!(state, TrackingState::Refreshing(_)));
    }

    #[test]
    fn public_error_is_terminal() {
        let mut state = TrackingState::Loading;

        state.settle(Err("not found".to_string()), TrackingMode::Public);

        assert!(!state.keeps_polling(TrackingMode::Public));
        assert!(state.data().is_none());
    }

    #[test]
    fn decodes_public_record() -> TestResult {
        let record: TrackingRecord = serde_json::from_str(
            r#"{"order": {"id": 42, "status": "washing", "customer_name": "Budi", "total_price": 7000},
                "logs": [{"status": "washing", "created_at": "Fri, 01 Mar 2024 10:00:00 GMT"},
                         {"status": "pending", "description": "Order received"}]}"#,
        )?;

        let snapshot = TrackingSnapshot::from(record);

        assert_eq!(snapshot.progress().index, Some(1));
        assert_eq!(snapshot.logs.len(), 2);

        Ok(())
    }
}
