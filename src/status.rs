//! Order Status

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Lifecycle stage of an order as reported by the backend.
///
/// Unknown strings are kept verbatim in [`OrderStatus::Other`] and have no
/// position in the stage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Received, not yet processed
    Pending,

    /// Washing
    Washing,

    /// Drying
    Drying,

    /// Ironing
    Ironing,

    /// Waiting for a driver
    ReadyForDelivery,

    /// Out for delivery
    Delivery,

    /// Delivered
    Completed,

    /// A status this client does not know about
    Other(String),
}

/// Known stages in lifecycle order.
pub const STAGES: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::Washing,
    OrderStatus::Drying,
    OrderStatus::Ironing,
    OrderStatus::ReadyForDelivery,
    OrderStatus::Delivery,
    OrderStatus::Completed,
];

impl OrderStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Washing => "washing",
            OrderStatus::Drying => "drying",
            OrderStatus::Ironing => "ironing",
            OrderStatus::ReadyForDelivery => "ready_for_delivery",
            OrderStatus::Delivery => "delivery",
            OrderStatus::Completed => "completed",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Washing => "Washing",
            OrderStatus::Drying => "Drying",
            OrderStatus::Ironing => "Ironing",
            OrderStatus::ReadyForDelivery => "Ready for delivery",
            OrderStatus::Delivery => "Out for delivery",
            OrderStatus::Completed => "Completed",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Position in [`STAGES`], or `None` for unknown statuses.
    pub fn stage_index(&self) -> Option<usize> {
        STAGES.iter().position(|stage| stage == self)
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => OrderStatus::Pending,
            "washing" => OrderStatus::Washing,
            "drying" => OrderStatus::Drying,
            "ironing" => OrderStatus::Ironing,
            "ready_for_delivery" => OrderStatus::ReadyForDelivery,
            "delivery" => OrderStatus::Delivery,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Whether an order has been paid for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Paid
    Paid,

    /// Not yet paid
    Unpaid,

    /// A payment status this client does not know about
    Other(String),
}

impl PaymentStatus {
    /// Wire name of the payment status.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Other(raw) => raw,
        }
    }

    /// Check if the order is settled.
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            _ => PaymentStatus::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Rendering state of a single stage in the progress timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Before the current stage
    Completed,

    /// The order is here
    Current,

    /// Not reached yet
    Upcoming,
}

/// One row of the progress timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    /// The stage
    pub stage: OrderStatus,

    /// How it renders
    pub state: StageState,
}

/// Progress of an order through [`STAGES`].
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Index of the current stage, `None` for unknown statuses
    pub index: Option<usize>,

    /// Per-stage states, in stage order
    pub stages: Vec<StageProgress>,

    /// Fraction of the progress bar to fill, `0.0..=1.0`
    pub fill: f64,
}

impl Progress {
    /// Compute progress for `status`.
    pub fn of(status: &OrderStatus) -> Self {
        let index = status.stage_index();

        let stages = STAGES
            .iter()
            .enumerate()
            .map(|(i, stage)| StageProgress {
                stage: stage.clone(),
                state: match index {
                    Some(current) if i < current => StageState::Completed,
                    Some(current) if i == current => StageState::Current,
                    _ => StageState::Upcoming,
                },
            })
            .collect();

        let fill = index.map_or(0.0, |i| fraction(i, STAGES.len() - 1));

        Progress {
            index,
            stages,
            fill,
        }
    }

    /// State of a given stage.
    pub fn state_of(&self, stage: &OrderStatus) -> Option<StageState> {
        self.stages
            .iter()
            .find(|progress| &progress.stage == stage)
            .map(|progress| progress.state)
    }
}

#[expect(clippy::cast_precision_loss, reason = "stage indices are below 8")]
fn fraction(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn washing_is_second_stage() {
        let progress = Progress::of(&OrderStatus::Washing);

        assert_eq!(progress.index, Some(1));
        assert_eq!(
            progress.state_of(&OrderStatus::Pending),
            Some(StageState::Completed)
        );
        assert_eq!(
            progress.state_of(&OrderStatus::Washing),
            Some(StageState::Current)
        );
        assert_eq!(
            progress.state_of(&OrderStatus::Drying),
            Some(StageState::Upcoming)
        );
    }

    #[test]
    fn fill_fraction_follows_index() {
        assert!((Progress::of(&OrderStatus::Pending).fill - 0.0).abs() < f64::EPSILON);
        assert!((Progress::of(&OrderStatus::Ironing).fill - 0.5).abs() < f64::EPSILON);
        assert!((Progress::of(&OrderStatus::Completed).fill - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_status_has_no_index_and_zero_fill() {
        let progress = Progress::of(&OrderStatus::from("cancelled"));

        assert_eq!(progress.index, None);
        assert!(progress.fill.abs() < f64::EPSILON);
        assert!(
            progress
                .stages
                .iter()
                .all(|stage| stage.state == StageState::Upcoming)
        );
    }

    #[test]
    fn unknown_strings_are_preserved() -> TestResult {
        let status: OrderStatus = serde_json::from_str("\"on_hold\"")?;

        assert_eq!(status, OrderStatus::Other("on_hold".to_string()));
        assert_eq!(serde_json::to_string(&status)?, "\"on_hold\"");

        Ok(())
    }

    #[test]
    fn known_statuses_decode() -> TestResult {
        let status: OrderStatus = serde_json::from_str("\"ready_for_delivery\"")?;
        let paid: PaymentStatus = serde_json::from_str("\"paid\"")?;

        assert_eq!(status, OrderStatus::ReadyForDelivery);
        assert!(paid.is_paid());

        Ok(())
    }
}
