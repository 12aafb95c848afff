//! Dashboard

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{money::format_rupiah, orders::Order, roles::Role};

/// Counters reported by `GET /dashboard/stats`. Which ones are present depends on the role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    /// Orders not yet completed
    #[serde(with = "rust_decimal::serde::float_option")]
    pub pending_orders: Option<Decimal>,

    /// All orders
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_orders: Option<Decimal>,

    /// Customer spend
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_spent: Option<Decimal>,

    /// Customer loyalty points
    #[serde(with = "rust_decimal::serde::float_option")]
    pub points: Option<Decimal>,

    /// Driver tasks waiting for pickup
    #[serde(with = "rust_decimal::serde::float_option")]
    pub assigned_tasks: Option<Decimal>,

    /// Driver tasks on the road
    #[serde(with = "rust_decimal::serde::float_option")]
    pub active_deliveries: Option<Decimal>,

    /// Driver tasks delivered
    #[serde(with = "rust_decimal::serde::float_option")]
    pub completed_deliveries: Option<Decimal>,

    /// Driver points
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_points: Option<Decimal>,

    /// Shop revenue
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_revenue: Option<Decimal>,

    /// Registered customers
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_customers: Option<Decimal>,
}

/// One point of the orders-per-day chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Day label
    pub date: String,

    /// Orders on that day
    #[serde(default)]
    pub count: u64,
}

/// Body of `GET /dashboard/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Role the stats were computed for
    #[serde(default)]
    pub role: Option<Role>,

    /// Counters
    #[serde(default)]
    pub stats: DashboardStats,

    /// Orders per day
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,

    /// Most recent orders
    #[serde(default)]
    pub recent_activities: Vec<Order>,
}

/// How a card value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardValue {
    /// A plain count
    Count(Decimal),

    /// A Rupiah amount
    Money(Decimal),
}

impl CardValue {
    /// Render the value.
    pub fn render(self) -> String {
        match self {
            CardValue::Count(value) => value.normalize().to_string(),
            CardValue::Money(value) => format_rupiah(value),
        }
    }
}

/// A headline statistic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    /// Label
    pub label: &'static str,

    /// Value; missing counters show as zero
    pub value: CardValue,
}

impl DashboardSnapshot {
    /// Role the cards are built for; the backend omits it for admins.
    pub fn effective_role(&self) -> Role {
        self.role.clone().unwrap_or(Role::Admin)
    }

    /// The four headline cards for the snapshot's role.
    pub fn cards(&self) -> Vec<StatCard> {
        let stats = &self.stats;
        let count = |label: &'static str, value: Option<Decimal>| StatCard {
            label,
            value: CardValue::Count(value.unwrap_or_default()),
        };
        let money = |label: &'static str, value: Option<Decimal>| StatCard {
            label,
            value: CardValue::Money(value.unwrap_or_default()),
        };

        match self.effective_role() {
            Role::Customer => vec![
                count("Active orders", stats.pending_orders),
                count("Total orders", stats.total_orders),
                money("Total spent", stats.total_spent),
                count("Points", stats.points),
            ],
            Role::Driver => vec![
                count("Assigned tasks", stats.assigned_tasks),
                count("Out for delivery", stats.active_deliveries),
                count("Delivered", stats.completed_deliveries),
                count("Driver points", stats.total_points),
            ],
            _ => vec![
                count("Total orders", stats.total_orders),
                count("Pending orders", stats.pending_orders),
                money("Total revenue", stats.total_revenue),
                count("Total customers", stats.total_customers),
            ],
        }
    }
}
