//! Driver task list and delivery transitions.

use std::{sync::Arc, time::Duration};

use steamline::orders::{DeliveryAction, Order, search};
use tracing::info;

use crate::{
    api::{ApiError, OrdersApi},
    notifications::NotificationCenter,
    polling::Feed,
};

/// Delivery workflows for drivers.
#[derive(Clone)]
pub struct Logistics {
    orders: Arc<dyn OrdersApi>,
    notifications: NotificationCenter,
}

impl std::fmt::Debug for Logistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logistics").finish_non_exhaustive()
    }
}

impl Logistics {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>, notifications: NotificationCenter) -> Self {
        Self {
            orders,
            notifications,
        }
    }

    /// Tasks assigned to the signed-in driver, filtered by `query`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the listing fails.
    pub async fn tasks(&self, query: &str) -> Result<Vec<Order>, ApiError> {
        let tasks = self.orders.driver_tasks().await?;

        Ok(search(&tasks, query).into_iter().cloned().collect())
    }

    /// Refresh the task list every `period` until the feed is dropped.
    pub fn watch(&self, period: Duration) -> Feed<Result<Vec<Order>, String>> {
        let orders = self.orders.clone();

        Feed::spawn(period, move || {
            let orders = orders.clone();

            async move {
                orders
                    .driver_tasks()
                    .await
                    .map_err(|error| error.message_or("Could not load tasks."))
            }
        })
    }

    /// Move a task one step along the delivery route.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the backend rejects the transition.
    pub async fn advance(&self, task: &Order) -> Result<DeliveryAction, ApiError> {
        let action = task.delivery_action();

        match self.orders.advance_delivery(task.id, action).await {
            Ok(()) => {
                info!(order_id = %task.id, ?action, "delivery advanced");

                let message = match action {
                    DeliveryAction::Pickup => "Picked up",
                    DeliveryAction::Deliver => "Delivered",
                };
                self.notifications
                    .success(message, format!("{} updated.", task.reference()));

                Ok(action)
            }
            Err(error) => {
                self.notifications
                    .error("Update failed", error.message_or("Something went wrong."));
                Err(error)
            }
        }
    }
}
