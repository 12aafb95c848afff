//! Live order tracking.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use steamline::{
    ids::OrderId,
    tracking::{TrackingError, TrackingMode, TrackingSnapshot, TrackingState, normalize_order_id},
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    api::{ApiError, OrdersApi},
    polling::PollHandle,
};

const PUBLIC_NOT_FOUND: &str = "Order not found. Please check your order ID.";

/// Starts tracking views.
#[derive(Clone)]
pub struct OrderTracker {
    orders: Arc<dyn OrdersApi>,
    period: Duration,
}

impl std::fmt::Debug for OrderTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderTracker")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl OrderTracker {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>, period: Duration) -> Self {
        Self { orders, period }
    }

    /// Start tracking the order named by `input` (`"42"`, `"#ORD-42"`, ...).
    ///
    /// The first fetch starts immediately; the view then refreshes every
    /// period until the handle is dropped. Public views stop after a failed
    /// fetch; authenticated views retry on the next tick.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackingError`] if `input` holds no order number. No
    /// request is made in that case.
    pub fn watch(&self, input: &str, mode: TrackingMode) -> Result<TrackerHandle, TrackingError> {
        let order_id = normalize_order_id(input)?;
        let (sender, receiver) = watch::channel(TrackingState::Loading);
        let sender = Arc::new(sender);
        let orders = self.orders.clone();

        debug!(%order_id, ?mode, "tracking started");

        let poll = PollHandle::spawn(self.period, move || {
            let sender = sender.clone();
            let orders = orders.clone();

            async move {
                sender.send_modify(TrackingState::begin_refresh);

                let outcome = fetch(orders.as_ref(), order_id, mode).await.map_err(|error| {
                    warn!(%order_id, %error, "tracking refresh failed");
                    describe(&error, mode)
                });

                let mut keep_polling = true;

                sender.send_modify(|state| {
                    state.settle(outcome, mode);
                    keep_polling = state.keeps_polling(mode);
                });

                if keep_polling {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
        });

        Ok(TrackerHandle {
            order_id,
            state: receiver,
            _poll: poll,
        })
    }
}

async fn fetch(
    orders: &dyn OrdersApi,
    order_id: OrderId,
    mode: TrackingMode,
) -> Result<TrackingSnapshot, ApiError> {
    match mode {
        TrackingMode::Public => orders.tracking(order_id).await.map(TrackingSnapshot::from),
        TrackingMode::Authenticated => {
            let (detail, record) = tokio::join!(orders.order(order_id), orders.tracking(order_id));

            Ok(TrackingSnapshot::from_reads(detail?, record?))
        }
    }
}

fn describe(error: &ApiError, mode: TrackingMode) -> String {
    match (error, mode) {
        (ApiError::NotFound { message: None }, TrackingMode::Public) => PUBLIC_NOT_FOUND.to_string(),
        _ => error.message_or(&error.to_string()),
    }
}

/// A mounted tracking view. Dropping it stops the refresh loop.
#[derive(Debug)]
pub struct TrackerHandle {
    order_id: OrderId,
    state: watch::Receiver<TrackingState>,
    _poll: PollHandle,
}

impl TrackerHandle {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Current view state.
    pub fn state(&self) -> TrackingState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<TrackingState> {
        self.state.clone()
    }

    /// Wait until the state satisfies `predicate` and return it.
    ///
    /// Returns `None` if the refresh loop ended first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&TrackingState) -> bool,
    ) -> Option<TrackingState> {
        self.state
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Wait for the next state change. Returns `None` once the loop has stopped.
    pub async fn changed(&mut self) -> Option<TrackingState> {
        self.state.changed().await.ok()?;

        Some(self.state.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use steamline::{
        orders::{Order, OrderDetail},
        status::{OrderStatus, PaymentStatus},
        tracking::TrackingRecord,
    };
    use testresult::TestResult;

    use super::*;
    use crate::api::MockOrdersApi;

    fn order(id: OrderId, status: OrderStatus) -> Order {
        Order {
            id,
            status,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            total_price: Decimal::new(21_000, 0),
            customer_name: Some("Budi".to_string()),
            customer_phone: None,
            driver_id: None,
            created_at: None,
        }
    }

    fn record(id: OrderId) -> TrackingRecord {
        TrackingRecord {
            order: order(id, OrderStatus::Washing),
            logs: Vec::new(),
        }
    }

    fn counting_tracking(orders: &mut MockOrdersApi) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        orders.expect_tracking().returning(move |id| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(record(id))
        });

        calls
    }

    fn tracker(orders: MockOrdersApi) -> OrderTracker {
        OrderTracker::new(Arc::new(orders), Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn order_reference_is_normalized_before_the_request() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders
            .expect_tracking()
            .withf(|id| *id == OrderId::new(42))
            .returning(|id| Ok(record(id)));

        let mut handle = tracker(orders).watch("#ORD-42", TrackingMode::Public)?;

        let state = handle
            .wait_for(|state| matches!(state, TrackingState::Displaying(_)))
            .await;

        assert_eq!(handle.order_id(), OrderId::new(42));
        assert_eq!(
            state.and_then(|s| s.data().and_then(|d| d.progress().index)),
            Some(1)
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn input_without_digits_makes_no_request() {
        let mut orders = MockOrdersApi::new();
        orders.expect_tracking().never();

        let result = tracker(orders).watch("#ORD-", TrackingMode::Public);

        assert!(matches!(result, Err(TrackingError::NoDigits(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_period_while_mounted() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let calls = counting_tracking(&mut orders);

        let _handle = tracker(orders).watch("7", TrackingMode::Public)?;

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_falls_back_to_the_minimum() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let calls = counting_tracking(&mut orders);

        let _handle = OrderTracker::new(Arc::new(orders), Duration::ZERO)
            .watch("7", TrackingMode::Public)?;

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_polling() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let calls = counting_tracking(&mut orders);

        let mut handle = tracker(orders).watch("7", TrackingMode::Public)?;
        handle
            .wait_for(|state| matches!(state, TrackingState::Displaying(_)))
            .await;

        drop(handle);
        tokio::time::sleep(Duration::from_secs(35)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn public_failure_is_terminal() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        orders.expect_tracking().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::NotFound { message: None })
        });

        let mut handle = tracker(orders).watch("99", TrackingMode::Public)?;
        let state = handle
            .wait_for(|state| matches!(state, TrackingState::Error { .. }))
            .await;

        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(
            state.as_ref().and_then(TrackingState::error),
            Some(PUBLIC_NOT_FOUND)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn authenticated_view_keeps_data_and_retries() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let mut sequence = mockall::Sequence::new();

        orders
            .expect_order()
            .returning(|id| {
                Ok(OrderDetail {
                    order: order(id, OrderStatus::Drying),
                    items: Vec::new(),
                })
            });

        orders
            .expect_tracking()
            .once()
            .in_sequence(&mut sequence)
            .returning(|id| Ok(record(id)));
        orders
            .expect_tracking()
            .once()
            .in_sequence(&mut sequence)
            .returning(|_| {
                Err(ApiError::Server {
                    status: 500,
                    message: None,
                })
            });
        orders
            .expect_tracking()
            .in_sequence(&mut sequence)
            .returning(|id| Ok(record(id)));

        let mut handle = tracker(orders).watch("3", TrackingMode::Authenticated)?;

        let failed = handle
            .wait_for(|state| matches!(state, TrackingState::Error { .. }))
            .await;

        assert_eq!(
            failed
                .as_ref()
                .and_then(|s| s.data().map(|d| d.order.status.clone())),
            Some(OrderStatus::Drying)
        );

        let recovered = handle
            .wait_for(|state| matches!(state, TrackingState::Displaying(_)))
            .await;

        assert!(recovered.is_some());

        Ok(())
    }
}
