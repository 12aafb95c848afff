//! Cart and checkout session.

use std::sync::Arc;

use steamline::{
    cart::Cart,
    checkout::{CheckoutStage, EmptyCart, PaymentMethod, PendingCheckout},
    ids::{OrderId, UserId},
    money::format_rupiah,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, OrdersApi},
    notifications::NotificationCenter,
    storage::{KeyValueStore, PENDING_CART_KEY, StorageError},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart(#[from] EmptyCart),

    #[error("there is nothing to pay for")]
    NothingToPay,

    #[error("the saved checkout could not be read")]
    CorruptSnapshot(#[source] serde_json::Error),

    #[error("failed to save the checkout")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to place the order: {0}")]
    Api(#[source] ApiError),
}

/// One customer's (or cashier's) cart, its checkout snapshot and submission.
pub struct CheckoutSession {
    cart: Cart,
    stage: CheckoutStage,
    store: Arc<dyn KeyValueStore>,
    orders: Arc<dyn OrdersApi>,
    notifications: NotificationCenter,
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("cart", &self.cart)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Open a session, resuming a saved snapshot if there is one.
    ///
    /// An unreadable snapshot is discarded and the session starts empty.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the store cannot be read, or the
    /// unreadable snapshot cannot be removed.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        orders: Arc<dyn OrdersApi>,
        notifications: NotificationCenter,
    ) -> Result<Self, CheckoutError> {
        let stage = match read_snapshot(store.as_ref()) {
            Ok(Some(pending)) => CheckoutStage::AwaitingPayment(pending),
            Ok(None) => CheckoutStage::Selecting,
            Err(CheckoutError::CorruptSnapshot(error)) => {
                warn!(%error, "discarding unreadable checkout snapshot");
                store.remove(PENDING_CART_KEY)?;

                CheckoutStage::Selecting
            }
            Err(error) => return Err(error),
        };

        Ok(Self {
            cart: Cart::new(),
            stage,
            store,
            orders,
            notifications,
        })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart for adding, updating and removing lines.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn stage(&self) -> &CheckoutStage {
        &self.stage
    }

    /// Snapshot the cart and save it under `pending_cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, or a storage error.
    pub fn commit(&mut self) -> Result<&PendingCheckout, CheckoutError> {
        let pending = match PendingCheckout::from_cart(&self.cart) {
            Ok(pending) => pending,
            Err(error) => {
                self.notifications
                    .info("Cart is empty", "Choose a service first.");
                return Err(error.into());
            }
        };

        let json = serde_json::to_string(&pending).map_err(CheckoutError::Encode)?;
        self.store.set(PENDING_CART_KEY, &json)?;

        info!(
            lines = pending.items.len(),
            total = %pending.total,
            key = %pending.idempotency_key,
            "checkout snapshot saved"
        );

        self.stage = CheckoutStage::AwaitingPayment(pending);

        self.stage.pending().ok_or(CheckoutError::NothingToPay)
    }

    /// The saved snapshot, read from the store.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the store cannot be read or the snapshot is corrupt.
    pub fn pending(&self) -> Result<Option<PendingCheckout>, CheckoutError> {
        read_snapshot(self.store.as_ref())
    }

    /// Discard the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot cannot be removed.
    pub fn abandon(&mut self) -> Result<(), CheckoutError> {
        self.store.remove(PENDING_CART_KEY)?;
        self.stage = CheckoutStage::Selecting;

        info!("checkout abandoned");

        Ok(())
    }

    /// Submit the saved snapshot as an order.
    ///
    /// On success the snapshot and cart are cleared and the session moves to
    /// [`CheckoutStage::Confirmed`]. On failure nothing changes and an error
    /// notification is queued; there is no automatic retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NothingToPay`] without a snapshot, or
    /// [`CheckoutError::Api`] when the backend rejects the order.
    pub async fn submit_order(
        &mut self,
        payment_method: PaymentMethod,
        customer_id: Option<UserId>,
    ) -> Result<OrderId, CheckoutError> {
        let pending = self.pending()?.ok_or(CheckoutError::NothingToPay)?;
        let request = pending.order_request(payment_method, customer_id);

        let created = match self
            .orders
            .create_order(request, pending.idempotency_key)
            .await
        {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, key = %pending.idempotency_key, "order submission failed");

                self.notifications.error(
                    "Order failed",
                    error.message_or("Something went wrong. Please try again shortly."),
                );

                return Err(CheckoutError::Api(error));
            }
        };

        let order_id = created.order_id;

        if let Err(error) = self.store.remove(PENDING_CART_KEY) {
            warn!(%error, %order_id, "order placed but snapshot could not be removed");
        }

        self.cart.clear();
        self.stage = CheckoutStage::Confirmed(order_id);

        info!(%order_id, total = %pending.total, %payment_method, "order placed");

        self.notifications.success(
            "Order placed",
            format!(
                "{} for {} has been received.",
                order_id.reference(),
                format_rupiah(pending.total)
            ),
        );

        Ok(order_id)
    }
}

fn read_snapshot(store: &dyn KeyValueStore) -> Result<Option<PendingCheckout>, CheckoutError> {
    store
        .get(PENDING_CART_KEY)?
        .map(|raw| serde_json::from_str(&raw).map_err(CheckoutError::CorruptSnapshot))
        .transpose()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use steamline::{catalog::Service, ids::ServiceId, orders::OrderCreated};
    use testresult::TestResult;

    use super::*;
    use crate::{
        api::MockOrdersApi, notifications::NotificationKind, storage::MemoryStore,
    };

    fn wash() -> Service {
        Service {
            id: ServiceId::new(1),
            name: "Cuci Kering".to_string(),
            unit: "kg".to_string(),
            price: Decimal::new(7_000, 0),
        }
    }

    struct Harness {
        session: CheckoutSession,
        store: Arc<MemoryStore>,
        notifications: NotificationCenter,
    }

    fn harness(orders: MockOrdersApi) -> Result<Harness, CheckoutError> {
        let store = Arc::new(MemoryStore::new());
        let notifications = NotificationCenter::new();
        let session = CheckoutSession::open(store.clone(), Arc::new(orders), notifications.clone())?;

        Ok(Harness {
            session,
            store,
            notifications,
        })
    }

    #[test]
    fn empty_cart_cannot_be_committed() -> TestResult {
        let mut h = harness(MockOrdersApi::new())?;

        assert!(matches!(h.session.commit(), Err(CheckoutError::EmptyCart(_))));
        assert_eq!(h.store.get(PENDING_CART_KEY)?, None);
        assert_eq!(
            h.notifications.drain().first().map(|n| n.kind),
            Some(NotificationKind::Info)
        );

        Ok(())
    }

    #[test]
    fn commit_saves_snapshot_and_reopen_resumes_it() -> TestResult {
        let mut h = harness(MockOrdersApi::new())?;

        h.session.cart_mut().add_item(&wash());
        h.session.cart_mut().add_item(&wash());
        let total = h.session.commit()?.total;

        assert_eq!(total, Decimal::new(14_000, 0));

        let reopened =
            CheckoutSession::open(h.store.clone(), Arc::new(MockOrdersApi::new()), NotificationCenter::new())?;

        assert!(matches!(
            reopened.stage(),
            CheckoutStage::AwaitingPayment(pending) if pending.total == total
        ));

        Ok(())
    }

    #[tokio::test]
    async fn successful_submission_clears_cart_and_snapshot_once() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders
            .expect_create_order()
            .once()
            .withf(|request, _key| {
                request.items.len() == 1
                    && request.payment_method == PaymentMethod::Bank
                    && request.customer_id.is_none()
            })
            .return_once(|_, _| {
                Ok(OrderCreated {
                    order_id: OrderId::new(42),
                })
            });

        let mut h = harness(orders)?;
        h.session.cart_mut().add_item(&wash());
        h.session.commit()?;

        let order_id = h.session.submit_order(PaymentMethod::Bank, None).await?;

        assert_eq!(order_id, OrderId::new(42));
        assert_eq!(h.session.stage(), &CheckoutStage::Confirmed(OrderId::new(42)));
        assert!(h.session.cart().is_empty());
        assert_eq!(h.store.get(PENDING_CART_KEY)?, None);

        let notes = h.notifications.drain();
        assert_eq!(notes.len(), 1);
        assert!(notes.iter().all(|n| n.kind == NotificationKind::Success));
        assert!(notes.iter().any(|n| n.description.contains("#ORD-42")));

        assert!(matches!(
            h.session.submit_order(PaymentMethod::Bank, None).await,
            Err(CheckoutError::NothingToPay)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_leaves_everything_in_place() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders.expect_create_order().once().return_once(|_, _| {
            Err(ApiError::Validation {
                status: 400,
                message: "Layanan tidak tersedia".to_string(),
            })
        });

        let mut h = harness(orders)?;
        h.session.cart_mut().add_item(&wash());
        let before = h.session.commit()?.clone();
        let saved = h.store.get(PENDING_CART_KEY)?;

        let result = h.session.submit_order(PaymentMethod::Cod, None).await;

        assert!(matches!(result, Err(CheckoutError::Api(_))));
        assert_eq!(h.session.cart().len(), 1);
        assert_eq!(h.store.get(PENDING_CART_KEY)?, saved);
        assert_eq!(h.session.stage(), &CheckoutStage::AwaitingPayment(before));

        let notes = h.notifications.drain();
        assert_eq!(
            notes.first().map(|n| (n.kind, n.description.clone())),
            Some((NotificationKind::Error, "Layanan tidak tersedia".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn retry_reuses_the_idempotency_key() -> TestResult {
        let mut orders = MockOrdersApi::new();
        let mut sequence = mockall::Sequence::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

        let first = seen.clone();
        orders
            .expect_create_order()
            .once()
            .in_sequence(&mut sequence)
            .returning(move |_, key| {
                first.lock().map(|mut keys| keys.push(key)).ok();
                Err(ApiError::Server {
                    status: 503,
                    message: None,
                })
            });

        let second = seen.clone();
        orders
            .expect_create_order()
            .once()
            .in_sequence(&mut sequence)
            .returning(move |_, key| {
                second.lock().map(|mut keys| keys.push(key)).ok();
                Ok(OrderCreated {
                    order_id: OrderId::new(7),
                })
            });

        let mut h = harness(orders)?;
        h.session.cart_mut().add_item(&wash());
        h.session.commit()?;

        assert!(h.session.submit_order(PaymentMethod::Cod, None).await.is_err());
        h.session.submit_order(PaymentMethod::Cod, None).await?;

        let keys = seen.lock().map(|keys| keys.clone()).unwrap_or_default();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.first(), keys.last());

        Ok(())
    }

    #[test]
    fn abandon_removes_snapshot() -> TestResult {
        let mut h = harness(MockOrdersApi::new())?;

        h.session.cart_mut().add_item(&wash());
        h.session.commit()?;
        h.session.abandon()?;

        assert_eq!(h.session.pending()?, None);
        assert_eq!(h.session.stage(), &CheckoutStage::Selecting);

        Ok(())
    }

    #[test]
    fn corrupt_snapshot_is_discarded_on_open() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(PENDING_CART_KEY, "{\"items\":[1,2")?;

        let mut session = CheckoutSession::open(
            store.clone(),
            Arc::new(MockOrdersApi::new()),
            NotificationCenter::new(),
        )?;

        assert_eq!(session.stage(), &CheckoutStage::Selecting);
        assert_eq!(store.get(PENDING_CART_KEY)?, None);

        session.cart_mut().add_item(&wash());
        session.commit()?;

        assert!(session.pending()?.is_some());

        Ok(())
    }

    #[test]
    fn corrupt_snapshot_written_later_is_reported_by_pending() -> TestResult {
        let h = harness(MockOrdersApi::new())?;
        h.store.set(PENDING_CART_KEY, "[1,2")?;

        assert!(matches!(
            h.session.pending(),
            Err(CheckoutError::CorruptSnapshot(_))
        ));

        Ok(())
    }
}
