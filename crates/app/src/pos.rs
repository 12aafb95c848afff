//! Point of sale: order listing, status changes, driver assignment and cash payments.

use std::sync::Arc;

use rust_decimal::Decimal;
use steamline::{
    ids::{OrderId, UserId},
    money::format_rupiah,
    orders::{Order, OrderDetail, search},
    payment::{CashTender, PaymentError, PaymentReceipt},
    roles::{Capability, Identity, User},
    status::OrderStatus,
};
use thiserror::Error;
use tracing::info;

use crate::{
    api::{ApiError, OrdersApi, UsersApi},
    notifications::NotificationCenter,
};

#[derive(Debug, Error)]
pub enum PosError {
    #[error("your role is not allowed to do this")]
    Forbidden(Capability),

    #[error("order {} is already paid", .0.reference())]
    AlreadyPaid(OrderId),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Counter workflows for admins and cashiers.
#[derive(Clone)]
pub struct PointOfSale {
    orders: Arc<dyn OrdersApi>,
    users: Arc<dyn UsersApi>,
    notifications: NotificationCenter,
}

impl std::fmt::Debug for PointOfSale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointOfSale").finish_non_exhaustive()
    }
}

impl PointOfSale {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersApi>,
        users: Arc<dyn UsersApi>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            orders,
            users,
            notifications,
        }
    }

    /// Orders matching `query` by customer name or id.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Api`] if the listing fails.
    pub async fn orders(&self, query: &str) -> Result<Vec<Order>, PosError> {
        let orders = self.orders.orders().await.inspect_err(|error| {
            self.notifications
                .error("Error", error.message_or("Could not load orders."));
        })?;

        Ok(search(&orders, query).into_iter().cloned().collect())
    }

    /// Order header and lines.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Api`] if the order cannot be loaded.
    pub async fn detail(&self, id: OrderId) -> Result<OrderDetail, PosError> {
        Ok(self.orders.order(id).await?)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Forbidden`] for roles other than admin and
    /// cashier, or [`PosError::Api`] if the backend rejects the change.
    pub async fn change_status(
        &self,
        identity: &Identity,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), PosError> {
        ensure(identity, Capability::ChangeStatus)?;

        match self.orders.update_status(id, status.clone()).await {
            Ok(()) => {
                info!(order_id = %id, %status, "order status changed");
                self.notifications.success(
                    "Status updated",
                    format!("{} is now {}.", id.reference(), status.label()),
                );
                Ok(())
            }
            Err(error) => {
                self.notifications
                    .error("Update failed", error.message_or("Something went wrong."));
                Err(error.into())
            }
        }
    }

    /// Assign a driver to an order.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Forbidden`] for roles other than admin and
    /// cashier, or [`PosError::Api`] if the backend rejects the assignment.
    pub async fn assign_driver(
        &self,
        identity: &Identity,
        id: OrderId,
        driver: UserId,
    ) -> Result<(), PosError> {
        ensure(identity, Capability::AssignDriver)?;

        match self.orders.assign_driver(id, driver).await {
            Ok(()) => {
                info!(order_id = %id, driver_id = %driver, "driver assigned");
                self.notifications.success(
                    "Driver assigned",
                    format!("{} has been handed to a driver.", id.reference()),
                );
                Ok(())
            }
            Err(error) => {
                self.notifications
                    .error("Assignment failed", error.message_or("Something went wrong."));
                Err(error.into())
            }
        }
    }

    /// Take a cash payment for `order`.
    ///
    /// The amount is checked against the order total before any request is
    /// made.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Payment`] when the amount does not cover the total,
    /// [`PosError::AlreadyPaid`] for settled orders, [`PosError::Forbidden`]
    /// for other roles, or [`PosError::Api`] if the backend rejects it.
    pub async fn take_payment(
        &self,
        identity: &Identity,
        order: &Order,
        amount: Decimal,
    ) -> Result<PaymentReceipt, PosError> {
        ensure(identity, Capability::TakePayment)?;

        if order.payment_status.is_paid() {
            return Err(PosError::AlreadyPaid(order.id));
        }

        let tender = CashTender::new(amount, order.total_price).inspect_err(|error| {
            self.notifications.error("Payment failed", error.to_string());
        })?;

        match self.orders.pay(order.id, tender.request()).await {
            Ok(receipt) => {
                info!(order_id = %order.id, paid = %receipt.paid, change = %receipt.change, "payment recorded");
                self.notifications.success(
                    "Payment received",
                    format!("Change due: {}", format_rupiah(receipt.change)),
                );
                Ok(receipt)
            }
            Err(error) => {
                self.notifications
                    .error("Payment failed", error.message_or("Could not process the payment."));
                Err(error.into())
            }
        }
    }

    /// Drivers available for assignment.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Api`] if the listing fails.
    pub async fn drivers(&self) -> Result<Vec<User>, PosError> {
        Ok(self.users.drivers().await?)
    }

    /// Customers available for counter intake.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Api`] if the listing fails.
    pub async fn customers(&self) -> Result<Vec<User>, PosError> {
        Ok(self.users.customers().await?)
    }
}

fn ensure(identity: &Identity, capability: Capability) -> Result<(), PosError> {
    if identity.can(capability) {
        Ok(())
    } else {
        Err(PosError::Forbidden(capability))
    }
}

#[cfg(test)]
mod tests {
    use steamline::{roles::Role, status::PaymentStatus};
    use testresult::TestResult;

    use super::*;
    use crate::{
        api::{MockOrdersApi, MockUsersApi},
        notifications::NotificationKind,
    };

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new(1),
            role,
            display_name: "Staff".to_string(),
        }
    }

    fn unpaid_order(total: i64) -> Order {
        Order {
            id: OrderId::new(11),
            status: OrderStatus::Completed,
            payment_status: PaymentStatus::Unpaid,
            payment_method: Some("cod".to_string()),
            total_price: Decimal::new(total, 0),
            customer_name: Some("Siti".to_string()),
            customer_phone: None,
            driver_id: None,
            created_at: None,
        }
    }

    fn pos(orders: MockOrdersApi) -> (PointOfSale, NotificationCenter) {
        let notifications = NotificationCenter::new();

        (
            PointOfSale::new(Arc::new(orders), Arc::new(MockUsersApi::new()), notifications.clone()),
            notifications,
        )
    }

    #[tokio::test]
    async fn insufficient_cash_is_rejected_without_request() {
        let mut orders = MockOrdersApi::new();
        orders.expect_pay().never();

        let (pos, notifications) = pos(orders);

        let result = pos
            .take_payment(&identity(Role::Cashier), &unpaid_order(32_500), Decimal::new(30_000, 0))
            .await;

        assert!(matches!(
            result,
            Err(PosError::Payment(PaymentError::Insufficient { .. }))
        ));
        assert_eq!(
            notifications.drain().first().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn payment_returns_server_change() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders
            .expect_pay()
            .once()
            .withf(|id, payment| {
                *id == OrderId::new(11) && payment.amount_paid == Decimal::new(50_000, 0)
            })
            .return_once(|_, _| {
                Ok(PaymentReceipt {
                    paid: Decimal::new(50_000, 0),
                    change: Decimal::new(17_500, 0),
                })
            });

        let (pos, _notifications) = pos(orders);

        let receipt = pos
            .take_payment(&identity(Role::Admin), &unpaid_order(32_500), Decimal::new(50_000, 0))
            .await?;

        assert_eq!(receipt.change, Decimal::new(17_500, 0));

        Ok(())
    }

    #[tokio::test]
    async fn drivers_cannot_take_payments() {
        let mut orders = MockOrdersApi::new();
        orders.expect_pay().never();

        let (pos, _notifications) = pos(orders);

        let result = pos
            .take_payment(&identity(Role::Driver), &unpaid_order(1_000), Decimal::new(1_000, 0))
            .await;

        assert!(matches!(
            result,
            Err(PosError::Forbidden(Capability::TakePayment))
        ));
    }

    #[tokio::test]
    async fn paid_orders_are_not_charged_twice() {
        let mut orders = MockOrdersApi::new();
        orders.expect_pay().never();

        let (pos, _notifications) = pos(orders);
        let mut order = unpaid_order(1_000);
        order.payment_status = PaymentStatus::Paid;

        let result = pos
            .take_payment(&identity(Role::Cashier), &order, Decimal::new(1_000, 0))
            .await;

        assert!(matches!(result, Err(PosError::AlreadyPaid(_))));
    }

    #[tokio::test]
    async fn status_change_notifies() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders
            .expect_update_status()
            .once()
            .withf(|id, status| *id == OrderId::new(4) && *status == OrderStatus::Ironing)
            .return_once(|_, _| Ok(()));

        let (pos, notifications) = pos(orders);

        pos.change_status(&identity(Role::Cashier), OrderId::new(4), OrderStatus::Ironing)
            .await?;

        let notes = notifications.drain();
        assert_eq!(notes.first().map(|n| n.kind), Some(NotificationKind::Success));
        assert!(notes.iter().any(|n| n.description.contains("#ORD-4")));

        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_by_query() -> TestResult {
        let mut orders = MockOrdersApi::new();

        orders.expect_orders().once().return_once(|| {
            let mut other = unpaid_order(1_000);
            other.id = OrderId::new(12);
            other.customer_name = Some("Budi".to_string());

            Ok(vec![unpaid_order(1_000), other])
        });

        let (pos, _notifications) = pos(orders);

        let found = pos.orders("siti").await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|o| o.id), Some(OrderId::new(11)));

        Ok(())
    }
}
