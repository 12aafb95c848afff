//! Order, payment and tracking endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use steamline::{
    checkout::NewOrderRequest,
    ids::{OrderId, UserId},
    orders::{DeliveryAction, DriverAssignment, Order, OrderCreated, OrderDetail, StatusUpdate},
    payment::{PaymentReceipt, PaymentRequest},
    status::OrderStatus,
    tracking::TrackingRecord,
};
use uuid::Uuid;

use crate::api::{ApiError, HttpApi};

/// Header carrying the checkout snapshot's idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Place an order.
    async fn create_order(
        &self,
        request: NewOrderRequest,
        idempotency_key: Uuid,
    ) -> Result<OrderCreated, ApiError>;

    /// Orders visible to the caller.
    async fn orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Order header and lines.
    async fn order(&self, id: OrderId) -> Result<OrderDetail, ApiError>;

    /// Order header and status history. Does not require a session.
    async fn tracking(&self, id: OrderId) -> Result<TrackingRecord, ApiError>;

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), ApiError>;

    async fn assign_driver(&self, id: OrderId, driver: UserId) -> Result<(), ApiError>;

    /// Record a cash payment.
    async fn pay(&self, id: OrderId, payment: PaymentRequest) -> Result<PaymentReceipt, ApiError>;

    /// The signed-in customer's orders.
    async fn customer_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// The signed-in driver's tasks.
    async fn driver_tasks(&self) -> Result<Vec<Order>, ApiError>;

    /// Move a delivery task along.
    async fn advance_delivery(&self, id: OrderId, action: DeliveryAction) -> Result<(), ApiError>;
}

#[async_trait]
impl OrdersApi for HttpApi {
    async fn create_order(
        &self,
        request: NewOrderRequest,
        idempotency_key: Uuid,
    ) -> Result<OrderCreated, ApiError> {
        let builder = self
            .request(Method::POST, "/orders")?
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(&request);

        self.send(builder).await
    }

    async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send(self.request(Method::GET, "/orders")?).await
    }

    async fn order(&self, id: OrderId) -> Result<OrderDetail, ApiError> {
        self.send(self.request(Method::GET, &format!("/orders/{id}"))?)
            .await
    }

    async fn tracking(&self, id: OrderId) -> Result<TrackingRecord, ApiError> {
        self.send(self.request(Method::GET, &format!("/tracking/{id}"))?)
            .await
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/orders/{id}/status"))?
            .json(&StatusUpdate { status });

        self.send_empty(builder).await
    }

    async fn assign_driver(&self, id: OrderId, driver: UserId) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/orders/{id}/assign-driver"))?
            .json(&DriverAssignment { driver_id: driver });

        self.send_empty(builder).await
    }

    async fn pay(&self, id: OrderId, payment: PaymentRequest) -> Result<PaymentReceipt, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/orders/{id}/pay"))?
            .json(&payment);

        self.send(builder).await
    }

    async fn customer_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send(self.request(Method::GET, "/customer/orders")?)
            .await
    }

    async fn driver_tasks(&self) -> Result<Vec<Order>, ApiError> {
        self.send(self.request(Method::GET, "/driver/tasks")?).await
    }

    async fn advance_delivery(&self, id: OrderId, action: DeliveryAction) -> Result<(), ApiError> {
        let path = format!("/orders/{id}/{}", action.endpoint());

        self.send_empty(self.request(Method::PUT, &path)?).await
    }
}
