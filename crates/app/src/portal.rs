//! Customer order history.

use std::sync::Arc;

use steamline::orders::Order;

use crate::api::{ApiError, OrdersApi};

#[derive(Clone)]
pub struct CustomerPortal {
    orders: Arc<dyn OrdersApi>,
}

impl std::fmt::Debug for CustomerPortal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerPortal").finish_non_exhaustive()
    }
}

impl CustomerPortal {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>) -> Self {
        Self { orders }
    }

    /// Orders placed by the signed-in customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the listing fails.
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let mut orders = self.orders.customer_orders().await?;
        orders.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(orders)
    }
}
