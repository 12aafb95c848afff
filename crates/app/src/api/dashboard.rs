//! Dashboard endpoint.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use steamline::dashboard::DashboardSnapshot;

use crate::api::{ApiError, HttpApi};

#[automock]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Role-scoped statistics for the signed-in user.
    async fn stats(&self) -> Result<DashboardSnapshot, ApiError>;
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn stats(&self) -> Result<DashboardSnapshot, ApiError> {
        self.send(self.request(Method::GET, "/dashboard/stats")?)
            .await
    }
}
