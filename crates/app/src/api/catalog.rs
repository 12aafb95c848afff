//! Service catalog endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use steamline::{
    catalog::{Service, ServiceDraft},
    ids::ServiceId,
};

use crate::api::{ApiError, HttpApi};

#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List every service on offer.
    async fn services(&self) -> Result<Vec<Service>, ApiError>;

    /// Add a service.
    async fn create_service(&self, draft: ServiceDraft) -> Result<(), ApiError>;

    /// Replace a service's name, unit and price.
    async fn update_service(&self, id: ServiceId, draft: ServiceDraft) -> Result<(), ApiError>;

    /// Remove a service.
    async fn delete_service(&self, id: ServiceId) -> Result<(), ApiError>;
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn services(&self) -> Result<Vec<Service>, ApiError> {
        self.send(self.request(Method::GET, "/services")?).await
    }

    async fn create_service(&self, draft: ServiceDraft) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/services")?.json(&draft);

        self.send_empty(builder).await
    }

    async fn update_service(&self, id: ServiceId, draft: ServiceDraft) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/services/{id}"))?
            .json(&draft);

        self.send_empty(builder).await
    }

    async fn delete_service(&self, id: ServiceId) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, &format!("/services/{id}"))?)
            .await
    }
}
