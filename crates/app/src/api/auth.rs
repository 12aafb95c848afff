//! Authentication endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use steamline::roles::User;

use crate::api::{ApiError, HttpApi};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
}

#[automock]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError>;

    /// Create a customer account.
    async fn register(&self, registration: Registration) -> Result<(), ApiError>;
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, "/login")?.json(&credentials);

        self.send(builder).await
    }

    async fn register(&self, registration: Registration) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/register")?.json(&registration);

        self.send_empty(builder).await
    }
}
