//! User directory endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Serialize;
use steamline::{
    ids::UserId,
    roles::{Role, User},
};

use crate::api::{ApiError, HttpApi};

#[derive(Debug, Serialize)]
struct RoleUpdate<'a> {
    role: &'a Role,
}

#[automock]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Every account (admin only).
    async fn users(&self) -> Result<Vec<User>, ApiError>;

    /// Customer accounts, for counter intake.
    async fn customers(&self) -> Result<Vec<User>, ApiError>;

    /// Driver accounts, for assignment.
    async fn drivers(&self) -> Result<Vec<User>, ApiError>;

    /// Change a user's role.
    async fn update_role(&self, id: UserId, role: Role) -> Result<(), ApiError>;
}

#[async_trait]
impl UsersApi for HttpApi {
    async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.send(self.request(Method::GET, "/users")?).await
    }

    async fn customers(&self) -> Result<Vec<User>, ApiError> {
        self.send(self.request(Method::GET, "/customers")?).await
    }

    async fn drivers(&self) -> Result<Vec<User>, ApiError> {
        self.send(self.request(Method::GET, "/drivers")?).await
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/users/{id}"))?
            .json(&RoleUpdate { role: &role });

        self.send_empty(builder).await
    }
}
