//! Catalog and user administration.

use std::sync::Arc;

use rust_decimal::Decimal;
use steamline::{
    catalog::{Service, ServiceDraft},
    ids::{ServiceId, UserId},
    roles::{Role, User},
};
use thiserror::Error;
use tracing::info;

use crate::{
    api::{ApiError, CatalogApi, UsersApi},
    notifications::NotificationCenter,
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("service name is required")]
    MissingName,

    #[error("service unit is required")]
    MissingUnit,

    #[error("service price must not be negative")]
    NegativePrice(Decimal),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Admin workflows over the catalog and the user list.
#[derive(Clone)]
pub struct Admin {
    catalog: Arc<dyn CatalogApi>,
    users: Arc<dyn UsersApi>,
    notifications: NotificationCenter,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin").finish_non_exhaustive()
    }
}

impl Admin {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        users: Arc<dyn UsersApi>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            catalog,
            users,
            notifications,
        }
    }

    /// The service catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the listing fails.
    pub async fn services(&self) -> Result<Vec<Service>, AdminError> {
        Ok(self.catalog.services().await?)
    }

    /// Add a service to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation variant for a blank name or unit or a negative
    /// price, or [`AdminError::Api`] if the backend rejects it.
    pub async fn create_service(&self, draft: ServiceDraft) -> Result<(), AdminError> {
        let draft = validate(draft)?;
        let name = draft.name.clone();

        self.report(self.catalog.create_service(draft).await, "Service added", &name)?;
        info!(%name, "service created");

        Ok(())
    }

    /// Replace a catalog entry.
    ///
    /// # Errors
    ///
    /// Same as [`Admin::create_service`].
    pub async fn update_service(&self, id: ServiceId, draft: ServiceDraft) -> Result<(), AdminError> {
        let draft = validate(draft)?;
        let name = draft.name.clone();

        self.report(self.catalog.update_service(id, draft).await, "Service updated", &name)?;
        info!(service_id = %id, %name, "service updated");

        Ok(())
    }

    /// Remove a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the backend rejects it.
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), AdminError> {
        self.report(
            self.catalog.delete_service(id).await,
            "Service deleted",
            &format!("Service {id} removed."),
        )?;
        info!(service_id = %id, "service deleted");

        Ok(())
    }

    /// Users matching `query` by username or full name.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the listing fails.
    pub async fn users(&self, query: &str) -> Result<Vec<User>, AdminError> {
        let users = self.users.users().await?;

        Ok(users
            .into_iter()
            .filter(|user| user.matches_search(query))
            .collect())
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the backend rejects it.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<(), AdminError> {
        let description = format!("User {id} is now {role}.");

        self.report(self.users.update_role(id, role).await, "Role updated", &description)?;
        info!(user_id = %id, "role changed");

        Ok(())
    }

    /// Registered customers.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the listing fails.
    pub async fn customers(&self) -> Result<Vec<User>, AdminError> {
        Ok(self.users.customers().await?)
    }

    /// Registered drivers.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] if the listing fails.
    pub async fn drivers(&self) -> Result<Vec<User>, AdminError> {
        Ok(self.users.drivers().await?)
    }

    fn report(&self, result: Result<(), ApiError>, title: &str, description: &str) -> Result<(), AdminError> {
        match result {
            Ok(()) => {
                self.notifications.success(title, description);
                Ok(())
            }
            Err(error) => {
                self.notifications
                    .error("Error", error.message_or("Something went wrong."));
                Err(error.into())
            }
        }
    }
}

fn validate(draft: ServiceDraft) -> Result<ServiceDraft, AdminError> {
    let name = draft.name.trim();
    let unit = draft.unit.trim();

    if name.is_empty() {
        return Err(AdminError::MissingName);
    }

    if unit.is_empty() {
        return Err(AdminError::MissingUnit);
    }

    if draft.price < Decimal::ZERO {
        return Err(AdminError::NegativePrice(draft.price));
    }

    Ok(ServiceDraft {
        name: name.to_string(),
        unit: unit.to_string(),
        price: draft.price,
    })
}
