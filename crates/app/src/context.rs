//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    admin::Admin,
    api::{AuthApi, CatalogApi, DashboardApi, HttpApi, OrdersApi, UsersApi},
    checkout::{CheckoutError, CheckoutSession},
    config::ClientConfig,
    dashboard::Dashboard,
    logistics::Logistics,
    notifications::NotificationCenter,
    portal::CustomerPortal,
    pos::PointOfSale,
    session::Session,
    storage::{FileStore, KeyValueStore, StorageError},
    tracking::OrderTracker,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open the data directory")]
    Storage(#[from] StorageError),
}

/// Backend seams the context is assembled from.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub orders: Arc<dyn OrdersApi>,
    pub users: Arc<dyn UsersApi>,
    pub dashboard: Arc<dyn DashboardApi>,
}

impl Services {
    /// Every seam served by one HTTP client.
    #[must_use]
    pub fn http(api: HttpApi) -> Self {
        let api = Arc::new(api);

        Self {
            auth: api.clone(),
            catalog: api.clone(),
            orders: api.clone(),
            users: api.clone(),
            dashboard: api,
        }
    }
}

/// Client state and workflows shared by every page.
#[derive(Clone)]
pub struct AppContext {
    pub session: Session,
    pub notifications: NotificationCenter,
    pub catalog: Arc<dyn CatalogApi>,
    pub pos: PointOfSale,
    pub logistics: Logistics,
    pub admin: Admin,
    pub dashboard: Dashboard,
    pub portal: CustomerPortal,
    pub tracker: OrderTracker,
    orders: Arc<dyn OrdersApi>,
    store: Arc<dyn KeyValueStore>,
    poll_interval: Duration,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage.data_dir)?);
        let api = HttpApi::new(&config.api.api_url, store.clone());

        Ok(Self::new(Services::http(api), store, config.polling.period()))
    }

    #[must_use]
    pub fn new(services: Services, store: Arc<dyn KeyValueStore>, poll_interval: Duration) -> Self {
        let notifications = NotificationCenter::new();

        Self {
            session: Session::new(services.auth, store.clone()),
            pos: PointOfSale::new(
                services.orders.clone(),
                services.users.clone(),
                notifications.clone(),
            ),
            logistics: Logistics::new(services.orders.clone(), notifications.clone()),
            admin: Admin::new(
                services.catalog.clone(),
                services.users,
                notifications.clone(),
            ),
            dashboard: Dashboard::new(services.dashboard),
            portal: CustomerPortal::new(services.orders.clone()),
            tracker: OrderTracker::new(services.orders.clone(), poll_interval),
            catalog: services.catalog,
            orders: services.orders,
            notifications,
            store,
            poll_interval,
        }
    }

    /// Open the checkout session, resuming any saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the saved snapshot cannot be read.
    pub fn checkout(&self) -> Result<CheckoutSession, CheckoutError> {
        CheckoutSession::open(
            self.store.clone(),
            self.orders.clone(),
            self.notifications.clone(),
        )
    }

    /// Refresh period of live views.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
