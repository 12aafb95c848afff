//! Dashboard statistics.

use std::{sync::Arc, time::Duration};

use steamline::dashboard::DashboardSnapshot;

use crate::{
    api::{ApiError, DashboardApi},
    polling::Feed,
};

#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard").finish_non_exhaustive()
    }
}

impl Dashboard {
    #[must_use]
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    /// Current statistics for the signed-in role.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, ApiError> {
        self.api.stats().await
    }

    /// Refresh the statistics every `period` until the feed is dropped.
    pub fn watch(&self, period: Duration) -> Feed<Result<DashboardSnapshot, String>> {
        let api = self.api.clone();

        Feed::spawn(period, move || {
            let api = api.clone();

            async move {
                api.stats()
                    .await
                    .map_err(|error| error.message_or("Could not load statistics."))
            }
        })
    }
}
