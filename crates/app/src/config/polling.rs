//! Polling Config

use std::time::Duration;

use clap::Args;

/// Live view refresh settings.
#[derive(Debug, Clone, Args)]
pub struct PollingConfig {
    /// Seconds between refreshes of tracking, task and dashboard views
    #[arg(
        long,
        global = true,
        env = "STEAMLINE_POLL_INTERVAL_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,
}

impl PollingConfig {
    /// Refresh period.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
