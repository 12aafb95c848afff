//! Client configuration module

use clap::Args;

use crate::config::{
    api::ApiConfig, observability::LoggingConfig, polling::PollingConfig, storage::StorageConfig,
};

pub mod api;
pub mod observability;
pub mod polling;
pub mod storage;

/// Steamline client configuration, shared by every command.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Backend connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Durable store settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Live view refresh settings.
    #[command(flatten)]
    pub polling: PollingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
