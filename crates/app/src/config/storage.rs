//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Durable store settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the session token, user and pending cart
    #[arg(long, global = true, env = "STEAMLINE_DATA_DIR", default_value = ".steamline")]
    pub data_dir: PathBuf,
}
