//! API Config

use clap::Args;

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the laundry REST backend
    #[arg(
        long,
        global = true,
        env = "STEAMLINE_API_URL",
        default_value = "http://localhost:5000/api"
    )]
    pub api_url: String,
}
