//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Maximum accepted size of an uploaded CSV file, in megabytes.
    #[serde(default = "default_upload_limit_mb")]
    pub upload_limit_mb: usize,
}

fn default_upload_limit_mb() -> usize {
    10
}
