//! Server Configuration

use clap::ValueEnum;
use game_api::ApiServerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where game data is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-process only, lost on restart
    Memory,
    /// sled database under the data directory
    Sled,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address
    pub http_addr: String,
    /// Store backend
    pub store: StoreKind,
    /// Data directory for the sled store
    pub data_dir: PathBuf,
    /// Database name; prefixes every collection
    pub database: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:5000".to_string(),
            store: StoreKind::Sled,
            data_dir: PathBuf::from("./data"),
            database: "neon_void".to_string(),
            request_timeout_secs: 10,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn api_config(&self) -> ApiServerConfig {
        ApiServerConfig {
            http_addr: self.http_addr.clone(),
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
