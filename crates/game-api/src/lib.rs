//! Game API - HTTP transport for the game backend
//!
//! Exposes the game services over HTTP/JSON:
//! - Ship visuals: `/generate_visual`, `/generateShip`
//! - Leaderboard: `/leaderboard/:game_mode`, `/leaderboard/user/:address/:game_mode`, `/submit_score`
//! - Destroyed ships: `/destroy_ship`, `/user/:address/ships_destroyed`

pub mod error;
pub mod handlers;
pub mod http_server;

pub use error::ApiError;
pub use handlers::ApiContext;
pub use http_server::HttpApiServer;

use std::time::Duration;

/// API server configuration
#[derive(Clone, Debug)]
pub struct ApiServerConfig {
    /// HTTP bind address
    pub http_addr: String,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:5000".to_string(),
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(10),
        }
    }
}
