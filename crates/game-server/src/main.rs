//! Neon Void game server
//!
//! Serves ship visuals, the leaderboard and the destroyed-ship log over HTTP.
//! State lives in a sled database (or in memory) and is flushed on shutdown.

use anyhow::Result;
use clap::Parser;
use game_api::{ApiContext, HttpApiServer};
use game_service::{DestroyedShipEvent, DestroyedShipLog, LeaderboardEntry, LeaderboardService};
use game_store::{
    Collection, MemoryCollection, SledStore, DESTROYED_SHIPS_COLLECTION, LEADERBOARD_COLLECTION,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::{ServerConfig, StoreKind};

/// Neon Void game backend
#[derive(Parser, Debug)]
#[command(name = "neon-void-server")]
#[command(about = "Leaderboard, destroyed-ship log and ship visuals for Neon Void", long_about = None)]
struct Args {
    /// HTTP bind address
    #[arg(long, env = "GAME_HTTP_ADDR", default_value = "127.0.0.1:5000")]
    http_addr: String,

    /// Store backend
    #[arg(long, value_enum, env = "GAME_STORE", default_value = "sled")]
    store: StoreKind,

    /// Data directory for persistent state
    #[arg(long, env = "GAME_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Database name
    #[arg(long, env = "GAME_DATABASE", default_value = "neon_void")]
    database: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    request_timeout_secs: u64,

    /// Allowed CORS origin (repeatable, default any)
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            http_addr: args.http_addr.clone(),
            store: args.store,
            data_dir: args.data_dir.clone(),
            database: args.database.clone(),
            request_timeout_secs: args.request_timeout_secs,
            cors_origins: args.cors_origins.clone(),
        }
    }
}

/// Opened collections plus the database handle that owns them, if any
struct Collections {
    leaderboard: Arc<dyn Collection<LeaderboardEntry>>,
    destroyed_ships: Arc<dyn Collection<DestroyedShipEvent>>,
    sled: Option<SledStore>,
}

fn open_collections(config: &ServerConfig) -> Result<Collections> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Collections {
                leaderboard: Arc::new(MemoryCollection::<LeaderboardEntry>::new(LEADERBOARD_COLLECTION)),
                destroyed_ships: Arc::new(MemoryCollection::<DestroyedShipEvent>::new(
                    DESTROYED_SHIPS_COLLECTION,
                )),
                sled: None,
            })
        }
        StoreKind::Sled => {
            // Create data directory if it doesn't exist
            std::fs::create_dir_all(&config.data_dir)?;

            let store = SledStore::open(&config.data_dir, &config.database)?;
            let leaderboard = store.collection::<LeaderboardEntry>(LEADERBOARD_COLLECTION)?;
            let destroyed_ships = store.collection::<DestroyedShipEvent>(DESTROYED_SHIPS_COLLECTION)?;

            Ok(Collections {
                leaderboard: Arc::new(leaderboard),
                destroyed_ships: Arc::new(destroyed_ships),
                sled: Some(store),
            })
        }
    }
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves once `signal` fires; never resolves if the signal cannot be
/// listened for, so the server keeps running
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from(&args);

    tracing::info!("Starting Neon Void game server");
    tracing::info!("  HTTP: {}", config.http_addr);
    tracing::info!("  Store: {:?}", config.store);
    tracing::info!("  Data directory: {:?}", config.data_dir);
    tracing::info!("  Database: {}", config.database);
    tracing::debug!("Config: {}", serde_json::to_string(&config)?);

    let collections = open_collections(&config)?;
    tracing::info!(
        "Loaded {} leaderboard entries, {} destroyed ships",
        collections.leaderboard.len()?,
        collections.destroyed_ships.len()?
    );

    let context = Arc::new(ApiContext::new(
        LeaderboardService::new(collections.leaderboard.clone()),
        DestroyedShipLog::new(collections.destroyed_ships.clone()),
    ));

    let server = HttpApiServer::new(context, config.api_config());
    tracing::info!("Press Ctrl+C to stop.");

    let result = server.run(shutdown_signal()).await;
    if let Err(e) = &result {
        tracing::error!("HTTP server error: {}", e);
    }

    // Save state before exit
    if let Some(store) = &collections.sled {
        match store.flush() {
            Ok(()) => tracing::info!("Flushed database {} to disk", store.database()),
            Err(e) => tracing::error!("Failed to flush database: {}", e),
        }
    }

    tracing::info!("Server stopped");

    result
}
