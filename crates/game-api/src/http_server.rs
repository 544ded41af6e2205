//! HTTP Server
//!
//! Builds the axum router and serves it until shutdown.

use crate::handlers::{
    handle_destroy_ship, handle_generate_ship, handle_generate_visual, handle_get_destroyed_ships,
    handle_get_health, handle_get_leaderboard, handle_get_user_rank, handle_submit_score, ApiContext,
};
use crate::error::handle_layer_error;
use crate::ApiServerConfig;
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// HTTP API Server
pub struct HttpApiServer {
    context: Arc<ApiContext>,
    config: ApiServerConfig,
}

impl HttpApiServer {
    /// Create a new HTTP API server
    pub fn new(context: Arc<ApiContext>, config: ApiServerConfig) -> Self {
        Self { context, config }
    }

    fn cors(&self) -> CorsLayer {
        // CORS layer to allow browser clients
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        let origins: Vec<HeaderValue> = self
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(origins))
        }
    }

    /// Wrap `routes` in tracing, CORS and the request timeout
    ///
    /// Layer errors (a timeout included) become JSON `{error}` responses.
    fn with_layers(&self, routes: Router<Arc<ApiContext>>) -> Router<Arc<ApiContext>> {
        let layers = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(self.cors())
            .layer(HandleErrorLayer::new(handle_layer_error))
            .layer(TimeoutLayer::new(self.config.request_timeout));

        routes.layer(layers)
    }

    /// Create the Axum router
    pub fn router(&self) -> Router {
        let routes = Router::new()
            .route("/generate_visual", get(handle_generate_visual))
            .route("/generateShip", get(handle_generate_ship))
            .route("/leaderboard/:game_mode", get(handle_get_leaderboard))
            .route("/leaderboard/user/:address/:game_mode", get(handle_get_user_rank))
            .route("/submit_score", post(handle_submit_score))
            .route("/destroy_ship", post(handle_destroy_ship))
            .route("/user/:address/ships_destroyed", get(handle_get_destroyed_ships))
            .route("/health", get(handle_get_health));

        self.with_layers(routes).with_state(self.context.clone())
    }

    /// Run the server until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.config.http_addr).await?;
        tracing::info!("HTTP API server listening on {}", self.config.http_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
