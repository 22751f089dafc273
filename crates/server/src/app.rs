//! Axum application builder.
//!
//! Configures routes, middleware, and state for the server.
//!
//! # Design Principles
//!
//! - **Declarative**: Routes declared via Axum's type-safe Router
//! - **Modular**: App builder separate from handlers
//! - **SoC**: Configuration here, logic in route modules
//!
//! # Routes
//!
//! - `GET /health`, `GET /health/ready` - Probes
//! - `GET /ws` - WebSocket snapshot stream
//! - `GET /api/status`, `POST /api/command` - Engine status and control
//! - `GET|POST /api/bots`, `GET|DELETE /api/bots/{bot_id}` - Bot roster
//! - `POST /api/bots/{bot_id}/start|pause|settings|status` - Bot commands
//! - `GET /api/bots/{bot_id}/trades` - Trade history
//! - `GET /api/market?pair=X` - Market tickers

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{api, data, health, ws};
use crate::state::ServerState;

/// Create the Axum application with all routes.
pub fn create_app(state: ServerState) -> Router {
    // CORS layer for frontend development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // WebSocket endpoint
        .route("/ws", get(ws::ws_handler))
        // Engine status and control
        .route("/api/status", get(api::get_status))
        .route("/api/command", post(api::post_command))
        // Bot roster
        .route("/api/bots", get(data::get_bots).post(api::create_bot))
        .route(
            "/api/bots/{bot_id}",
            get(data::get_bot).delete(api::delete_bot),
        )
        .route("/api/bots/{bot_id}/trades", get(data::get_bot_trades))
        // Bot commands
        .route("/api/bots/{bot_id}/start", post(api::start_bot))
        .route("/api/bots/{bot_id}/pause", post(api::pause_bot))
        .route("/api/bots/{bot_id}/settings", post(api::update_settings))
        .route("/api/bots/{bot_id}/status", post(api::set_bot_status))
        // Market data
        .route("/api/market", get(data::get_market))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Server configuration.
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            host: "0.0.0.0".into(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("SIM_SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8001);

        let host = std::env::var("SIM_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());

        Self { port, host }
    }

    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bind a listener and serve the app until the process is stopped.
pub async fn serve(config: &ServerConfig, state: ServerState) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "server listening");
    axum::serve(listener, app).await
}
