//! REST API and WebSocket server for the monitoring hub
//!
//! The HTTP layer is a thin consumer of the core: CRUD goes straight
//! to the target store, on-demand checks go through the monitor
//! handles, and the WebSocket forwards the snapshot broadcast.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/health` - liveness
//! - `GET/POST /api/v1/servers`, `DELETE /api/v1/servers/:id`
//! - `GET /api/v1/servers/check` - on-demand sweep, returns snapshot
//! - `GET/POST /api/v1/websites`, `DELETE /api/v1/websites/:id`
//! - `GET /api/v1/websites/check`
//! - `WS /api/v1/stream` - live snapshot streaming

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod websocket;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_addr: SocketAddr,

    /// Optional authentication token
    pub auth_token: Option<String>,

    /// Enable CORS for dashboard clients
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            auth_token: None,
            enable_cors: true,
        }
    }
}

/// Spawn the API server
///
/// Starts an Axum HTTP server in a background task and returns the
/// bound address (useful with port 0 in tests).
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    info!("starting API server on {}", config.bind_addr);

    let mut app = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route(
            "/api/v1/servers",
            get(routes::servers::list_servers).post(routes::servers::add_server),
        )
        .route(
            "/api/v1/servers/check",
            get(routes::servers::check_servers),
        )
        .route(
            "/api/v1/servers/:id",
            axum::routing::delete(routes::servers::delete_server),
        )
        .route(
            "/api/v1/websites",
            get(routes::websites::list_websites).post(routes::websites::add_website),
        )
        .route(
            "/api/v1/websites/check",
            get(routes::websites::check_websites),
        )
        .route(
            "/api/v1/websites/:id",
            axum::routing::delete(routes::websites::delete_website),
        )
        .route("/api/v1/stream", get(websocket::websocket_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    if let Some(token) = config.auth_token {
        app = app.layer(axum::middleware::from_fn_with_state(
            token,
            middleware::auth::auth_middleware,
        ));
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
