//! Shell Server
//!
//! HTTP server for clean-URL deployments, built with Axum. With history-mode
//! addressing every deep link reaches the server, so any path that is not an
//! API or asset path is answered with the application shell, rendered for the
//! route it matches.
//!
//! # Endpoints
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! ## Introspection
//! - `GET /api/routes` - The route table
//! - `GET /api/resolve?url=/users/7` - Resolve a URL
//!
//! ## Shell
//! - `GET /assets/*` - Static files (when `assets_dir` is set)
//! - `GET /*` - Application shell (404 status for the fallback route)
//!
//! # Example
//!
//! ```rust,ignore
//! use spa_routes::config::ServerConfig;
//! use spa_routes::navigation::RouterOptions;
//! use spa_routes::routes::RouteTable;
//! use spa_routes::server::{serve, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Arc::new(RouterOptions::new(RouteTable::default_table()?));
//!     let config = ServerConfig::default();
//!
//!     let state = AppState::new(router, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Build the server router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let api_routes = Router::new()
        .route("/routes", get(handlers::list_routes))
        .route("/resolve", get(handlers::resolve));

    let health_routes = Router::new()
        .route("/live", get(handlers::liveness))
        .route("/", get(handlers::health));

    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    if let Some(dir) = &config.assets_dir {
        tracing::info!("Serving assets from {}", dir);
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router = router
        .fallback(handlers::render_shell)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    // 0 disables the request timeout
    if config.request_timeout_secs > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )));
    }

    router.with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD])
}

/// Start the shell server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Shell server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Shell server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
