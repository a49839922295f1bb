//! HTTP service
//!
//! - `POST /api/sanitize` - mask a text
//! - `GET /api/health` - liveness

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use crate::config::ServerConfig;
use crate::domain::{Result, ScrubError};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until SIGINT or SIGTERM
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ScrubError::Configuration(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "Scrubber listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScrubError::Io(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C), shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
