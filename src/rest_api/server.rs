//! Axum HTTP server for the REST API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::carbon_aware::SchedulingService;
use crate::{Error, Result};

use super::handlers;
use super::sustainability::sustainability_router;

/// Metrics endpoint handler
#[cfg(feature = "metrics")]
async fn metrics_handler() -> String {
    crate::metrics::encode()
}

/// Assemble the full application router
pub fn build_router(service: Arc<SchedulingService>) -> Router {
    let api = Router::new()
        .route("/regions", get(handlers::list_regions))
        .route("/jobs", post(handlers::submit_job))
        .route("/history", get(handlers::list_history))
        .route("/history/export", get(handlers::export_history))
        .route(
            "/history/{id}",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .merge(sustainability_router());

    let app = Router::new().route("/health", get(handlers::health));

    #[cfg(feature = "metrics")]
    let app = app.route("/metrics", get(metrics_handler));

    app.nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Run the REST API server
pub async fn run_server(service: Arc<SchedulingService>, addr: SocketAddr) -> Result<()> {
    let app = build_router(service);

    info!("REST API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::ConfigError(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::ConfigError(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
