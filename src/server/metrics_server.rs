// src/server/metrics_server.rs

use crate::config::Config;
use crate::core::metrics::{self, gather_metrics};
use crate::core::state::ServerState;
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Handles HTTP requests to the /metrics endpoint.
async fn metrics_handler(state: Arc<ServerState>) -> impl IntoResponse {
    // The gauge is process-wide; resync it with this server's schedule.
    metrics::SCHEDULED_LECTURES.set(state.schedule.len() as f64);

    let body = gather_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        body,
    )
}

/// Binds the metrics listener on the service host.
async fn bind(config: &Config) -> io::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.metrics.port)).await
}

/// Runs a simple HTTP server to expose Prometheus metrics on /metrics.
pub async fn run_metrics_server(state: Arc<ServerState>, mut shutdown_rx: broadcast::Receiver<()>) {
    let listener = match bind(&state.config).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Failed to bind metrics server on {}:{}: {}",
                state.config.host, state.config.metrics.port, e
            );
            return;
        }
    };
    if let Ok(addr) = listener.local_addr() {
        info!(
            "Prometheus metrics server listening on http://{}/metrics",
            addr
        );
    }

    let app = Router::new().route("/metrics", get(move || metrics_handler(state.clone())));

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.recv().await.ok();
            info!("Metrics server shutting down.");
        })
        .await
    {
        error!("Metrics server failed: {}", e);
    }
}
