// src/server/initialization.rs

//! Binds the listening socket and prepares the server context.

use super::context::ServerContext;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Initializes all server components before starting the main loop.
pub async fn setup(state: Arc<ServerState>) -> Result<ServerContext> {
    log_startup_info(&state);

    let (host, port) = (state.config.host.as_str(), state.config.port);
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!("timetabled listening on {}:{}", host, port);
    state.record(&format!("Server started on port {port}. Waiting for clients..."));

    Ok(ServerContext::new(state, listener))
}

fn log_startup_info(state: &ServerState) {
    let config = &state.config;
    info!("Starting timetabled v{}", env!("CARGO_PKG_VERSION"));
    match config.max_clients {
        0 => info!("Client limit: unlimited"),
        n => info!("Client limit: {}", n),
    }
    match config.idle_timeout() {
        Some(timeout) => info!("Idle connections close after {:?}", timeout),
        None => info!("Idle timeout disabled"),
    }
}
