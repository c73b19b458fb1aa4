// src/server/mod.rs

use crate::core::state::ServerState;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

mod connection_loop;
mod context;
mod initialization;
mod metrics_server;
mod spawner;

pub use connection_loop::shutdown_signal;
pub use context::ServerContext;

/// The main server startup function, orchestrating all setup phases.
/// Runs until SIGINT/SIGTERM or a fatal listener error.
pub async fn run(state: Arc<ServerState>) -> Result<()> {
    // 1. Bind the listener.
    let mut server_context = initialization::setup(state).await?;

    // 2. Spawn all background tasks.
    spawner::spawn_all(&mut server_context);

    // 3. Accept connections until shutdown.
    connection_loop::run(server_context, shutdown_signal()).await
}

/// Serves connections from an already bound listener until `shutdown` resolves.
pub async fn run_until<F>(listener: TcpListener, state: Arc<ServerState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut server_context = ServerContext::new(state, listener);
    spawner::spawn_all(&mut server_context);
    connection_loop::run(server_context, shutdown).await
}
