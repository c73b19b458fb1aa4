// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource management.

use crate::core::metrics;
use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Accounts for a connection from the moment it is served until its handler
/// scope is exited, whichever way that happens.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    addr: SocketAddr,
}

impl ConnectionGuard {
    /// Registers the connection in the stats and reports it to the activity sink.
    pub fn new(state: Arc<ServerState>, addr: SocketAddr) -> Self {
        state.stats.connection_opened();
        metrics::CONNECTIONS_RECEIVED_TOTAL.inc();
        metrics::CONNECTED_CLIENTS.inc();
        state.record(&format!("Client connected from {addr}"));
        Self { state, addr }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "ConnectionGuard dropping, cleaning up resources for connection {}",
            self.addr
        );
        metrics::CONNECTED_CLIENTS.dec();
        self.state.stats.connection_closed();
        self.state
            .record(&format!("Client disconnected: {}", self.addr));
    }
}
