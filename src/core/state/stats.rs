// src/core/state/stats.rs

//! Contains state definitions and logic for server statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-server counters. The Prometheus metrics are process-global; these
/// belong to one `ServerState`.
#[derive(Debug, Default)]
pub struct StatsState {
    /// The total number of connections accepted since startup.
    total_connections: AtomicU64,
    /// The number of connections currently being served.
    active_connections: AtomicU64,
    /// The total number of request lines processed since startup.
    total_requests: AtomicU64,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted connection.
    pub fn connection_opened(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a released connection.
    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn increment_total_requests(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn get_active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    pub fn get_total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }
}
