// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, TextEncoder, register_counter, register_gauge};

lazy_static! {
    // --- Server-wide Gauges ---
    /// The number of clients currently connected to the server.
    pub static ref CONNECTED_CLIENTS: Gauge =
        register_gauge!("timetabled_connected_clients", "Number of currently connected clients.").unwrap();
    /// The number of lectures currently in the schedule.
    pub static ref SCHEDULED_LECTURES: Gauge =
        register_gauge!("timetabled_scheduled_lectures", "Number of lectures currently scheduled.").unwrap();

    // --- Server-wide Counters ---
    /// The total number of connections accepted by the server since startup.
    pub static ref CONNECTIONS_RECEIVED_TOTAL: Counter =
        register_counter!("timetabled_connections_received_total", "Total number of connections received.").unwrap();
    /// The total number of request lines processed, including malformed ones.
    pub static ref REQUESTS_PROCESSED_TOTAL: Counter =
        register_counter!("timetabled_requests_processed_total", "Total number of requests processed.").unwrap();
    pub static ref LECTURES_ADDED_TOTAL: Counter =
        register_counter!("timetabled_lectures_added_total", "Total number of lectures added.").unwrap();
    pub static ref LECTURES_REMOVED_TOTAL: Counter =
        register_counter!("timetabled_lectures_removed_total", "Total number of lectures removed.").unwrap();
    /// The total number of add requests rejected because of a clash.
    pub static ref SCHEDULING_CLASHES_TOTAL: Counter =
        register_counter!("timetabled_scheduling_clashes_total", "Total number of rejected clashing lectures.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|e| format!("# failed to encode metrics: {e}\n"))
}
