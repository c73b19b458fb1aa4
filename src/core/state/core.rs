// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use super::stats::StatsState;
use crate::config::Config;
use crate::core::events::{ActivitySink, TracingSink};
use crate::core::schedule::Schedule;
use std::sync::Arc;

/// The central struct holding all shared, server-wide state.
///
/// It is wrapped in an `Arc` and handed to every connection handler. The
/// schedule is the only mutable piece and carries its own lock.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub schedule: Schedule,
    pub stats: StatsState,
    /// Where connection lifecycle and traffic lines are reported.
    pub sink: Arc<dyn ActivitySink>,
}

impl ServerState {
    /// Creates server state that reports activity through `tracing`.
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Creates server state with a caller-provided activity sink.
    pub fn with_sink(config: Config, sink: Arc<dyn ActivitySink>) -> Arc<Self> {
        Arc::new(Self {
            config,
            schedule: Schedule::new(),
            stats: StatsState::new(),
            sink,
        })
    }

    /// Reports one activity line to the configured sink.
    pub fn record(&self, line: &str) {
        self.sink.record(line);
    }
}
