// src/core/events.rs

//! Defines the activity sink that connection handlers report lifecycle and
//! traffic lines to (`Client connected from ...`, `Received: ...`, `Sent: ...`).
//!
//! Recording is fire-and-forget: a sink must never block protocol progress.

use std::fmt;
use tokio::sync::mpsc::{self, Sender as MpscSender, error::TrySendError};
use tracing::{debug, info};

/// The default capacity of a `ChannelSink`.
pub const DEFAULT_SINK_CAPACITY: usize = 1024;

/// Receives one text line per observable event.
pub trait ActivitySink: Send + Sync + fmt::Debug {
    fn record(&self, line: &str);
}

/// Emits activity lines through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ActivitySink for TracingSink {
    fn record(&self, line: &str) {
        info!(target: "timetabled::activity", "{line}");
    }
}

/// Forwards activity lines into a bounded channel, for presentation layers
/// that render server logs themselves. Lines are dropped when the channel
/// is full or its receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: MpscSender<String>,
}

impl ChannelSink {
    /// Creates a sink together with the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl ActivitySink for ChannelSink {
    fn record(&self, line: &str) {
        match self.sender.try_send(line.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("Activity channel is full; dropping line.");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Activity channel is closed; dropping line.");
            }
        }
    }
}
