// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use crate::core::TimetableError;
use crate::core::metrics;
use crate::core::protocol::line_codec::{NO_EARLY_LECTURES, STOP_ACK};
use crate::core::protocol::{FIELD_DELIMITER, LineCodec, Request, Response};
use crate::core::schedule::{AddOutcome, RemoveOutcome};
use crate::core::state::ServerState;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Reason sent to clients when the server stops while they are connected.
const SHUTDOWN_REASON: &str = "Server is shutting down";

/// The next step for the connection's main loop to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextAction {
    Continue,
    Close,
}

/// What a read from the connection produced.
enum Incoming {
    Line(String),
    EndOfStream,
    IdleTimeout,
}

/// Manages the full lifecycle of a client connection.
///
/// The handler is generic over the byte stream so it can serve a
/// `TcpStream` in production and an in-memory duplex pipe in tests.
pub struct ConnectionHandler<S> {
    framed: Framed<S, LineCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_rx: broadcast::Receiver<()>,
    idle_timeout: Option<Duration>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new `ConnectionHandler`.
    pub fn new(
        stream: S,
        addr: SocketAddr,
        state: Arc<ServerState>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let codec = LineCodec::new(state.config.max_line_length);
        let idle_timeout = state.config.idle_timeout();
        Self {
            framed: Framed::new(stream, codec),
            addr,
            state,
            shutdown_rx,
            idle_timeout,
        }
    }

    /// Serves the connection until the client disconnects, sends `STOP`,
    /// goes idle for too long, or the server shuts down.
    pub async fn run(&mut self) -> Result<(), TimetableError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.addr);
        let result = self.serve().await;
        if let Err(e) = &result {
            self.state.record(&format!("Error: {e}"));
        }
        result
    }

    async fn serve(&mut self) -> Result<(), TimetableError> {
        loop {
            let incoming = tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    let _ = self.send(Response::Error(SHUTDOWN_REASON.to_string())).await;
                    return Ok(());
                }
                incoming = read_line(&mut self.framed, self.idle_timeout) => incoming,
            };

            match incoming {
                Ok(Incoming::Line(line)) => match self.process_line(line).await {
                    Ok(NextAction::Continue) => {}
                    Ok(NextAction::Close) => {
                        debug!("Client {} sent STOP, closing connection.", self.addr);
                        return Ok(());
                    }
                    Err(e) if e.is_normal_disconnect() => {
                        debug!("Client {} went away before the reply was sent: {}", self.addr, e);
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                },
                Ok(Incoming::EndOfStream) => {
                    debug!("Connection from {} closed by peer.", self.addr);
                    return Ok(());
                }
                Ok(Incoming::IdleTimeout) => {
                    info!("Closing idle connection from {}.", self.addr);
                    return Ok(());
                }
                Err(e @ TimetableError::LineTooLong(_)) => {
                    warn!("Protocol violation from {}: {}", self.addr, e);
                    if let Err(send_err) = self.send(e.clone().into()).await
                        && !send_err.is_normal_disconnect()
                    {
                        return Err(send_err);
                    }
                    return Err(e);
                }
                Err(e) if e.is_normal_disconnect() => {
                    debug!("Connection from {} closed by peer: {}", self.addr, e);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Connection error for {}: {}", self.addr, e);
                    return Err(e);
                }
            }
        }
    }

    /// Parses one request line, applies it to the schedule and writes the response.
    async fn process_line(&mut self, line: String) -> Result<NextAction, TimetableError> {
        debug!("Client {}: Received line: {:?}", self.addr, line);
        self.state.record(&format!("Received: {line}"));
        self.state.stats.increment_total_requests();
        metrics::REQUESTS_PROCESSED_TOTAL.inc();

        let (response, next) = match Request::try_from(line.as_str()) {
            Ok(request) => self.execute(request),
            Err(e) => (e.into(), NextAction::Continue),
        };
        self.send(response).await?;
        Ok(next)
    }

    fn execute(&self, request: Request) -> (Response, NextAction) {
        let schedule = &self.state.schedule;
        let response = match request {
            Request::AddLecture(lecture) => {
                let text = lecture.to_string();
                match schedule.add(lecture) {
                    Ok(AddOutcome::Added) => {
                        metrics::LECTURES_ADDED_TOTAL.inc();
                        metrics::SCHEDULED_LECTURES.inc();
                        self.state.record(&format!("Added: {text}"));
                        AddOutcome::Added.into()
                    }
                    Ok(AddOutcome::Conflict) => {
                        metrics::SCHEDULING_CLASHES_TOTAL.inc();
                        AddOutcome::Conflict.into()
                    }
                    Err(e) => e.into(),
                }
            }
            Request::RemoveLecture(lecture) => match schedule.remove(&lecture) {
                Ok(RemoveOutcome::Removed) => {
                    metrics::LECTURES_REMOVED_TOTAL.inc();
                    metrics::SCHEDULED_LECTURES.dec();
                    self.state.record(&format!("Removed: {lecture}"));
                    RemoveOutcome::Removed.into()
                }
                Ok(outcome) => outcome.into(),
                Err(e) => e.into(),
            },
            Request::DisplaySchedule => Response::Block(schedule.snapshot().lines().collect()),
            Request::EarlyLectures => match schedule.early_lectures() {
                Ok(early) if early.is_empty() => Response::line(NO_EARLY_LECTURES),
                // One line, so the client always reads a single reply.
                Ok(early) => Response::Line(
                    early
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(FIELD_DELIMITER),
                ),
                Err(e) => e.into(),
            },
            Request::Stop => return (Response::line(STOP_ACK), NextAction::Close),
        };
        (response, NextAction::Continue)
    }

    /// Writes a response and mirrors every line to the activity sink.
    async fn send(&mut self, response: Response) -> Result<(), TimetableError> {
        for line in response.wire_lines() {
            self.state.record(&format!("Sent: {line}"));
        }
        self.framed.send(response).await
    }
}

/// Reads the next request line, giving up after `idle_timeout` if one is set.
async fn read_line<S>(
    framed: &mut Framed<S, LineCodec>,
    idle_timeout: Option<Duration>,
) -> Result<Incoming, TimetableError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let next = match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, framed.next()).await {
            Ok(next) => next,
            Err(_) => return Ok(Incoming::IdleTimeout),
        },
        None => framed.next().await,
    };
    match next {
        Some(Ok(line)) => Ok(Incoming::Line(line)),
        Some(Err(e)) => Err(e),
        None => Ok(Incoming::EndOfStream),
    }
}
