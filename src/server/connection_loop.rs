// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::state::ServerState;
use anyhow::{Result, anyhow};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, broadcast};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// How long connected clients get to wind down after the shutdown broadcast.
const CLIENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const BACKGROUND_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_CLIENTS_REPLY: &[u8] = b"Error: max number of clients reached\n";

/// The main server loop. Accepts connections until `shutdown` resolves or
/// the listener fails with a non-transient error.
pub async fn run<F>(mut ctx: ServerContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut client_tasks = JoinSet::new();
    let permits = match ctx.state.config.max_clients {
        0 => None,
        n => Some(Arc::new(Semaphore::new(n))),
    };
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested, initiating graceful shutdown.");
                break Ok(());
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => error!("Background task failed: {}", e),
                    Err(e) => error!("Background task panicked: {e:?}"),
                }
            },

            res = ctx.listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!("Accepted new connection from: {}", addr);
                        spawn_client(&mut client_tasks, &ctx, permits.as_ref(), socket, addr);
                    }
                    Err(e) if is_transient_accept_error(&e) => {
                        warn!("Failed to accept connection: {}", e);
                    }
                    Err(e) => {
                        error!("CRITICAL: Listener failed: {}. Shutting down.", e);
                        ctx.state.record(&format!("Error: listener failed: {e}"));
                        break Err(anyhow!("Listener failed: {}", e));
                    }
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    };

    info!("Shutting down. Sending signal to all tasks.");
    // No receivers simply means there is nothing left to stop.
    let _ = ctx.shutdown_tx.send(());

    if tokio::time::timeout(CLIENT_DRAIN_TIMEOUT, async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for clients to disconnect; aborting the rest.");
        client_tasks.shutdown().await;
    }
    info!("All client connections closed.");

    if tokio::time::timeout(BACKGROUND_DRAIN_TIMEOUT, async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    }
    info!("Server shutdown complete.");
    outcome
}

/// Hands an accepted socket to a freshly spawned connection handler, or
/// turns it away when the client limit is reached.
fn spawn_client(
    client_tasks: &mut JoinSet<()>,
    ctx: &ServerContext,
    permits: Option<&Arc<Semaphore>>,
    socket: TcpStream,
    addr: SocketAddr,
) {
    let permit: Option<OwnedSemaphorePermit> = match permits {
        Some(semaphore) => match semaphore.clone().try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                warn!("Rejecting {}: max number of clients reached.", addr);
                client_tasks.spawn(reject_client(socket));
                return;
            }
        },
        None => None,
    };

    let state: Arc<ServerState> = ctx.state.clone();
    let shutdown_rx: broadcast::Receiver<()> = ctx.shutdown_tx.subscribe();
    client_tasks.spawn(async move {
        let _permit = permit;
        let mut handler = ConnectionHandler::new(socket, addr, state, shutdown_rx);
        if let Err(e) = handler.run().await {
            warn!("Connection from {} terminated unexpectedly: {}", addr, e);
        }
    });
}

async fn reject_client(mut socket: TcpStream) {
    let _ = socket.write_all(MAX_CLIENTS_REPLY).await;
    let _ = socket.shutdown().await;
}

/// Accept errors that concern a single connection attempt, not the listener.
fn is_transient_accept_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received."),
        _ = terminate => info!("SIGTERM received."),
    }
}
