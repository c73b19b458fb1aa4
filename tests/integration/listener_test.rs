// tests/integration/listener_test.rs

//! Listener lifecycle: client limits, idle timeouts, shutdown and activity reporting.

use super::fixtures::*;
use super::test_helpers::{LineClient, TestServer};
use std::sync::Arc;
use std::time::Duration;
use timetabled::config::Config;
use timetabled::core::events::ChannelSink;
use timetabled::core::state::ServerState;

#[tokio::test]
async fn test_disconnect_does_not_affect_other_clients() {
    let server = TestServer::start().await;
    let first = server.connect().await;
    let mut second = server.connect().await;

    drop(first);
    assert_eq!(second.request(ADD_CS101).await, "Lecture added successfully.");
}

#[tokio::test]
async fn test_client_limit_rejects_extra_connections() {
    let config = Config {
        max_clients: 1,
        ..Config::default()
    };
    let server = TestServer::with_config(config).await;

    let mut first = server.connect().await;
    assert_eq!(first.request(ADD_CS101).await, "Lecture added successfully.");

    let mut second = LineClient::connect(server.addr).await;
    assert_eq!(
        second.recv().await.as_deref(),
        Some("Error: max number of clients reached")
    );
    assert_eq!(second.recv().await, None);
}

#[tokio::test]
async fn test_idle_timeout_closes_silent_connection() {
    let config = Config {
        idle_timeout_secs: 1,
        ..Config::default()
    };
    let server = TestServer::with_config(config).await;
    let mut client = server.connect().await;

    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_shutdown_notifies_connected_clients() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.request(ADD_CS101).await;

    server.stop().await.unwrap();
    assert_eq!(
        client.recv().await.as_deref(),
        Some("Error: Server is shutting down")
    );
    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_activity_sink_sees_traffic() {
    let (sink, mut rx) = ChannelSink::new(256);
    let state = ServerState::with_sink(Config::default(), Arc::new(sink));
    let server = TestServer::with_state(state).await;
    let mut client = server.connect().await;

    client.request(ADD_CS101).await;
    client.request("STOP").await;
    assert_eq!(client.recv().await, None);

    let mut lines = Vec::new();
    while lines.last().map(|l: &String| !l.starts_with("Client disconnected")).unwrap_or(true) {
        let line = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("sink received nothing")
            .expect("sink channel closed");
        lines.push(line);
    }

    assert!(lines[0].starts_with("Client connected from 127.0.0.1:"));
    assert!(lines.contains(&format!("Received: {ADD_CS101}")));
    assert!(lines.contains(&"Sent: Lecture added successfully.".to_string()));
    assert!(lines.contains(&format!("Added: {CS101_LINE}")));
    assert!(lines.contains(&"Sent: TERMINATE".to_string()));
    assert_eq!(server.state.stats.get_total_connections(), 1);
}
