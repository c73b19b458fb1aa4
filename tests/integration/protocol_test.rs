// tests/integration/protocol_test.rs

//! End-to-end request/response scenarios over a real TCP connection.

use super::fixtures::*;
use super::test_helpers::TestServer;

#[tokio::test]
async fn test_add_then_display_schedule() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.request(ADD_CS101).await, "Lecture added successfully.");
    assert_eq!(client.display_schedule().await, vec![CS101_LINE]);
}

#[tokio::test]
async fn test_duplicate_add_reports_clash() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.request(ADD_CS101).await, "Lecture added successfully.");
    assert_eq!(client.request(ADD_CS101).await, "Scheduling clash detected.");
    assert_eq!(client.display_schedule().await, vec![CS101_LINE]);
}

#[tokio::test]
async fn test_remove_from_empty_store() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let reply = client
        .request("Remove Lecture; CS999; Monday; 09:00; 10:00; Room Z")
        .await;
    assert_eq!(reply, "Lecture not found.");
}

#[tokio::test]
async fn test_add_remove_restores_schedule() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.request(ADD_CS101).await;
    let before = client.display_schedule().await;

    let add = add_line("MA202", "Tuesday", "13:00", "14:00", "Room B");
    let remove = remove_line("MA202", "Tuesday", "13:00", "14:00", "Room B");
    assert_eq!(client.request(&add).await, "Lecture added successfully.");
    assert_eq!(client.request(&remove).await, "Lecture removed.");
    assert_eq!(client.display_schedule().await, before);
}

#[tokio::test]
async fn test_empty_schedule_placeholder() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.display_schedule().await, vec!["No lectures found."]);
}

#[tokio::test]
async fn test_malformed_line_leaves_store_unchanged() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let reply = client.request("Add Lecture; OnlyOneField").await;
    assert!(reply.starts_with("Error:"), "unexpected reply: {reply}");
    assert!(server.state.schedule.is_empty());

    // The connection stays usable after a bad request.
    assert_eq!(client.request(ADD_CS101).await, "Lecture added successfully.");
}

#[tokio::test]
async fn test_unknown_command() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(
        client.request("Book Room; Room A").await,
        "Error: Invalid action: Book Room"
    );
}

#[tokio::test]
async fn test_empty_field_is_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let reply = client.request(&add_line("CS101", "Monday", "09:00", "10:00", "")).await;
    assert_eq!(reply, "Error: room must not be empty");
    assert!(server.state.schedule.is_empty());
}

#[tokio::test]
async fn test_early_lectures() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    for (module, start, end) in [
        ("CS101", "09:00", "10:00"),
        ("CS102", "11:00", "12:00"),
        ("CS103", "12:00", "13:00"),
        ("CS104", "14:00", "15:00"),
    ] {
        let reply = client
            .request(&add_line(module, "Wednesday", start, end, "Room C"))
            .await;
        assert_eq!(reply, "Lecture added successfully.");
    }

    assert_eq!(
        client.request("Early Lectures").await,
        "CS101: Wednesday from 09:00 to 10:00 in Room C; \
         CS102: Wednesday from 11:00 to 12:00 in Room C"
    );

    // The reply is one line, so the next request gets its own answer.
    assert_eq!(
        client
            .request(&remove_line("CS999", "Monday", "09:00", "10:00", "Room Z"))
            .await,
        "Lecture not found."
    );
}

#[tokio::test]
async fn test_trailing_fields_on_display_schedule_are_ignored() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.request(ADD_CS101).await;

    client.send("Display Schedule; x").await;
    assert_eq!(client.recv_line().await, CS101_LINE);
    assert_eq!(client.recv_line().await, "END");
    assert_eq!(client.request("STOP; now").await, "TERMINATE");
}

#[tokio::test]
async fn test_early_lectures_with_malformed_start() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client
        .request(&add_line("CS101", "Monday", "nine", "10:00", "Room A"))
        .await;
    let reply = client.request("Early Lectures").await;
    assert_eq!(reply, "Error: Invalid time 'nine', expected HH:MM");
    assert_eq!(server.state.schedule.len(), 1);
}

#[tokio::test]
async fn test_stop_closes_connection() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.request("STOP").await, "TERMINATE");
    assert_eq!(client.recv().await, None);
}

#[tokio::test]
async fn test_crlf_line_endings_are_accepted() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let reply = client
        .request("Add Lecture; CS101; Monday; 09:00; 10:00; Room A\r")
        .await;
    assert_eq!(reply, "Lecture added successfully.");
    assert_eq!(client.display_schedule().await, vec![CS101_LINE]);
}
