use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;

use super::common::fake_portal::{closed_port_url, FakePortal};
use crate::client::PortalClient;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::models::slot::{BookingRequest, SlotCreationRequest};

fn slot_request() -> SlotCreationRequest {
    SlotCreationRequest {
        start_time: "2025-04-01T09:00".to_string(),
        end_time: "2025-04-01T09:30".to_string(),
        location: "Room 4".to_string(),
        notes: "Follow-up visits only".to_string(),
    }
}

#[tokio::test]
async fn test_add_slot_posts_json_body() {
    let portal = FakePortal::replying(r#"{"status":"success","message":"Slot added"}"#).await;
    let client = PortalClient::with_base_url(&portal.base_url).unwrap();

    let response = client.add_slot(&slot_request()).await.unwrap();
    assert!(response.is_success());
    assert_eq!(response.message(), "Slot added");

    let requests = portal.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/add_slot");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));

    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["start_time"], "2025-04-01T09:00");
    assert_eq!(body["end_time"], "2025-04-01T09:30");
    assert_eq!(body["location"], "Room 4");
    assert_eq!(body["notes"], "Follow-up visits only");
}

#[tokio::test]
async fn test_book_slot_posts_empty_body() {
    let portal = FakePortal::replying(r#"{"status":"success","message":"Booked"}"#).await;
    let client = PortalClient::with_base_url(&portal.base_url).unwrap();

    let response = client.book_slot(&BookingRequest::new("42")).await.unwrap();
    assert!(response.is_success());

    let requests = portal.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/book_slot/42");
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_http_error_status_with_json_body_is_decoded() {
    let portal = FakePortal::start(
        StatusCode::CONFLICT,
        r#"{"status":"error","message":"Time conflict"}"#,
        None,
    )
    .await;
    let client = PortalClient::with_base_url(&portal.base_url).unwrap();

    let response = client.add_slot(&slot_request()).await.unwrap();
    assert!(!response.is_success());
    assert_eq!(response.message(), "Time conflict");
}

#[tokio::test]
async fn test_non_json_reply_is_malformed() {
    let portal = FakePortal::replying("Invalid credentials. Please try again.").await;
    let client = PortalClient::with_base_url(&portal.base_url).unwrap();

    let result = client.book_slot(&BookingRequest::new("3")).await;
    assert!(matches!(result, Err(BridgeError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = PortalClient::with_base_url(&closed_port_url().await).unwrap();

    let result = client.add_slot(&slot_request()).await;
    assert!(matches!(result, Err(BridgeError::Transport(_))));
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let portal = FakePortal::replying(r#"{"status":"success","message":"Booked"}"#).await;
    let config = BridgeConfig {
        base_url: portal.base_url.clone(),
        session_cookie: Some("session=eyJyb2xlIjoicGF0aWVudCJ9".to_string()),
        ..BridgeConfig::default()
    };
    let client = PortalClient::new(&config).unwrap();

    client.book_slot(&BookingRequest::new("8")).await.unwrap();

    let requests = portal.requests();
    assert_eq!(
        requests[0].cookie.as_deref(),
        Some("session=eyJyb2xlIjoicGF0aWVudCJ9")
    );
}

#[tokio::test]
async fn test_request_timeout() {
    let portal = FakePortal::start(
        StatusCode::OK,
        r#"{"status":"success","message":"late"}"#,
        Some(Duration::from_secs(2)),
    )
    .await;
    let config = BridgeConfig {
        base_url: portal.base_url.clone(),
        request_timeout: Some(Duration::from_millis(100)),
        ..BridgeConfig::default()
    };
    let client = PortalClient::new(&config).unwrap();

    match client.book_slot(&BookingRequest::new("1")).await {
        Err(BridgeError::Transport(err)) => assert!(err.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}
