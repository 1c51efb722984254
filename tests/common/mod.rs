//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because each
//! integration test file is compiled as a separate crate, and not every file
//! uses every helper.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use task_manager::api::{AppState, build_router};
use task_manager::client::{ClientConfig, HttpTaskGateway};

// =============================================================================
// Application Helpers
// =============================================================================

/// Builds the full application over an empty in-memory store.
pub fn create_test_app() -> Router {
    build_router(AppState::in_memory()).unwrap()
}

/// Sends one request through `app` and returns the status and JSON body.
///
/// The body is `Value::Null` when the response has no content.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

/// Sends a raw JSON text body, for malformed-input cases.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Creates a task through the API and returns its id.
pub async fn create_task(app: &Router, title: &str) -> u64 {
    let (status, body) = send(app, "POST", "/tasks", Some(serde_json::json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

// =============================================================================
// Live Server Helpers
// =============================================================================

/// Serves a fresh application on an ephemeral local port.
pub async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = create_test_app();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}

/// Gateway pointed at a spawned server.
pub fn gateway_for(address: SocketAddr) -> HttpTaskGateway {
    HttpTaskGateway::new(ClientConfig::new(format!("http://{address}")))
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    address
}
