//! Common test utilities for Deckwise integration tests
//!
//! Builds the real router over a fresh SQLite database and wraps the request
//! plumbing shared by the test files.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use deckwise::{
    create_app,
    db::init_database,
    progress::ProgressTracker,
    store::SqliteProgressStore,
    FingerprintScope,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Creates a test application backed by a private in-memory SQLite database
///
/// A unique shared-cache URI keeps every pooled connection on the same
/// database while isolating tests from each other.
pub fn create_test_app() -> Router {
    create_test_app_with_scope(FingerprintScope::Strict)
}

pub fn create_test_app_with_scope(scope: FingerprintScope) -> Router {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_database(&database_url).unwrap();
    let store = SqliteProgressStore::new(Arc::new(pool));
    create_app(Arc::new(ProgressTracker::new(store).with_scope(scope)))
}

/// Sends a request and returns the status with the parsed JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (parts.status, json)
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Fingerprints `cards` through the API, asserting success
pub async fn fingerprint(app: &Router, cards: Value) -> Value {
    let (status, body) = send_json(app, "POST", "/decks/fingerprint", serde_json::json!({ "cards": cards })).await;
    assert_eq!(status, StatusCode::OK, "fingerprint failed: {}", body);
    body
}

/// Records a review through the API, asserting success
pub async fn review(app: &Router, user_id: &str, card_identity: &Value, content_hash: &Value, quality: i32) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        &format!("/users/{}/reviews", user_id),
        serde_json::json!({
            "card_identity": card_identity,
            "content_hash": content_hash,
            "quality": quality
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "review failed: {}", body);
    body
}
