// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{TimeZone, Utc};
use na_sporte::config::Config;
use na_sporte::routes::create_router;
use na_sporte::time_utils::ManualClock;
use na_sporte::AppState;
use std::sync::Arc;

/// Upper bound for response bodies read in tests.
#[allow(dead_code)]
pub const MAX_BODY: usize = 1024 * 1024;

/// Fixed starting instant for the test clock.
#[allow(dead_code)]
pub fn test_start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap()
}

/// Create a test app backed by in-memory stores and a manual clock.
/// Returns the router, the shared state and the clock.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<ManualClock>) {
    create_test_app_with(Config::test_default()).await
}

/// Same as [`create_test_app`] with a custom config.
#[allow(dead_code)]
pub async fn create_test_app_with(
    config: Config,
) -> (axum::Router, Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_start()));
    let state = Arc::new(AppState::build(config, clock.clone()).await);
    (create_router(state.clone()), state, clock)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), MAX_BODY)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
