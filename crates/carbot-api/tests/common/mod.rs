//! Shared test helpers for web view integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use carbot_prompts::PromptStore;
use carbot_test_support::{FirstPick, FixedClock, InMemoryPromptRepository};
use http_body_util::BodyExt;
use tower::ServiceExt;

use carbot_api::routes;
use carbot_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> FixedClock {
    FixedClock(chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap())
}

/// Build the full app router over an in-memory repository, with the same
/// route structure as `main.rs`.
pub fn build_test_app(repository: Arc<InMemoryPromptRepository>) -> Router {
    let store = Arc::new(PromptStore::new(
        repository,
        Arc::new(fixed_clock()),
        Arc::new(Mutex::new(FirstPick)),
    ));
    let app_state = AppState::new(store);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::home::router())
        .merge(routes::prompts::router())
        .with_state(app_state)
}

/// Send a GET request and return the JSON response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response body as text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}
