#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Router, middleware};
use axum_test::TestServer;
use tokio::sync::mpsc;
use urlshort::api::handlers::{
    analytics_handler, health_handler, redirect_handler, shorten_handler,
};
use urlshort::api::middleware::rate_limit;
use urlshort::application::services::{AnalyticsService, ShortenService};
use urlshort::domain::access_worker::run_access_worker;
use urlshort::domain::generator::IdGenerator;
use urlshort::domain::rate_limiter::RateLimiter;
use urlshort::infrastructure::store::{KeyValueStore, MemoryStore};
use urlshort::state::AppState;
use urlshort::utils::url_validator::UrlValidator;

pub const BASE_URL: &str = "http://sho.rt";

/// Builds an [`AppState`] over an in-memory store with the access worker
/// running, so redirects feed analytics exactly as in production.
///
/// `behind_proxy` is enabled so tests can impersonate distinct clients
/// through the `X-Forwarded-For` header.
pub fn create_test_state(rate: f64, burst: u32, default_ttl: Option<Duration>) -> AppState {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let analytics = Arc::new(AnalyticsService::new(Arc::clone(&store)));

    let (access_tx, access_rx) = mpsc::channel(100);
    tokio::spawn(run_access_worker(access_rx, Arc::clone(&analytics)));

    let shortener = Arc::new(ShortenService::new(
        Arc::clone(&store),
        IdGenerator::new(),
        UrlValidator::new(),
        BASE_URL.to_string(),
        default_ttl,
    ));

    let limiter = Arc::new(RateLimiter::new(rate, burst));

    AppState::new(shortener, analytics, limiter, store, access_tx, true)
}

/// Production route table with the rate-limit middleware attached.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{identifier}", get(redirect_handler))
        .route("/{identifier}/analytics", get(analytics_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .with_state(state)
}

/// Server with a limiter generous enough to never interfere.
pub fn spawn_server() -> TestServer {
    let state = create_test_state(1000.0, 1000, None);
    TestServer::new(test_router(state)).unwrap()
}

/// Shortens `url` and returns the generated identifier.
pub async fn shorten(server: &TestServer, url: &str) -> String {
    let response = server
        .post("/shorten")
        .json(&serde_json::json!({ "original": url }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    let shortened = body["shortened"].as_str().unwrap();
    shortened.rsplit('/').next().unwrap().to_string()
}
