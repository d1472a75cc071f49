//! Router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`                  - create a short URL
//! - `GET  /{identifier}`             - redirect to the original URL
//! - `GET  /{identifier}/analytics`   - access analytics snapshot
//! - `GET  /health`                   - store and queue health
//!
//! # Middleware
//!
//! Every route passes the per-client rate limiter; the stack also carries
//! request tracing, an overall request timeout (the deadline for all
//! store-facing work in a request), and trailing-slash normalization.

use std::time::Duration;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::handlers::{
    analytics_handler, health_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;

/// Upper bound on request handling, including all store round trips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{identifier}", get(redirect_handler))
        .route("/{identifier}/analytics", get(analytics_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
