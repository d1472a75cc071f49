//! Per-client rate limiting middleware.

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::error::ErrorBody;
use crate::state::AppState;
use crate::utils::client_ip::{ClientKey, client_key};

/// Admission check against the token-bucket table.
///
/// Derives the client key once, stores it as a request extension for
/// downstream handlers (the redirect handler reuses it for unique-visitor
/// tracking), and answers 429 when the client's bucket is empty. The
/// decision is a hard deny; there is no queueing or retry here.
pub async fn layer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    let key = client_key(request.headers(), peer, state.behind_proxy);

    if !state.limiter.allow(&key) {
        tracing::debug!(client = %key, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody::new(429, "Rate limit exceeded", None)),
        )
            .into_response();
    }

    request.extensions_mut().insert(ClientKey(key));
    next.run(request).await
}
