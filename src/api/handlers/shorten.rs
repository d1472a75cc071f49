//! Handler for the URL shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /shorten` with body `{"original": "...", "ttl": 3600}` (TTL in
/// seconds, optional). Responds with `{"original": ..., "shortened": ...}`.
///
/// # Errors
///
/// Returns 400 for an invalid URL, 500 when identifier generation exhausts
/// its retry budget or the store is unreachable.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let shortened = state.shortener.shorten(&payload.original, payload.ttl).await?;

    tracing::info!(
        original = %payload.original,
        shortened = %shortened.short_url,
        "URL shortened"
    );

    Ok(Json(ShortenResponse {
        original: payload.original,
        shortened: shortened.short_url,
    }))
}
