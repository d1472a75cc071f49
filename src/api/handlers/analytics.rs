//! Handler for per-identifier access analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::application::services::AnalyticsSummary;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the analytics snapshot for a short identifier.
///
/// # Endpoint
///
/// `GET /{identifier}/analytics`
///
/// A never-accessed identifier yields zero clicks and null timestamps
/// rather than an error; only a store transport failure produces a 500.
pub async fn analytics_handler(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let summary = state.analytics.get_analytics(&identifier).await?;
    Ok(Json(summary))
}
