//! Handler for short URL redirects.

use axum::{
    Extension,
    extract::{Path, State},
    response::Redirect,
};

use crate::domain::access_event::AccessEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientKey;

/// Redirects a short identifier to its original URL.
///
/// # Endpoint
///
/// `GET /{identifier}`
///
/// The access event is pushed onto a bounded queue for the analytics worker
/// and never blocks the redirect; when the queue is full the event is
/// dropped. Responds with 307 so clients re-issue the method against the
/// target, 404 when the identifier has no live mapping.
pub async fn redirect_handler(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
    Extension(ClientKey(client_key)): Extension<ClientKey>,
) -> Result<Redirect, AppError> {
    let original_url = state.shortener.resolve(&identifier).await?;

    tracing::debug!(%identifier, %original_url, "redirecting");

    let event = AccessEvent::new(identifier, client_key);
    if state.access_tx.try_send(event).is_err() {
        tracing::debug!("access queue full or closed; dropping analytics event");
    }

    Ok(Redirect::temporary(&original_url))
}
