//! Application error types and their HTTP response mapping.
//!
//! Expected failures (validation, unknown identifier) carry a user-facing
//! message. Backend failures (store transport, generation exhaustion) are
//! logged with context and collapsed to a generic body so raw backend error
//! text never reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infrastructure::store::StoreError;

/// Wire format for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(code: u16, message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        detail: Option<String>,
    },

    #[error("{message}")]
    NotFound { message: String },

    /// The identifier retry budget was exhausted. Indicates keyspace pressure,
    /// surfaced to callers as a server error.
    #[error("unique identifier generation failed after multiple attempts")]
    GenerationExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: "Invalid input".to_string(),
            detail: Some(errors.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message, detail } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(400, message, detail),
            ),
            AppError::NotFound { message } => {
                (StatusCode::NOT_FOUND, ErrorBody::new(404, message, None))
            }
            AppError::GenerationExhausted => {
                tracing::error!("identifier generation exhausted its retry budget");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(500, "Server error", None),
                )
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(500, "Server error", None),
                )
            }
            AppError::Internal(message) => {
                tracing::error!(error = %message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(500, "Server error", None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_detail() {
        let err = AppError::bad_request("URL cannot be empty", Some("provide a URL".into()));
        assert_eq!(err.to_string(), "URL cannot be empty");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_error_collapses_to_generic_server_error() {
        let err = AppError::from(StoreError::Operation("ECONNRESET from 10.0.0.5".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::not_found("Short URL not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
