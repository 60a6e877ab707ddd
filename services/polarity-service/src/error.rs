//! Error types for polarity-service.
//!
//! Every handler failure renders as `{"error": "<message>"}` with 400 (or 413)
//! for caller mistakes and 500 for scorer/store failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::scorer::ScorerError;
use crate::store::StoreError;

/// Request validation failure. Messages are part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Request must be JSON")]
    NotJson,

    #[error("Text field is required")]
    TextRequired,

    #[error("Request body too large")]
    BodyTooLarge,
}

impl RequestError {
    /// HTTP status for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotJson | Self::TextRequired => StatusCode::BAD_REQUEST,
        }
    }
}

/// Service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] RequestError),

    #[error(transparent)]
    Scorer(#[from] ScorerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(e) => e.status_code(),
            Self::Scorer(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            tracing::debug!(error = %self, "Rejected request");
        } else {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
