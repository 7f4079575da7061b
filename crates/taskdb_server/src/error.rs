//! HTTP error mapping.

use crate::response::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use taskdb_core::EngineError;
use tracing::error;

/// An error response: status code plus the standard envelope with
/// `data: null`.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Message surfaced to the caller.
    pub message: String,
}

impl ApiError {
    /// A `400 Bad Request`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A `404 Not Found`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// A `500 Internal Server Error` with a generic message.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Server error".into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(rule) => Self::bad_request(format!("Validation error: {rule}")),
            EngineError::NotFound { kind, .. } => Self::not_found(format!("{kind} not found")),
            EngineError::Store(store) => {
                error!(error = %store, "store call failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            message: self.message,
            data: Value::Null,
        };
        (self.status, Json(body)).into_response()
    }
}
