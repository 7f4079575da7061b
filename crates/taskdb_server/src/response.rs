//! Response envelope shared by every route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// The `{message, data}` body every route returns.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Human-readable outcome.
    pub message: String,
    /// Payload, or `null`.
    pub data: Value,
}

/// A successful response: status code plus envelope.
///
/// `204 No Content` responses carry no body.
#[derive(Debug)]
pub struct ApiSuccess {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body.
    pub envelope: Envelope,
}

impl ApiSuccess {
    /// A `200 OK` response.
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope {
                message: message.into(),
                data,
            },
        }
    }

    /// A `201 Created` response.
    pub fn created(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            envelope: Envelope {
                message: message.into(),
                data,
            },
        }
    }

    /// A bodyless `204 No Content` response.
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            envelope: Envelope {
                message: "Deleted".into(),
                data: Value::Null,
            },
        }
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NO_CONTENT {
            self.status.into_response()
        } else {
            (self.status, Json(self.envelope)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shape() {
        let success = ApiSuccess::ok("OK", json!({"n": 1}));
        let body = serde_json::to_value(&success.envelope).unwrap();
        assert_eq!(body["message"], "OK");
        assert_eq!(body["data"]["n"], 1);
    }

    #[test]
    fn no_content_has_no_body() {
        let response = ApiSuccess::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
