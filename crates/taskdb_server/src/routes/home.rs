//! Health route and fallback.

use crate::error::ApiError;
use crate::response::ApiSuccess;
use crate::AppState;
use axum::extract::State;
use serde_json::json;

/// `GET /api/` — liveness check with process uptime.
pub async fn health(State(state): State<AppState>) -> ApiSuccess {
    ApiSuccess::ok(
        "OK",
        json!({ "uptime": state.started.elapsed().as_secs_f64() }),
    )
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use taskdb_store::Store;

    #[tokio::test]
    async fn health_reports_uptime() {
        let state = AppState::new(&Store::in_memory());
        let response = health(State(state)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.envelope.data["uptime"].is_number());
    }

    #[tokio::test]
    async fn fallback_is_404() {
        let response = not_found().await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.message, "Not Found");
    }
}
