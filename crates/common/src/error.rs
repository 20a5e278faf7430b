use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
///
/// Upstream fetch and verification failures never reach this type; they are
/// degraded to empty or unverified results inside the source clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Run failed: {0}")]
    RunFailed(String),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::RunFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "run_failed", "message": msg }),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "not_found" })),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failed_is_service_unavailable() {
        let response = AppError::RunFailed("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
