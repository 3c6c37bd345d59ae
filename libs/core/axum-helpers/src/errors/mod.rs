pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: Integer error code for logging/monitoring (e.g., 1008)
/// - `error`: Stable machine-readable kind (e.g., "CONFLICT")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "Already registered for this event"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The target resource has no remaining capacity
    #[error("Capacity Exceeded: {0}")]
    CapacityExceeded(String),

    /// The backing store failed; details are logged, not returned
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Status, error code and client-facing message for this error
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                (e.status(), ErrorCode::JsonExtraction, e.body_text())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Conflict, msg.clone()),
            AppError::CapacityExceeded(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::CapacityExceeded,
                msg.clone(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                ErrorCode::DatabaseError.default_message().to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// Helper function to create error responses.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_keeps_message_and_kind() {
        let response = AppError::Conflict("Already registered for this event".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_of(response).await;
        assert_eq!(body.error, "CONFLICT");
        assert_eq!(body.code, 1008);
        assert_eq!(body.message, "Already registered for this event");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_capacity_exceeded_is_bad_request() {
        let response = AppError::CapacityExceeded("Event is full".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.error, "CAPACITY_EXCEEDED");
        assert_eq!(body.message, "Event is full");
    }

    #[tokio::test]
    async fn test_database_error_hides_internal_details() {
        let response =
            AppError::Database("server selection timeout: 10.0.0.5:27017".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "DATABASE_ERROR");
        assert!(!body.message.contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(
            StatusCode::NOT_FOUND,
            "Event not found".to_string(),
            ErrorCode::NotFound,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "NOT_FOUND");
    }
}
