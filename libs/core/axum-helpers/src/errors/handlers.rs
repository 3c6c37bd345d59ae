use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    let code = ErrorCode::RouteNotFound;
    let body = Json(ErrorResponse::new(code, code.default_message()));

    (StatusCode::NOT_FOUND, body).into_response()
}
