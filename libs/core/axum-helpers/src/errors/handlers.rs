use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        ErrorResponse::from_code(ErrorCode::NotFound, "The requested resource was not found"),
    )
        .into_response()
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorResponse::from_code(
            ErrorCode::MethodNotAllowed,
            ErrorCode::MethodNotAllowed.default_message(),
        ),
    )
        .into_response()
}
