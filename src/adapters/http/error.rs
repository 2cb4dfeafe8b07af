//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::{DomainError, ErrorCode};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
        }
    }
}

/// Renders a domain error with the status its category maps to.
///
/// Internal failure detail never leaves the process: 500-class errors
/// all carry the same generic body.
pub fn error_response(error: &DomainError) -> Response {
    let status = match error.code() {
        ErrorCode::Unauthorized => StatusCode::FORBIDDEN,
        ErrorCode::ValidationFailed | ErrorCode::InvalidFormat | ErrorCode::SlotUnavailable => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::UserNotFound | ErrorCode::CourseNotFound => StatusCode::NOT_FOUND,
        ErrorCode::SlotTaken => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::NotificationError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "An unexpected error occurred".to_string()
    } else {
        error.message().to_string()
    };

    (
        status,
        Json(ErrorResponse {
            code: error.code().to_string(),
            message,
        }),
    )
        .into_response()
}

/// Shortcut for request-level validation failures.
pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}
