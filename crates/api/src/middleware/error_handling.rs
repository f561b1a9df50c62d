//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the rollcall
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! Store failures are logged and surfaced as opaque internal errors; their
//! detail never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use rollcall_core::errors::AttendanceError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `AttendanceError` instances and
/// implements `IntoResponse` to convert them into HTTP responses with
/// appropriate status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub AttendanceError);

/// Converts application errors to HTTP responses.
///
/// Maps each error type to the appropriate HTTP status code and formats the
/// error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Rejected(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AttendanceError::Authorization(_) => StatusCode::FORBIDDEN,
            AttendanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AttendanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal failures are logged with their cause; callers only see an
        // opaque message
        let message = match &self.0 {
            AttendanceError::Database(_) | AttendanceError::Internal(_) => {
                tracing::error!("Internal error: {}", self.0);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from AttendanceError to AppError.
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, AttendanceError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Wraps the eyre error in an AttendanceError::Database variant so that
/// repository failures propagate with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AttendanceError::Database(err))
    }
}
