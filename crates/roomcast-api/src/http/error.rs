//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use roomcast_types::error::RoomError;

/// Application-level error that maps to HTTP responses.
///
/// Room conditions are recoverable and user-facing; store failures abort
/// the single request that hit them and never take the process down.
#[derive(Debug)]
pub enum AppError {
    /// Room-related errors.
    Room(RoomError),
    /// Validation error.
    Validation(String),
}

impl From<RoomError> for AppError {
    fn from(e: RoomError) -> Self {
        AppError::Room(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Room(RoomError::NotFound(room_id)) => (
                StatusCode::NOT_FOUND,
                "ROOM_NOT_FOUND",
                format!("Room '{room_id}' not found"),
            ),
            AppError::Room(RoomError::AlreadyExists(room_id)) => (
                StatusCode::CONFLICT,
                "ROOM_EXISTS",
                format!("Room '{room_id}' already exists"),
            ),
            AppError::Room(RoomError::Store(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
