//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// Validation and conflict failures surface as 400 with an `{error}` body;
/// missing identity is 401; unknown records are 404; everything else is an
/// internal fault.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request carries no valid authenticated identity
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
