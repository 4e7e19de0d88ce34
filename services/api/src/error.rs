//! Custom error types for the API service
//!
//! Every failure in a handler or repository converges on [`ApiError`]; its
//! `IntoResponse` impl is the single place that turns errors into HTTP
//! responses. The first failure short-circuits the handler via `?`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A token was present but failed verification
    #[error("Invalid or expired token.")]
    InvalidToken,

    /// A guarded route was reached without an attached user
    #[error("You must be logged in.")]
    Unauthorized,

    /// The caller does not own the requested playlist
    #[error("You do not own this playlist.")]
    Forbidden,

    /// Entity not found
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username on registration
    #[error("{0}")]
    Conflict(String),

    /// Login failed; deliberately the same for an unknown username and a
    /// wrong password
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Database(ref e) => {
                error!("Request failed with database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(ref e) => {
                error!("Request failed with internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
