//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The caller's identity no longer resolves to a user
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// No session with that id owned by the caller
    #[error("Session not found")]
    NotFound,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Session not found".to_string()),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(err) => match err {
                DatabaseError::CheckViolation { .. } => {
                    (StatusCode::BAD_REQUEST, "Invalid session data".to_string())
                }
                DatabaseError::ForeignKeyViolation { .. } => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                other => {
                    error!("Database error: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_map_to_client_codes() {
        let cases = [
            (
                ApiError::from(DatabaseError::CheckViolation { constraint: None }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(DatabaseError::ForeignKeyViolation { constraint: None }),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::from(DatabaseError::UniqueViolation { constraint: None }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(DatabaseError::Migration("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
