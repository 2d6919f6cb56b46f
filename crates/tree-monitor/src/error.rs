//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::pipeline::IngestError;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent something unusable.
    #[error("{0}")]
    BadRequest(String),

    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a single-record lookup failure, turning absence into `NotFound(message)`.
    pub fn from_lookup(err: database::DatabaseError, message: &str) -> Self {
        match err {
            database::DatabaseError::NotFound { .. } => ApiError::NotFound(message.to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedPayload(_) => ApiError::BadRequest("Invalid payload".to_string()),
            IngestError::UnknownDevice(_) => ApiError::NotFound("Device not registered".to_string()),
            IngestError::InvalidReading(_) => {
                ApiError::BadRequest("Invalid measurement data".to_string())
            }
            IngestError::DeviceLookup(err) | IngestError::DuplicateCheck(err) => {
                ApiError::Database(err)
            }
            IngestError::Store(_) => ApiError::Internal("Failed to store measurement".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
