//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache, the page tracker and the HTTP layer.
///
/// Lookups on unknown keys are not errors in the library API; they return
/// `None`. `NotFound` only exists so the HTTP layer can report them.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store unreachable or connection lost
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored bytes cannot be converted to the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backing store rejected a command (wrong type, bad argument)
    #[error("Backend error: {0}")]
    Backend(String),

    /// The page fetcher failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Key not found (HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Conversions ==
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        use redis::ErrorKind;

        match err.kind() {
            ErrorKind::ResponseError | ErrorKind::TypeError | ErrorKind::ExtensionError => {
                CacheError::Backend(err.to_string())
            }
            _ => CacheError::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
