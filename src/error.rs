//! Error types for the data service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fetch::FetchError;

// == Error Enum ==
/// Unified error type for the data service and its HTTP surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream request failed after all retries
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Upstream payload is missing the shape required for its type
    #[error("Invalid payload: {0}")]
    Validation(String),

    /// Requested resource is unknown
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied bad input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable store failure that could not be absorbed
    #[error("Storage error: {0}")]
    Storage(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Validation(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data service.
pub type Result<T> = std::result::Result<T, Error>;
