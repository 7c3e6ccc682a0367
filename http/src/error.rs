//! Error handling for the HTTP layer
//!
//! Maps task errors to status codes and plain-text response bodies.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use task_core::TaskError;
use thiserror::Error;

/// Errors an endpoint can answer with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Unavailable(String),

    /// Extractor rejection that keeps its own status, e.g. 413 for oversized bodies
    #[error("{1}")]
    Rejected(StatusCode, String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Rejected(status, _) => *status,
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(msg) => ApiError::BadRequest(msg),
            TaskError::MethodNotAllowed(_) => ApiError::MethodNotAllowed,
            TaskError::Storage(msg) => ApiError::Internal(msg),
            other @ TaskError::Configuration(_) => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
