use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error types for the task-list backend.
///
/// Every failure a request can hit falls into one of these kinds, and each
/// kind maps to exactly one HTTP status code. Storage messages are carried
/// through unchanged so clients see what the database driver reported.
///
/// # Examples
///
/// ```rust
/// use task_core::error::TaskError;
///
/// let missing = TaskError::missing_key();
/// assert!(missing.is_validation());
/// assert_eq!(missing.status_code(), 400);
///
/// let storage = TaskError::Storage("connection refused".to_string());
/// assert_eq!(storage.status_code(), 500);
/// assert_eq!(storage.to_string(), "connection refused");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Missing or invalid settings, or an unreachable database at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed body or missing required field
    #[error("{0}")]
    Validation(String),

    /// HTTP verb not accepted by the endpoint
    #[error("Invalid request method")]
    MethodNotAllowed(String),

    /// Any failure reported by the persistence layer
    #[error("{0}")]
    Storage(String),
}

impl TaskError {
    /// Create a validation error for a missing `name` or `date` query parameter
    pub fn missing_key() -> Self {
        Self::Validation("Missing name or date".to_string())
    }

    /// Create a validation error for an undecodable request body
    pub fn invalid_body(detail: impl std::fmt::Display) -> Self {
        Self::Validation(format!("Invalid request body: {detail}"))
    }

    /// Create a validation error for empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    /// Create a method-not-allowed error for the given verb
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::MethodNotAllowed(method.into())
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    /// Check if this error came from the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, TaskError::Storage(_))
    }

    /// Check if this error is a startup configuration failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, TaskError::Configuration(_))
    }

    /// Convert to appropriate HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::Validation(_) => 400,
            TaskError::MethodNotAllowed(_) => 405,
            TaskError::Storage(_) => 500,
            TaskError::Configuration(_) => 500,
        }
    }
}
