//! Task Core Library
//!
//! This crate provides the domain model, error type, validation rules and the
//! repository trait for the task-list backend. The database, HTTP and server
//! crates all depend on the types defined here.
//!
//! # Architecture
//!
//! - [`models`] - Task, composite key, subtask column codec
//! - [`error`] - Error types and result handling
//! - [`repository`] - Repository trait for data persistence
//! - [`validation`] - Presence checks run before storage is touched
//!
//! # Example
//!
//! ```rust
//! use task_core::{Task, TaskValidator, join_subtasks};
//!
//! let task = Task::new("alice", "2024-01-01", vec!["buy milk".into(), "walk dog".into()]);
//!
//! TaskValidator::validate_task(&task).unwrap();
//! assert_eq!(join_subtasks(&task.subtasks), "buy milk,walk dog");
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, TaskError};
pub use models::{
    join_subtasks, split_subtasks, Task, TaskKey, TaskKeyParams, SUBTASK_DELIMITER,
};
pub use repository::TaskRepository;
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_crate_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(CRATE_NAME, "task-core");
    }

    #[test]
    fn test_re_exports() {
        let task = Task::new("alice", "2024-01-01", vec![]);
        assert_eq!(task.key(), TaskKey::new("alice", "2024-01-01"));

        let error = TaskError::missing_key();
        assert!(error.is_validation());
    }
}
