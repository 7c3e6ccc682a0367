//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Fetched subtask lists with clear error messages
//! - Error kinds and the status code they map to

use task_core::{Task, TaskError};

/// Assert a fetch returned exactly these subtasks, in order
pub fn assert_subtasks(actual: &[String], expected: &[&str]) {
    let actual: Vec<&str> = actual.iter().map(String::as_str).collect();
    assert_eq!(actual, expected, "Fetched subtasks don't match");
}

/// Assert a fetch returned a task's subtasks
pub fn assert_fetched_task(actual: &[String], expected: &Task) {
    assert_eq!(
        actual,
        expected.subtasks.as_slice(),
        "Fetched subtasks don't match task {}",
        expected.key()
    );
}

/// Assert tasks are equal field by field
pub fn assert_task_equals(actual: &Task, expected: &Task) {
    assert_eq!(actual.name, expected.name, "Task names don't match");
    assert_eq!(actual.date, expected.date, "Task dates don't match");
    assert_eq!(actual.subtasks, expected.subtasks, "Task subtasks don't match");
}

/// Assert an operation failed with a validation error
pub fn assert_validation_error<T: std::fmt::Debug>(result: &Result<T, TaskError>) {
    match result {
        Err(err) if err.is_validation() => {}
        other => panic!("Expected validation error, got: {other:?}"),
    }
}

/// Assert an operation failed with a storage error carrying `fragment`
pub fn assert_storage_error<T: std::fmt::Debug>(result: &Result<T, TaskError>, fragment: &str) {
    match result {
        Err(TaskError::Storage(message)) => assert!(
            message.contains(fragment),
            "Storage error '{message}' does not mention '{fragment}'"
        ),
        other => panic!("Expected storage error, got: {other:?}"),
    }
}
