//! Standard test fixtures for consistent testing

use crate::TaskBuilder;
use task_core::{Task, TaskKey};

pub const ALICE: &str = "alice";
pub const NEW_YEAR: &str = "2024-01-01";

/// Key shared by the `alice` fixtures
pub fn alice_key() -> TaskKey {
    TaskKey::new(ALICE, NEW_YEAR)
}

/// Alice's list with two subtasks
pub fn alice_task() -> Task {
    TaskBuilder::new()
        .with_name(ALICE)
        .with_date(NEW_YEAR)
        .with_subtasks(&["buy milk", "call bob"])
        .build()
}

/// Alice's list after a single-item update
pub fn alice_updated_task() -> Task {
    TaskBuilder::new()
        .with_name(ALICE)
        .with_date(NEW_YEAR)
        .with_subtasks(&["walk dog"])
        .build()
}

/// A task with no subtasks
pub fn create_empty_task() -> Task {
    TaskBuilder::new().with_name("empty").with_date(NEW_YEAR).build()
}

/// A task whose subtask contains the column delimiter and must be rejected
pub fn create_delimiter_task() -> Task {
    TaskBuilder::new()
        .with_name("delimited")
        .with_date(NEW_YEAR)
        .with_subtasks(&["eggs, milk"])
        .build()
}

/// Create `count` tasks with distinct keys
pub fn create_test_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            TaskBuilder::new()
                .with_name(&format!("user-{i}"))
                .with_date(&format!("2024-01-{:02}", (i % 28) + 1))
                .with_subtasks(&[&format!("item {i}a"), &format!("item {i}b")])
                .build()
        })
        .collect()
}
