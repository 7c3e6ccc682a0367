//! Test data builders for fluent task construction

use task_core::{Task, TaskKey, TaskKeyParams};

/// Builder for creating test tasks with a fluent API
///
/// # Example
/// ```rust
/// use mocks::TaskBuilder;
///
/// let task = TaskBuilder::new()
///     .with_name("alice")
///     .with_date("2024-01-01")
///     .with_subtask("buy milk")
///     .build();
/// assert_eq!(task.subtasks, vec!["buy milk"]);
/// ```
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    name: String,
    date: String,
    subtasks: Vec<String>,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create a new task builder with default values
    pub fn new() -> Self {
        Self {
            name: "test-user".to_string(),
            date: "2024-01-01".to_string(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Append one subtask
    pub fn with_subtask(mut self, subtask: &str) -> Self {
        self.subtasks.push(subtask.to_string());
        self
    }

    /// Replace the subtask list
    pub fn with_subtasks(mut self, subtasks: &[&str]) -> Self {
        self.subtasks = subtasks.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Task {
        Task::new(self.name, self.date, self.subtasks)
    }

    /// Build only the key
    pub fn build_key(&self) -> TaskKey {
        TaskKey::new(self.name.clone(), self.date.clone())
    }

    /// Build query parameters carrying the key
    pub fn build_params(&self) -> TaskKeyParams {
        TaskKeyParams {
            name: Some(self.name.clone()),
            date: Some(self.date.clone()),
        }
    }
}
