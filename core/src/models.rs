use serde::{Deserialize, Deserializer, Serialize};

/// Character that separates subtasks inside the persisted `task` column
pub const SUBTASK_DELIMITER: char = ',';

/// Core task representation for the task-list backend.
///
/// A task is a named, dated to-do entry carrying an ordered list of subtask
/// labels. It is transient: it only exists for the duration of a request and
/// is flattened into a `(name, date, task)` row when persisted.
///
/// On the wire the subtask list is called `tasks`, matching the browser
/// client:
///
/// ```rust
/// use task_core::models::Task;
///
/// let task: Task = serde_json::from_str(
///     r#"{"name":"alice","date":"2024-01-01","tasks":["buy milk","walk dog"]}"#,
/// ).unwrap();
///
/// assert_eq!(task.name, "alice");
/// assert_eq!(task.subtasks, vec!["buy milk", "walk dog"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Owner of the list; half of the composite key
    pub name: String,
    /// Date-formatted string; the other half of the composite key
    pub date: String,
    /// Ordered subtask labels, possibly empty
    #[serde(rename = "tasks", default, deserialize_with = "null_as_empty")]
    pub subtasks: Vec<String>,
}

/// `"tasks": null` decodes like an absent field
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Create a new task
    pub fn new(name: impl Into<String>, date: impl Into<String>, subtasks: Vec<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            subtasks,
        }
    }

    /// The `(name, date)` pair identifying this task's rows
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.name.clone(), self.date.clone())
    }

    /// Subtasks flattened into the persisted column representation
    pub fn joined_subtasks(&self) -> String {
        join_subtasks(&self.subtasks)
    }
}

/// Composite lookup key used by fetch, update and delete.
///
/// The key is not unique in storage; any number of rows may share it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub name: String,
    pub date: String,
}

impl TaskKey {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
        }
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.date)
    }
}

/// Query parameters carrying a composite key.
///
/// Both fields are optional so that a request missing one of them can be
/// answered with a validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskKeyParams {
    pub name: Option<String>,
    pub date: Option<String>,
}

/// Join subtasks into the single delimited string stored in the `task` column
pub fn join_subtasks(subtasks: &[String]) -> String {
    subtasks.join(&SUBTASK_DELIMITER.to_string())
}

/// Split a stored `task` column back into subtasks.
///
/// An empty column decodes to no subtasks, so a task stored with an empty
/// list reads back as an empty list.
pub fn split_subtasks(column: &str) -> Vec<String> {
    if column.is_empty() {
        return Vec::new();
    }
    column
        .split(SUBTASK_DELIMITER)
        .map(str::to_string)
        .collect()
}
