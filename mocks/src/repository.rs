//! Mock implementation of TaskRepository trait
//!
//! Provides a thread-safe mock repository with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - Table-like behavior (non-unique keys, delimited subtask column)

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use task_core::{join_subtasks, split_subtasks, Result, Task, TaskError, TaskKey, TaskRepository};

/// One stored row, shaped like `tasks(name, date, task)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub name: String,
    pub date: String,
    pub task: String,
}

impl StoredRow {
    fn matches(&self, key: &TaskKey) -> bool {
        self.name == key.name && self.date == key.date
    }
}

impl From<&Task> for StoredRow {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            date: task.date.clone(),
            task: task.joined_subtasks(),
        }
    }
}

/// Mock implementation of TaskRepository for testing
///
/// Rows are kept in insertion order and keys are not unique, so fetch,
/// update and delete behave like the SQL statements they stand in for.
#[derive(Clone)]
pub struct MockTaskRepository {
    rows: Arc<Mutex<Vec<StoredRow>>>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock repository with one pre-populated row per task
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::new();
        repo.rows.lock().extend(tasks.iter().map(StoredRow::from));
        repo
    }

    /// Snapshot of the stored rows
    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows.lock().clone()
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Assert the repository was never touched
    pub fn assert_untouched(&self) {
        let history = self.call_history.lock();
        assert!(
            history.is_empty(),
            "Expected no repository calls, got: {:?}",
            *history
        );
    }

    /// Check if an error should be injected, consuming it if so
    fn check_error_injection(&self) -> Result<()> {
        let mut error_opt = self.error_injection.lock();
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }

    /// Record method call in history
    fn record_call(&self, method: &str) {
        self.call_history.lock().push(format!("{method}()"));
    }

    /// Record method call with parameters in history
    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn insert(&self, task: &Task) -> Result<()> {
        self.record_call_with_params("insert", &format!("key={}", task.key()));
        self.check_error_injection()?;

        self.rows.lock().push(StoredRow::from(task));
        Ok(())
    }

    async fn fetch_by_key(&self, key: &TaskKey) -> Result<Vec<String>> {
        self.record_call_with_params("fetch_by_key", &format!("key={key}"));
        self.check_error_injection()?;

        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .filter(|row| row.matches(key))
            .flat_map(|row| split_subtasks(&row.task))
            .collect())
    }

    async fn update(&self, key: &TaskKey, subtasks: &[String]) -> Result<u64> {
        self.record_call_with_params("update", &format!("key={key}"));
        self.check_error_injection()?;

        let joined = join_subtasks(subtasks);
        let mut affected = 0;
        for row in self.rows.lock().iter_mut().filter(|row| row.matches(key)) {
            row.task = joined.clone();
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, key: &TaskKey) -> Result<u64> {
        self.record_call_with_params("delete", &format!("key={key}"));
        self.check_error_injection()?;

        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|row| !row.matches(key));
        Ok((before - rows.len()) as u64)
    }

    async fn health_check(&self) -> Result<()> {
        self.record_call("health_check");
        self.check_error_injection()
    }
}
