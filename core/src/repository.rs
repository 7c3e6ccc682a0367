use async_trait::async_trait;
use crate::{
    error::Result,
    models::{Task, TaskKey},
};

/// Repository trait for task persistence and retrieval operations
///
/// Each operation maps to exactly one parameterized statement against the
/// `tasks(name, date, task)` table. Nothing is wrapped in a transaction.
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Append one row for the task, subtasks joined with the delimiter
    ///
    /// # Arguments
    /// * `task` - The task to persist
    ///
    /// # Returns
    /// * `Ok(())` - The row was inserted
    /// * `Err(TaskError::Storage)` - If the statement fails
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Collect the subtasks of every row matching the key
    ///
    /// # Arguments
    /// * `key` - The `(name, date)` pair to look up
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Subtasks of all matching rows, in row order (may be empty)
    /// * `Err(TaskError::Storage)` - If the query fails
    async fn fetch_by_key(&self, key: &TaskKey) -> Result<Vec<String>>;

    /// Replace the subtask column of every row matching the key
    ///
    /// # Arguments
    /// * `key` - The `(name, date)` pair to update
    /// * `subtasks` - The new subtask list
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows rewritten; zero is not an error
    /// * `Err(TaskError::Storage)` - If the statement fails
    async fn update(&self, key: &TaskKey, subtasks: &[String]) -> Result<u64>;

    /// Remove every row matching the key
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed; zero is not an error
    /// * `Err(TaskError::Storage)` - If the statement fails
    async fn delete(&self, key: &TaskKey) -> Result<u64>;

    /// Verify the backing store answers a trivial query
    ///
    /// # Returns
    /// * `Ok(())` - Repository is healthy and connected
    /// * `Err(TaskError::Storage)` - Repository is unreachable
    async fn health_check(&self) -> Result<()>;
}
