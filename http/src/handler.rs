//! Task handler
//!
//! Bridges decoded requests to the injected [`TaskRepository`]. Every
//! operation validates its input before touching storage.

use std::sync::Arc;
use task_core::{
    error::Result, Task, TaskError, TaskKeyParams, TaskRepository, TaskValidator,
};
use tracing::{debug, error, info};

/// Handler that owns a shared repository
pub struct TaskHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for TaskHandler<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ?Sized> TaskHandler<R> {
    /// Create new task handler
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a clone of the repository Arc
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }
}

/// Decode and validate a task from a raw request body.
///
/// The body is parsed as JSON whatever the request's `Content-Type` says.
pub fn decode_task(body: &[u8]) -> Result<Task> {
    let task: Task = serde_json::from_slice(body).map_err(TaskError::invalid_body)?;
    TaskValidator::validate_task(&task)?;
    Ok(task)
}

fn log_storage_failure(operation: &str, err: &TaskError) {
    if err.is_storage() {
        error!(operation, error = %err, "Storage operation failed");
    }
}

impl<R: TaskRepository + ?Sized> TaskHandler<R> {
    /// Insert a task from a request body and return it unchanged
    pub async fn add_task(&self, body: &[u8]) -> Result<Task> {
        let task = decode_task(body)?;
        info!(key = %task.key(), subtasks = ?task.subtasks, "Received task");

        self.repository
            .insert(&task)
            .await
            .inspect_err(|err| log_storage_failure("insert", err))?;
        Ok(task)
    }

    /// Fetch every subtask stored under the key in `params`
    pub async fn fetch_tasks(&self, params: TaskKeyParams) -> Result<Vec<String>> {
        debug!(name = ?params.name, date = ?params.date, "Fetching tasks");
        let key = TaskValidator::require_key(params)?;

        let subtasks = self
            .repository
            .fetch_by_key(&key)
            .await
            .inspect_err(|err| log_storage_failure("fetch", err))?;
        info!(key = %key, subtasks = ?subtasks, "Fetched tasks");
        Ok(subtasks)
    }

    /// Replace the subtasks of every row matching the body's key
    pub async fn update_task(&self, body: &[u8]) -> Result<Task> {
        let task = decode_task(body)?;

        let affected = self
            .repository
            .update(&task.key(), &task.subtasks)
            .await
            .inspect_err(|err| log_storage_failure("update", err))?;
        info!(key = %task.key(), subtasks = ?task.subtasks, rows = affected, "Updated task");
        Ok(task)
    }

    /// Delete every row matching the key in `params`
    pub async fn delete_task(&self, params: TaskKeyParams) -> Result<u64> {
        let key = TaskValidator::require_key(params)?;

        let affected = self
            .repository
            .delete(&key)
            .await
            .inspect_err(|err| log_storage_failure("delete", err))?;
        info!(key = %key, rows = affected, "Deleted task");
        Ok(affected)
    }

    /// Check the repository is reachable
    pub async fn health(&self) -> Result<()> {
        self.repository.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocks::{alice_key, alice_task, MockTaskRepository, TaskBuilder};

    fn handler() -> (TaskHandler<MockTaskRepository>, MockTaskRepository) {
        let repo = MockTaskRepository::new();
        (TaskHandler::new(Arc::new(repo.clone())), repo)
    }

    #[test]
    fn test_decode_task() {
        let task = decode_task(br#"{"name":"alice","date":"2024-01-01","tasks":["a","b"]}"#).unwrap();
        assert_eq!(task.subtasks, vec!["a", "b"]);

        let task = decode_task(br#"{"name":"alice","date":"2024-01-01","extra":1}"#).unwrap();
        assert!(task.subtasks.is_empty());

        assert!(decode_task(b"").unwrap_err().is_validation());
        assert!(decode_task(b"{not json").unwrap_err().is_validation());
        assert!(decode_task(br#"{"date":"2024-01-01"}"#).unwrap_err().is_validation());
        assert!(decode_task(br#"{"name":"","date":"2024-01-01"}"#).unwrap_err().is_validation());
        assert!(decode_task(br#"{"name":"a","date":"b","tasks":"x"}"#).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_add_then_fetch() {
        let (handler, repo) = handler();
        let body = serde_json::to_vec(&alice_task()).unwrap();

        let echoed = handler.add_task(&body).await.unwrap();
        assert_eq!(echoed, alice_task());

        let fetched = handler
            .fetch_tasks(TaskBuilder::new().with_name("alice").build_params())
            .await
            .unwrap();
        assert_eq!(fetched, alice_task().subtasks);
        repo.assert_called("insert");
        repo.assert_called("fetch_by_key");
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_storage() {
        let (handler, repo) = handler();

        assert!(handler.add_task(b"nope").await.is_err());
        assert!(handler
            .add_task(br#"{"name":"a","date":"b","tasks":["x,y"]}"#)
            .await
            .is_err());
        assert!(handler.update_task(b"[]").await.is_err());
        assert!(handler.fetch_tasks(TaskKeyParams::default()).await.is_err());
        assert!(handler
            .delete_task(TaskKeyParams {
                name: Some("alice".into()),
                date: Some(String::new()),
            })
            .await
            .is_err());

        repo.assert_untouched();
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_key_succeed() {
        let (handler, _repo) = handler();
        let body = serde_json::to_vec(&alice_task()).unwrap();

        assert_eq!(handler.update_task(&body).await.unwrap(), alice_task());
        let params = TaskKeyParams {
            name: Some(alice_key().name),
            date: Some(alice_key().date),
        };
        assert_eq!(handler.delete_task(params).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let (handler, repo) = handler();
        repo.inject_error(TaskError::Storage("connection refused".into()));

        let err = handler.health().await.unwrap_err();
        assert_eq!(err, TaskError::Storage("connection refused".into()));
    }
}
