use crate::{
    error::{Result, TaskError},
    models::{Task, TaskKey, TaskKeyParams, SUBTASK_DELIMITER},
};

/// Presence checks applied before any storage call
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task decoded from a request body
    ///
    /// # Returns
    /// * `Ok(())` - If name and date are present and no subtask contains the delimiter
    /// * `Err(TaskError::Validation)` - Otherwise
    pub fn validate_task(task: &Task) -> Result<()> {
        if task.name.trim().is_empty() {
            return Err(TaskError::empty_field("name"));
        }
        if task.date.trim().is_empty() {
            return Err(TaskError::empty_field("date"));
        }
        Self::validate_subtasks(&task.subtasks)
    }

    /// Reject subtasks that would not survive the delimited column encoding.
    ///
    /// A list holding one empty subtask joins to the same empty column as an
    /// empty list, so it is refused as well.
    pub fn validate_subtasks(subtasks: &[String]) -> Result<()> {
        if let [only] = subtasks {
            if only.is_empty() {
                return Err(TaskError::Validation(
                    "A single empty subtask is not allowed".to_string(),
                ));
            }
        }
        if let Some(position) = subtasks
            .iter()
            .position(|subtask| subtask.contains(SUBTASK_DELIMITER))
        {
            return Err(TaskError::Validation(format!(
                "Subtask {position} must not contain '{SUBTASK_DELIMITER}'"
            )));
        }
        Ok(())
    }

    /// Turn optional query parameters into a composite key.
    ///
    /// Missing and empty values are treated alike.
    pub fn require_key(params: TaskKeyParams) -> Result<TaskKey> {
        match (params.name, params.date) {
            (Some(name), Some(date)) if !name.is_empty() && !date.is_empty() => {
                Ok(TaskKey::new(name, date))
            }
            _ => Err(TaskError::missing_key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: Option<&str>, date: Option<&str>) -> TaskKeyParams {
        TaskKeyParams {
            name: name.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_task() {
        let task = Task::new("alice", "2024-01-01", vec!["buy milk".to_string()]);
        assert!(TaskValidator::validate_task(&task).is_ok());

        let empty = Task::new("alice", "2024-01-01", vec![]);
        assert!(TaskValidator::validate_task(&empty).is_ok());

        let no_name = Task::new("  ", "2024-01-01", vec![]);
        assert_eq!(
            TaskValidator::validate_task(&no_name),
            Err(TaskError::empty_field("name"))
        );

        let no_date = Task::new("alice", "", vec![]);
        assert_eq!(
            TaskValidator::validate_task(&no_date),
            Err(TaskError::empty_field("date"))
        );
    }

    #[test]
    fn test_delimiter_in_subtask_is_rejected() {
        let task = Task::new(
            "alice",
            "2024-01-01",
            vec!["ok".to_string(), "eggs, milk".to_string()],
        );
        let err = TaskValidator::validate_task(&task).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Subtask 1"));
    }

    #[test]
    fn test_single_empty_subtask_is_rejected() {
        let task = Task::new("alice", "2024-01-01", vec![String::new()]);
        let err = TaskValidator::validate_task(&task).unwrap_err();
        assert!(err.is_validation());

        let mixed = Task::new("alice", "2024-01-01", vec![String::new(), "b".to_string()]);
        assert!(TaskValidator::validate_task(&mixed).is_ok());
    }

    #[test]
    fn test_require_key() {
        let key = TaskValidator::require_key(params(Some("alice"), Some("2024-01-01"))).unwrap();
        assert_eq!(key, TaskKey::new("alice", "2024-01-01"));

        for missing in [
            params(None, Some("2024-01-01")),
            params(Some("alice"), None),
            params(Some(""), Some("2024-01-01")),
            params(Some("alice"), Some("")),
            params(None, None),
        ] {
            assert_eq!(
                TaskValidator::require_key(missing),
                Err(TaskError::missing_key())
            );
        }
    }
}
