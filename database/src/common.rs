use task_core::{error::TaskError, models::split_subtasks};

/// Flatten the `task` column of every matching row into one subtask list,
/// preserving row order and the order inside each row
pub fn rows_to_subtasks(columns: Vec<String>) -> Vec<String> {
    columns
        .iter()
        .flat_map(|column| split_subtasks(column))
        .collect()
}

/// Convert SQLx error to TaskError
///
/// Every driver failure becomes a storage error carrying the driver's own
/// message unchanged. Server-reported errors keep just the server's text.
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => TaskError::Storage(db_err.message().to_string()),
        _ => TaskError::Storage(err.to_string()),
    }
}
