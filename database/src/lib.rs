//! Database crate for the task-list backend
//!
//! This crate provides the persistence side of the system: the connection
//! descriptor built from the `DB_*` settings, and two implementations of the
//! [`TaskRepository`] trait over the single `tasks(name, date, task)` table.
//!
//! # Features
//!
//! - PostgreSQL backend with SSL disabled, used in production
//! - SQLite backend for embedded use and hermetic tests
//! - One shared connection pool per process
//! - All driver failures surfaced as storage errors with the driver message
//!
//! # Usage
//!
//! ```rust
//! use database::{PoolSettings, SqliteTaskRepository};
//! use task_core::{repository::TaskRepository, Task};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create repository (in-memory for testing)
//!     let repo = SqliteTaskRepository::new(":memory:", PoolSettings::default()).await?;
//!     repo.create_schema().await?;
//!
//!     let task = Task::new("alice", "2024-01-01", vec!["buy milk".into()]);
//!     repo.insert(&task).await?;
//!     assert_eq!(repo.fetch_by_key(&task.key()).await?, vec!["buy milk"]);
//!     Ok(())
//! }
//! ```

mod common;
pub mod connection;
mod postgres;
mod sqlite;

pub use connection::{redact_url, ConnectionSettings, PoolSettings};
pub use postgres::PostgresTaskRepository;
pub use sqlite::SqliteTaskRepository;

// Re-export commonly used types from task-core for convenience
pub use task_core::{
    error::{Result, TaskError},
    models::{Task, TaskKey},
    repository::TaskRepository,
};
