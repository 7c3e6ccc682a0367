//! Mock implementations and test utilities for the task-list backend
//!
//! This crate provides the shared testing infrastructure:
//! - An in-memory TaskRepository with error injection and call tracking
//! - Builders and fixtures for common tasks
//! - Random data generators and proptest strategies
//! - Custom assertion helpers
//! - Contract tests every repository backend must pass

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use repository::{MockTaskRepository, StoredRow};
