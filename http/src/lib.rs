//! HTTP layer for the task-list backend
//!
//! This crate exposes the task endpoints over axum:
//!
//! - `POST /add`, `GET /fetch`, `PUT /update`, `DELETE /delete`
//! - `OPTIONS` preflight on each of them, answered without touching storage
//! - `GET /health` backed by the repository's health check
//! - the browser client from a static directory at `/` and `/static/*`
//!
//! Handlers receive the repository through router state, so any
//! [`TaskRepository`] works, including trait objects.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use task_http::TaskServer;
//! use task_core::TaskRepository;
//!
//! async fn start(repository: Arc<dyn TaskRepository>) -> Result<(), task_http::ServeError> {
//!     TaskServer::new(repository, "./static").serve("0.0.0.0:8080").await
//! }
//! ```

pub mod cors;
pub mod error;
pub mod handler;
pub mod request_logger;
pub mod server;

pub use cors::{Dispatch, Endpoint};
pub use error::ApiError;
pub use handler::{decode_task, TaskHandler};
pub use server::{ServeError, ServerState, TaskServer, DELETE_SUCCESS_MESSAGE, LANDING_PAGE};

// Re-export core types for external consumers
pub use task_core::{Task, TaskKey, TaskKeyParams, TaskRepository};
