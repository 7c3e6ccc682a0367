//! Task Server Library
//!
//! Configuration loading, telemetry, database provisioning and server
//! assembly for the task-list backend binary.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::{Config, DatabaseTarget, LogFormat};
pub use setup::{create_repository, create_server, initialize_app, verify_database, AppServer};
pub use telemetry::init_telemetry;
