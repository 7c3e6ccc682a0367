use anyhow::{Context, Result};
use database::{PostgresTaskRepository, SqliteTaskRepository};
use std::sync::Arc;
use task_core::TaskRepository;
use task_http::TaskServer;
use tracing::info;

use crate::config::{Config, DatabaseTarget};

/// Server type used by the binary: any backend behind a trait object
pub type AppServer = TaskServer<dyn TaskRepository>;

/// Open the connection pool for the configured backend
///
/// SQLite databases get the `tasks` table created on open; Postgres is
/// expected to be provisioned already.
pub async fn create_repository(config: &Config) -> Result<Arc<dyn TaskRepository>> {
    info!("Creating task repository");

    let target = config.database_target()?;
    let pool = config.pool_settings();
    info!(database = %target.describe(), "Opening database pool");

    let repository: Arc<dyn TaskRepository> = match target {
        DatabaseTarget::Postgres(settings) => Arc::new(
            PostgresTaskRepository::connect(&settings, pool)
                .await
                .context("Failed to connect to PostgreSQL")?,
        ),
        DatabaseTarget::PostgresUrl(url) => Arc::new(
            PostgresTaskRepository::from_url(&url, pool)
                .await
                .context("Failed to connect to PostgreSQL")?,
        ),
        DatabaseTarget::Sqlite(url) => {
            let repo = SqliteTaskRepository::new(&url, pool)
                .await
                .context("Failed to open SQLite database")?;
            repo.create_schema()
                .await
                .context("Failed to create SQLite schema")?;
            Arc::new(repo)
        }
    };

    info!("Task repository created successfully");
    Ok(repository)
}

/// Confirm the database answers a trivial query
pub async fn verify_database(repository: &dyn TaskRepository) -> Result<()> {
    repository
        .health_check()
        .await
        .context("Database connection failed")?;
    info!("Successfully connected to the database");
    Ok(())
}

/// Create and configure the HTTP server
pub fn create_server(repository: Arc<dyn TaskRepository>, config: &Config) -> AppServer {
    info!(static_dir = %config.server.static_dir, "Creating task server");
    TaskServer::new(repository, &config.server.static_dir)
}

/// Initialize the complete application: pool, reachability check, server
pub async fn initialize_app(config: &Config) -> Result<AppServer> {
    info!("Initializing application");

    let repository = create_repository(config)
        .await
        .context("Failed to create repository")?;

    verify_database(repository.as_ref()).await?;

    let server = create_server(repository, config);

    info!("Application initialized successfully");
    Ok(server)
}
