use crate::common::{rows_to_subtasks, sqlx_error_to_task_error};
use crate::connection::PoolSettings;
use async_trait::async_trait;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use task_core::{
    error::{Result, TaskError},
    models::{join_subtasks, Task, TaskKey},
    repository::TaskRepository,
};

/// SQLite implementation of the TaskRepository trait
///
/// Used for embedded deployments and for hermetic tests. Statements are the
/// same as the PostgreSQL ones, with `?` placeholders.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Create a new SQLite repository with the given database URL
    ///
    /// # Arguments
    /// * `database_url` - SQLite database URL (file path or `:memory:`)
    ///
    /// # Returns
    /// * `Ok(SqliteTaskRepository)` - Successfully connected repository
    /// * `Err(TaskError::Storage)` - If connection fails
    ///
    /// # Examples
    /// ```rust,no_run
    /// use database::{PoolSettings, SqliteTaskRepository};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // In-memory database for testing
    /// let repo = SqliteTaskRepository::new(":memory:", PoolSettings::default()).await?;
    ///
    /// // File-based database
    /// let repo = SqliteTaskRepository::new("sqlite:///tmp/tasks.db", PoolSettings::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str, pool: PoolSettings) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let file_path = sqlite_file_path(database_url);
        let db_url = if in_memory {
            database_url.to_string()
        } else {
            format!("sqlite://{file_path}")
        };

        // Create database if it doesn't exist (for file-based databases)
        if !in_memory && !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            match Sqlite::create_database(&db_url).await {
                Ok(_) => tracing::info!("Database created successfully"),
                Err(error) => {
                    tracing::error!("Error creating database: {}", error);
                    return Err(TaskError::Storage(format!(
                        "Failed to create database: {error}"
                    )));
                }
            }
        }

        let connected = if in_memory {
            // Every connection to `:memory:` is a separate database, so keep
            // exactly one connection alive for the pool's lifetime.
            let connect_options = SqliteConnectOptions::new()
                .filename(":memory:")
                .journal_mode(SqliteJournalMode::Memory);

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(pool.acquire_timeout)
                .connect_with(connect_options)
                .await
        } else {
            let connect_options = SqliteConnectOptions::new()
                .filename(file_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(std::time::Duration::from_secs(5));

            SqlitePoolOptions::new()
                .max_connections(pool.max_connections)
                .acquire_timeout(pool.acquire_timeout)
                .connect_with(connect_options)
                .await
        };
        let pool = connected.map_err(sqlx_error_to_task_error)?;

        Ok(Self { pool })
    }

    /// Create the `tasks` table if it does not exist yet
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::query(include_str!("../schema/sqlite.sql"))
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        tracing::info!("SQLite schema ready");
        Ok(())
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// This method is primarily intended for testing scenarios where
    /// direct SQL execution is needed.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Strip the `sqlite://` or `sqlite:` scheme, leaving the file path
fn sqlite_file_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, task: &Task) -> Result<()> {
        sqlx::query("INSERT INTO tasks (name, date, task) VALUES (?, ?, ?)")
            .bind(&task.name)
            .bind(&task.date)
            .bind(task.joined_subtasks())
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;
        Ok(())
    }

    async fn fetch_by_key(&self, key: &TaskKey) -> Result<Vec<String>> {
        let columns: Vec<String> =
            sqlx::query_scalar("SELECT task FROM tasks WHERE name = ? AND date = ? ORDER BY rowid")
                .bind(&key.name)
                .bind(&key.date)
                .fetch_all(&self.pool)
                .await
                .map_err(sqlx_error_to_task_error)?;

        Ok(rows_to_subtasks(columns))
    }

    async fn update(&self, key: &TaskKey, subtasks: &[String]) -> Result<u64> {
        let result = sqlx::query("UPDATE tasks SET task = ? WHERE name = ? AND date = ?")
            .bind(join_subtasks(subtasks))
            .bind(&key.name)
            .bind(&key.date)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, key: &TaskKey) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE name = ? AND date = ?")
            .bind(&key.name)
            .bind(&key.date)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;
        Ok(())
    }
}
