use anyhow::{bail, Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use database::{redact_url, ConnectionSettings, PoolSettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Prefix for structured environment overrides, e.g. `TASKS_SERVER__PORT`
const ENV_PREFIX: &str = "TASKS";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Optional `postgres://` or `sqlite://` URL. Replaces the five values below when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name
    pub name: String,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Listen address for the HTTP server
    pub listen_addr: String,
    /// Port number to listen on
    pub port: u16,
    /// Directory holding `to_do.html` and the `/static` assets
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Which backend the configuration points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Postgres from the `DB_*` values
    Postgres(ConnectionSettings),
    /// Postgres from an explicit URL
    PostgresUrl(String),
    /// SQLite file or in-memory database
    Sqlite(String),
}

impl DatabaseTarget {
    /// Human-readable location with credentials masked
    pub fn describe(&self) -> String {
        match self {
            DatabaseTarget::Postgres(settings) => settings.redacted_descriptor(),
            DatabaseTarget::PostgresUrl(url) | DatabaseTarget::Sqlite(url) => redact_url(url),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and config files
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::defaults();

        // Add config file if specified
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        Self::finish(builder)
    }

    /// Load configuration from a specific file path, layered over the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = Self::defaults().add_source(File::with_name(path).format(FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        ConfigBuilder::builder().add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ))
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        result.apply_standard_env_vars()?;
        Ok(result)
    }

    /// Apply the deployment variables (`DB_*`, `DATABASE_URL`, `LISTEN_ADDR`,
    /// `PORT`, `STATIC_DIR`, `LOG_LEVEL`) from the process environment
    pub fn apply_standard_env_vars(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| env::var(key).ok())
    }

    /// Apply the deployment variables using `lookup` to read them
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = port
                .trim()
                .parse()
                .with_context(|| format!("DB_PORT is not a valid port: '{port}'"))?;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.database.url = Some(database_url);
        }
        if let Some(listen_addr) = lookup("LISTEN_ADDR") {
            self.server.listen_addr = listen_addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: '{port}'"))?;
        }
        if let Some(static_dir) = lookup("STATIC_DIR") {
            self.server.static_dir = static_dir;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.logging.level = log_level;
        }
        Ok(())
    }

    /// The five Postgres connection values
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.database.host.clone(),
            port: self.database.port,
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            name: self.database.name.clone(),
        }
    }

    /// Pool sizing derived from the database section
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.database.max_connections,
            acquire_timeout: Duration::from_secs(self.database.connection_timeout),
        }
    }

    /// Resolve which backend to connect to
    pub fn database_target(&self) -> Result<DatabaseTarget> {
        match self.database.url.as_deref() {
            None => Ok(DatabaseTarget::Postgres(self.connection_settings())),
            Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
                Ok(DatabaseTarget::PostgresUrl(url.to_string()))
            }
            Some(url) if url.starts_with("sqlite:") => Ok(DatabaseTarget::Sqlite(url.to_string())),
            Some(url) => bail!(
                "Unsupported database URL '{}'. Expected postgres:// or sqlite:",
                redact_url(url)
            ),
        }
    }

    /// Get the server socket address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                bail!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                );
            }
        }

        if let DatabaseTarget::Postgres(settings) = self.database_target()? {
            settings.validate()?;
        }

        if self.server.port == 0 {
            bail!("Server port cannot be 0");
        }

        if self.server.static_dir.trim().is_empty() {
            bail!("Static directory cannot be empty");
        }

        if self.database.max_connections == 0 {
            bail!("Database max_connections must be greater than 0");
        }

        if self.database.connection_timeout == 0 {
            bail!("Database connection_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                host: "localhost".to_string(),
                port: 5432,
                user: String::new(),
                password: String::new(),
                name: String::new(),
                max_connections: 5,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: "./static".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}
