use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use task_server::{
    config::Config,
    setup::{create_repository, create_server, verify_database},
    telemetry::{init_telemetry, log_config_validation, log_startup_info},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

const EXIT_CONFIG: u8 = 1;
const EXIT_DATABASE: u8 = 2;
const EXIT_SERVER: u8 = 3;

#[derive(Parser)]
#[command(name = "task-server")]
#[command(about = "Task list HTTP backend")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Database URL override (postgres://, sqlite:// or sqlite:)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Listen port override
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory holding to_do.html and static assets
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<String>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::from_file(config_file)?,
        None => Config::from_env()?,
    };

    // Apply CLI overrides
    if let Some(ref database_url) = cli.database_url {
        config.database.url = Some(database_url.clone());
    }

    if let Some(ref listen_addr) = cli.listen_addr {
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(ref static_dir) = cli.static_dir {
        config.server.static_dir = static_dir.clone();
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

async fn run(config: Config) -> Result<(), (u8, anyhow::Error)> {
    let repository = create_repository(&config)
        .await
        .map_err(|e| (EXIT_DATABASE, e))?;
    verify_database(repository.as_ref())
        .await
        .map_err(|e| (EXIT_DATABASE, e))?;

    let server = create_server(repository, &config);

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))
        .map_err(|e| (EXIT_SERVER, e))?;

    server
        .serve_with_shutdown(listener, shutdown_signal())
        .await
        .map_err(|e| (EXIT_SERVER, anyhow::Error::msg(e).context("Task server error")))?;

    info!("Task server shut down cleanly");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_telemetry(&config.logging) {
        eprintln!("Failed to initialize telemetry: {e:#}");
        return ExitCode::from(EXIT_CONFIG);
    }

    log_config_validation(&config);
    if config.validate().is_err() {
        return ExitCode::from(EXIT_CONFIG);
    }

    log_startup_info(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err((code, e)) => {
            error!(error = %format!("{e:#}"), "Task server failed");
            ExitCode::from(code)
        }
    }
}
