//! User Service
//!
//! Health check and user CRUD API built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ request logger ──▶ router ──▶ handlers ──▶ user store
//!               (correlation ID,              (users,      (in-memory,
//!                timing, logs)                 health)      mutex)
//!   response ◀── X-Correlation-ID / X-Request-ID on every response
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use user_service::config::resolve_config;
use user_service::lifecycle::{log_shutdown, log_startup, shutdown_signal};
use user_service::observability::{init_logging, metrics};
use user_service::HttpServer;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User CRUD service with correlation-ID logging", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "USER_SERVICE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log_guards = init_logging(&config.logging)?;
    log_startup(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config.clone());
    server.run(listener, shutdown_signal()).await?;

    log_shutdown(&config);
    Ok(())
}
