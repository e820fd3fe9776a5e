//! Startup and shutdown events.

use crate::config::AppConfig;

/// Log the effective configuration once logging is up.
pub fn log_startup(config: &AppConfig) {
    tracing::info!(
        app_name = %config.app_name,
        version = %config.version,
        debug = config.debug,
        log_level = %config.logging.level,
        "Application starting up"
    );

    if config.debug {
        tracing::debug!(config = ?config, "Effective configuration");
    }
}

pub fn log_shutdown(config: &AppConfig) {
    tracing::info!(app_name = %config.app_name, "Application shutting down");
}
