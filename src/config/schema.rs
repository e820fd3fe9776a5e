//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the user service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Human-readable service name, echoed by the root endpoint.
    pub app_name: String,

    /// Service version reported by the health check.
    pub version: String,

    /// Debug mode (more verbose startup output).
    pub debug: bool,

    /// Path prefix every API route is nested under (e.g., "/api").
    pub api_prefix: String,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Log sink configuration.
    pub logging: LoggingConfig,

    /// Request limits and CORS.
    pub security: SecurityConfig,

    /// Metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "User Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            api_prefix: "/api".to_string(),
            listener: ListenerConfig::default(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Log sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level directive (trace, debug, info, warn, error).
    pub level: String,

    /// Directory holding the rotated log files.
    pub dir: PathBuf,

    /// Write human-readable logs to stdout.
    pub console: bool,

    /// Write `app.log`, `errors.log` and `structured.json` under `dir`.
    pub files: bool,

    /// Rotated `app.log`/`structured.json` files to keep (one per day).
    pub app_retention: usize,

    /// Rotated `errors.log` files to keep (one per day).
    pub error_retention: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            console: true,
            files: true,
            app_retention: 10,
            error_retention: 30,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Answer CORS preflights for any origin.
    pub cors_enabled: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            cors_enabled: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.logging.error_retention, 30);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            app_name = "Demo"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.app_name, "Demo");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
        assert_eq!(config.api_prefix, "/api");
        assert!(config.security.cors_enabled);
    }
}
