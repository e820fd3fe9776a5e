//! Structured logging.
//!
//! # Sinks
//! - console: human-readable, for development
//! - `app.log`: plain text, rotated daily
//! - `errors.log`: ERROR events only, rotated daily, kept longer
//! - `structured.json`: one JSON object per line, including the current
//!   span (and so the request's correlation ID)
//!
//! File writers are non-blocking and lossy: a slow or failing disk drops log
//! lines instead of stalling requests. When the log directory cannot be used
//! the service keeps running with console output only.

use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {0:?}")]
    Level(String),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Flush guards for the background log writers.
///
/// Hold for the lifetime of the process; dropping flushes pending lines.
#[must_use = "dropping the guards stops file logging"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Rotating file appenders for the three file sinks.
struct FileSinks {
    app: RollingFileAppender,
    errors: RollingFileAppender,
    structured: RollingFileAppender,
}

impl FileSinks {
    fn open(config: &LoggingConfig) -> Result<Self, InitError> {
        Ok(Self {
            app: rolling(&config.dir, "app", "log", config.app_retention)?,
            errors: rolling(&config.dir, "errors", "log", config.error_retention)?,
            structured: rolling(&config.dir, "structured", "json", config.app_retention)?,
        })
    }
}

fn rolling(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    keep: usize,
) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix(suffix)
        .max_log_files(keep.max(1))
        .build(dir)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuards, LoggingError> {
    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| LoggingError::Level(config.level.clone()))?;
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let mut guards = Vec::new();
    let mut file_error = None;

    let files = match config.files.then(|| FileSinks::open(config)) {
        Some(Ok(sinks)) => Some(sinks),
        Some(Err(e)) => {
            file_error = Some(e);
            None
        }
        None => None,
    };

    let console = config.console.then(|| fmt::layer().with_target(true));

    let (app, errors, structured) = match files {
        Some(sinks) => {
            let (app_writer, app_guard) = tracing_appender::non_blocking(sinks.app);
            let (error_writer, error_guard) = tracing_appender::non_blocking(sinks.errors);
            let (json_writer, json_guard) = tracing_appender::non_blocking(sinks.structured);
            guards.extend([app_guard, error_guard, json_guard]);

            (
                Some(fmt::layer().with_ansi(false).with_writer(app_writer)),
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(error_writer)
                        .with_filter(LevelFilter::ERROR),
                ),
                Some(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_writer(json_writer),
                ),
            )
        }
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(app)
        .with(errors)
        .with(structured)
        .try_init()?;

    if let Some(e) = file_error {
        tracing::warn!(
            dir = %config.dir.display(),
            error = %e,
            "File log sinks unavailable, logging to console only"
        );
    }

    Ok(LogGuards { _guards: guards })
}

/// In-memory JSON log sink for asserting on emitted events.
#[cfg(test)]
pub(crate) mod capture {
    use serde_json::Value;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        /// Route this thread's events into a fresh buffer until the guard drops.
        ///
        /// Use from a current-thread runtime (plain `#[tokio::test]`).
        pub(crate) fn install() -> (Self, DefaultGuard) {
            let logs = Self::default();
            let writer = logs.clone();
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::new("user_service=trace"))
                .with_writer(move || writer.clone())
                .finish();
            (logs, tracing::subscriber::set_default(subscriber))
        }

        /// Event fields, in emission order.
        pub(crate) fn events(&self) -> Vec<Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter_map(|line| serde_json::from_str::<Value>(line).ok())
                .map(|line| line["fields"].clone())
                .collect()
        }

        /// Fields of the first event logged with `message`.
        pub(crate) fn event(&self, message: &str) -> Option<Value> {
            self.events().into_iter().find(|e| e["message"] == message)
        }

        pub(crate) fn messages(&self) -> Vec<String> {
            self.events()
                .iter()
                .filter_map(|e| e["message"].as_str().map(str::to_string))
                .collect()
        }
    }
}
