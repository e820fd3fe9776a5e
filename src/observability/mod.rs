//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request logger + handlers produce:
//!     → logging.rs (structured log events, tagged with the correlation ID)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → console, app.log, errors.log, structured.json
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogGuards, LoggingError};
