//! HTTP middleware layers.

pub mod request_log;

pub use request_log::{stamp_correlation_headers, RequestLogger, RequestLoggerLayer};
