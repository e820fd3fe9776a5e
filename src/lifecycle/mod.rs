//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Log startup → Bind listener
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain requests → Log shutdown
//! ```

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{log_shutdown, log_startup};
