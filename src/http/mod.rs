//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → middleware/ (correlation ID, request/response logging)
//!     → request.rs (extractors: correlation ID, validated JSON)
//!     → handlers (users, health)
//!     → response.rs (errors → status codes + JSON bodies)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CorrelationContext, CorrelationId, X_CORRELATION_ID, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
