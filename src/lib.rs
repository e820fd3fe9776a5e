//! User Service Library
//!
//! Health check and user CRUD over HTTP, backed by an in-memory store, with
//! correlation-ID propagation and structured logging.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod users;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use users::UserStore;
