//! Error responses.
//!
//! # Responsibilities
//! - Map domain failures to HTTP status codes
//! - Render a uniform JSON error body
//! - Keep internal causes out of the body; hand them to the request logger
//!   through the [`ErrorReport`] response extension instead

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

/// Internal failure cause attached to a 500 response for logging.
#[derive(Debug, Clone)]
pub struct ErrorReport(pub String);

/// Errors surfaced by handlers and extractors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource absent (404).
    #[error("{detail}")]
    NotFound { detail: String },

    /// Malformed input (422).
    #[error("request validation failed")]
    Validation(Vec<FieldViolation>),

    /// Unexpected failure (500). `detail` is safe to show, `cause` is not.
    #[error("{detail}: {cause}")]
    Internal { detail: String, cause: String },
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>, cause: impl ToString) -> Self {
        Self::Internal {
            detail: detail.into(),
            cause: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = status.canonical_reason().unwrap_or("Error");

        match self {
            Self::NotFound { detail } => (
                status,
                Json(ErrorResponse {
                    error,
                    detail,
                    violations: Vec::new(),
                }),
            )
                .into_response(),
            Self::Validation(violations) => (
                status,
                Json(ErrorResponse {
                    error,
                    detail: "Request validation failed".to_string(),
                    violations,
                }),
            )
                .into_response(),
            Self::Internal { detail, cause } => {
                let mut response = (
                    status,
                    Json(ErrorResponse {
                        error,
                        detail,
                        violations: Vec::new(),
                    }),
                )
                    .into_response();
                response.extensions_mut().insert(ErrorReport(cause));
                response
            }
        }
    }
}

/// Turn a handler panic into a generic 500.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::internal("Internal server error", format!("handler panicked: {message}"))
        .into_response()
}
