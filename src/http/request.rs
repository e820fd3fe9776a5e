//! Request-scoped state and extractors.
//!
//! # Responsibilities
//! - Resolve the correlation ID from inbound headers, or generate one
//! - Carry it through the request in a [`CorrelationContext`] extension
//! - Extract validated JSON bodies, rejecting bad input with 422

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName},
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::fmt;
use uuid::Uuid;

use crate::http::response::{ApiError, FieldViolation};

/// Primary correlation header.
pub const X_CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// Fallback correlation header, echoed for older clients.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Value handlers see when no correlation ID was set for the request.
pub const NOT_SET: &str = "N/A";

/// Opaque token grouping every log line of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random (UUID v4) correlation ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// `X-Correlation-ID` first, then `X-Request-ID`, else a fresh ID.
    ///
    /// Blank and non-UTF-8 header values count as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        [&X_CORRELATION_ID, &X_REQUEST_ID]
            .into_iter()
            .find_map(|name| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
            })
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holder for the current request's correlation ID.
///
/// Created and filled by the request logger, stored in the request
/// extensions, and dropped with the request. Handlers only read it.
#[derive(Debug, Clone, Default)]
pub struct CorrelationContext {
    current: Option<CorrelationId>,
}

impl CorrelationContext {
    pub fn set(&mut self, id: CorrelationId) {
        self.current = Some(id);
    }

    /// The stored ID, or `None` when not set.
    pub fn get(&self) -> Option<&CorrelationId> {
        self.current.as_ref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CorrelationContext>()
            .and_then(CorrelationContext::get)
            .cloned()
            .unwrap_or_else(|| Self(NOT_SET.to_string())))
    }
}

/// Input types that check their own constraints after deserialization.
pub trait Validate {
    /// The type produced once all constraints hold.
    type Output;

    fn validate(self) -> Result<Self::Output, Vec<FieldViolation>>;
}

/// JSON body extractor that also runs [`Validate`].
///
/// Any rejection (bad JSON, wrong types, failed constraints) becomes a 422.
pub struct ValidatedJson<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    T::Output: Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(vec![FieldViolation::new("body", rejection.body_text())])
        })?;

        payload.validate().map(ValidatedJson).map_err(ApiError::Validation)
    }
}
