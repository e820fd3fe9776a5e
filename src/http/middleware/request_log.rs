//! Request/response logging with correlation ID tracking.
//!
//! For every request the layer:
//! 1. resolves the correlation ID (see [`CorrelationId::from_headers`]) and
//!    stores it in a [`CorrelationContext`] request extension,
//! 2. logs "Incoming request" inside a `request` span tagged with the ID,
//! 3. runs the inner service and times it,
//! 4. logs "Response sent" (and "Request processing error" for 500s carrying
//!    an [`ErrorReport`]), records metrics and stamps `X-Correlation-ID` and
//!    `X-Request-ID` on the response.
//!
//! An `Err` from the inner service is logged and returned unchanged.

use axum::{
    extract::{ConnectInfo, MatchedPath},
    http::{HeaderMap, HeaderValue, Request, Response},
};
use futures_util::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::SocketAddr;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;

use crate::http::request::{CorrelationContext, CorrelationId, X_CORRELATION_ID, X_REQUEST_ID};
use crate::http::response::ErrorReport;
use crate::observability::metrics;

/// Layer that wraps services in [`RequestLogger`].
#[derive(Clone, Debug, Default)]
pub struct RequestLoggerLayer;

impl RequestLoggerLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger { inner }
    }
}

/// Middleware service emitting structured request/response events.
#[derive(Clone, Debug)]
pub struct RequestLogger<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogger<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Display + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let correlation_id = CorrelationId::from_headers(req.headers());

        let mut context = CorrelationContext::default();
        context.set(correlation_id.clone());
        req.extensions_mut().insert(context);

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "unmatched".to_string());
        let query_params = query_params(req.uri().query());
        let client = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let span = tracing::info_span!(
            "request",
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
        );

        span.in_scope(|| {
            tracing::info!(
                correlation_id = %correlation_id,
                request_id = %correlation_id,
                method = %method,
                path = %path,
                query_params = ?query_params,
                client = client.as_deref(),
                "Incoming request"
            );
        });

        let start = Instant::now();
        let future = self.inner.call(req);

        Box::pin(
            async move {
                match future.await {
                    Ok(mut response) => {
                        let process_time_ms = elapsed_ms(start);
                        let status = response.status();

                        if let Some(ErrorReport(error)) = response.extensions().get() {
                            tracing::error!(
                                correlation_id = %correlation_id,
                                method = %method,
                                path = %path,
                                error = %error,
                                process_time_ms = %process_time_ms,
                                "Request processing error"
                            );
                        }

                        tracing::info!(
                            correlation_id = %correlation_id,
                            request_id = %correlation_id,
                            method = %method,
                            path = %path,
                            status_code = status.as_u16(),
                            process_time_ms = %process_time_ms,
                            "Response sent"
                        );

                        metrics::record_request(method.as_str(), &route, status.as_u16(), start);
                        stamp_correlation_headers(response.headers_mut(), &correlation_id);
                        Ok(response)
                    }
                    Err(error) => {
                        let process_time_ms = elapsed_ms(start);
                        tracing::error!(
                            correlation_id = %correlation_id,
                            method = %method,
                            path = %path,
                            error = %error,
                            process_time_ms = %process_time_ms,
                            "Request processing error"
                        );
                        Err(error)
                    }
                }
            }
            .instrument(span),
        )
    }
}

/// Set both correlation headers to `id`.
pub fn stamp_correlation_headers(headers: &mut HeaderMap, id: &CorrelationId) {
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        headers.insert(X_CORRELATION_ID, value.clone());
        headers.insert(X_REQUEST_ID, value);
    }
}

/// Milliseconds since `start`, two decimals.
fn elapsed_ms(start: Instant) -> String {
    format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0)
}

fn query_params(query: Option<&str>) -> BTreeMap<String, String> {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
