//! Health check and service information endpoints.
//!
//! Neither touches the user store; both are computed fresh on every call.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::request::CorrelationId;
use crate::http::server::AppState;

/// Status reported by every healthy instance.
pub const HEALTHY: &str = "healthy";

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub openapi: String,
}

pub async fn health_check(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
) -> Json<HealthStatus> {
    tracing::info!(
        correlation_id = %correlation_id,
        endpoint = "/health",
        "Health check performed"
    );

    Json(HealthStatus {
        status: HEALTHY.to_string(),
        version: state.config.version.clone(),
    })
}

pub async fn root(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
) -> Json<ServiceInfo> {
    tracing::info!(correlation_id = %correlation_id, "Root endpoint accessed");

    Json(ServiceInfo {
        message: format!("Welcome to {}", state.config.app_name),
        version: state.config.version.clone(),
        docs: "/docs".to_string(),
        openapi: "/openapi.json".to_string(),
    })
}
