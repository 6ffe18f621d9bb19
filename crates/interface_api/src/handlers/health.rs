//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::HealthCheckable;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    fn new(status: &str, message: Option<String>) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            message,
        }
    }
}

/// Liveness endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy", None))
}

/// Readiness check (includes the payment store)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let result = state.service.store().health_check().await;

    if result.is_operational() {
        Ok(Json(HealthResponse::new("ready", None)))
    } else {
        warn!(adapter = %result.adapter_id, message = ?result.message, "Readiness check failed");
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("unavailable", result.message)),
        ))
    }
}
