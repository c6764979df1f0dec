//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "devops-demo-api";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Seconds since the process started.
    pub uptime: f64,
}

/// GET /health — returns service health and uptime.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        uptime: state.registry.uptime().as_secs_f64(),
    })
}
