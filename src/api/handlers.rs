//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::debug;

use crate::state::AppState;
use super::responses::{HealthResponse, StatusResponse};

/// Handle GET /status - Return the coordinator phase and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let phase = state.get_phase();
    debug!("Status requested in phase {}", phase.name());

    Json(StatusResponse {
        phase: phase.name().to_string(),
        outcome: phase.outcome(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        cleanup_timeout_seconds: state.cleanup_timeout.as_secs(),
        signals: state.signals.iter().map(|s| s.to_string()).collect(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
