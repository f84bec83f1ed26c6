//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Event list status (passive, no store round trip)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub events: usize,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Status of the in-memory event list.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthStatus> {
    let snapshot = state.events.snapshot();
    Json(HealthStatus {
        events: snapshot.events.len(),
        loading: snapshot.loading,
        last_error: snapshot.last_error,
    })
}
