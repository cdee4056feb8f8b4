use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether an inference API key was configured at startup.
    pub generation_enabled: bool,
    /// Which store adapter is in use (`firestore` or `memory`).
    pub store: &'static str,
}

/// GET /health -- service liveness and feature state.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        generation_enabled: state.generator.is_some(),
        store: state.store_label,
    })
}
