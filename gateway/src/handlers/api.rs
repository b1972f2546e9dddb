use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Whether live upstream sessions are configured (false means demo mode)
    pub live_session_configured: bool,
}

/// Health check handler
///
/// Public endpoint, never behind authentication.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        live_session_configured: state.live_session_configured(),
    })
}
