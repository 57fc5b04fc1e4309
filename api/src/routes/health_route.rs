//! GET /health and GET /health/llm.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{app_state::AppState, error_handler::AppError};

#[derive(Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

/// Liveness only; never touches the network.
pub async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

/// Probes the configured Gemini model. 503 when the probe fails.
pub async fn llm_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.health.check(&state.llm_config).await;
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Router fallback.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
