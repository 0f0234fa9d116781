//! System endpoints: health check and client presentation settings.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::prediction::PredictionMode;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Limits and timings the client needs to render the dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClientSettings {
    max_competitors: usize,
    notice_dismiss_ms: u64,
    prediction_reveal_step_ms: u64,
    prediction_mode: &'static str,
}

/// `GET /config/client`: Client presentation settings.
#[utoipa::path(
    get,
    path = "/config/client",
    tag = "System",
    summary = "Client settings",
    description = "Returns the competitor cap, the at-capacity notice lifetime, the prediction reveal step and the prediction fan-in mode.",
    responses(
        (status = 200, description = "Client settings", body = ClientSettings),
    )
)]
pub async fn client_settings_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (max_competitors, notice_dismiss_ms) = state.profile_service.selection_limits();
    let prediction_mode = match state.prediction_service.mode() {
        PredictionMode::AllOrNothing => "all_or_nothing",
        PredictionMode::Settled => "settled",
    };
    (
        StatusCode::OK,
        Json(ClientSettings {
            max_competitors,
            notice_dismiss_ms,
            prediction_reveal_step_ms: state.prediction_service.reveal_step_ms(),
            prediction_mode,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/client", get(client_settings_handler))
}
