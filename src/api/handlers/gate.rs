//! Gate handler: the focus/visibility re-check.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::session::Session;
use crate::app_state::AppState;
use crate::domain::gate::GateDecision;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /gate`: Evaluate the auth/subscription gate.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the session header is
/// malformed.
#[utoipa::path(
    get,
    path = "/api/v1/gate",
    tag = "Gate",
    summary = "Evaluate the auth/subscription gate",
    description = "Returns where the visitor belongs: the sign-in page, onboarding, the dashboard, or the current page with a subscription prompt. Clients call this whenever they regain focus or visibility. A failing profile store routes to onboarding rather than failing the request.",
    responses(
        (status = 200, description = "Gate decision", body = GateDecision),
        (status = 400, description = "Malformed session header", body = ErrorResponse),
    )
)]
pub async fn get_gate(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.profile_service.evaluate_gate(session).await))
}

/// Gate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/gate", get(get_gate))
}
