//! Prediction handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{PredictRequest, PredictResponse};
use crate::api::session::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /predictions`: Three-risk-level price prediction.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session or the input is invalid.
/// Upstream failures are reported inside the slots, not as an error.
#[utoipa::path(
    post,
    path = "/api/v1/predictions",
    tag = "Predictions",
    summary = "Predict prices",
    description = "Validates the input (date, region, at least one price on that date), then runs the price model for risk levels 1, 2 and 3 concurrently. Slots come back in risk order with a `reveal_after_ms` presentation delay. Invalid input issues no upstream request.",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "One slot per risk level", body = PredictResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<PredictRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let slots = state
        .prediction_service
        .predict(user_id, req.into())
        .await?;
    Ok(Json(PredictResponse { slots }))
}

/// Prediction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/predictions", post(predict))
}
