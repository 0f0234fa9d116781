//! Billing handlers: plans, payments and subscription status.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CompletePaymentRequest, CreatePaymentRequest};
use crate::api::session::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::upstream::{PaymentIntent, Plan, SubscriptionStatus};

/// `GET /billing/plans`: List subscription plans.
///
/// # Errors
///
/// Returns [`GatewayError`] if the billing API fails.
#[utoipa::path(
    get,
    path = "/api/v1/billing/plans",
    tag = "Billing",
    summary = "List plans",
    responses(
        (status = 200, description = "Available plans", body = Vec<Plan>),
        (status = 502, description = "Billing API failed", body = ErrorResponse),
    )
)]
pub async fn list_plans(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let plans = state.billing_service.plans().await?;
    Ok(Json(plans))
}

/// `POST /billing/payments`: Create a payment intent.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the plan id is blank,
/// or the billing API fails.
#[utoipa::path(
    post,
    path = "/api/v1/billing/payments",
    tag = "Billing",
    summary = "Create a payment",
    description = "Creates a payment intent for the chosen plan. The client hands the returned secret to its payment sheet.",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment intent", body = PaymentIntent),
        (status = 400, description = "Blank plan id", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "Billing API failed", body = ErrorResponse),
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let intent = state
        .billing_service
        .create_payment(user_id, &req.plan_id)
        .await?;
    Ok((StatusCode::CREATED, Json(intent)))
}

/// `POST /billing/payments/complete`: Confirm a payment.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the payment id is
/// blank, the billing API fails, or the profile cannot be written.
#[utoipa::path(
    post,
    path = "/api/v1/billing/payments/complete",
    tag = "Billing",
    summary = "Complete a payment",
    description = "Confirms the payment with the billing API and mirrors the resulting subscription onto the profile. Emits a `subscription_changed` event when the status changed.",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Subscription after payment", body = SubscriptionStatus),
        (status = 400, description = "Blank payment id", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "Billing API failed", body = ErrorResponse),
    )
)]
pub async fn complete_payment(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<CompletePaymentRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let status = state
        .billing_service
        .complete_payment(user_id, &req.payment_id)
        .await?;
    Ok(Json(status))
}

/// `GET /billing/subscription`: Current subscription status.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the billing API fails,
/// or the profile cannot be written.
#[utoipa::path(
    get,
    path = "/api/v1/billing/subscription",
    tag = "Billing",
    summary = "Subscription status",
    responses(
        (status = 200, description = "Subscription status", body = SubscriptionStatus),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "Billing API failed", body = ErrorResponse),
    )
)]
pub async fn get_subscription(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, GatewayError> {
    let status = state.billing_service.subscription(user_id).await?;
    Ok(Json(status))
}

/// Billing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billing/plans", get(list_plans))
        .route("/billing/payments", post(create_payment))
        .route("/billing/payments/complete", post(complete_payment))
        .route("/billing/subscription", get(get_subscription))
}
