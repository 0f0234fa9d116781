//! Billing DTOs. The user id always comes from the session, never the body.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /billing/payments`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Plan to buy.
    pub plan_id: String,
}

/// Request body for `POST /billing/payments/complete`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompletePaymentRequest {
    /// Payment returned by `POST /billing/payments`.
    pub payment_id: String,
}
