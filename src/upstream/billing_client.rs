//! reqwest client for the billing API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{
    BillingApi, CompletePayment, CreatePayment, ListPayload, PaymentIntent, Plan,
    SubscriptionStatus, endpoint_url, read_json, transport_error,
};
use crate::domain::UserId;
use crate::error::GatewayError;

const SERVICE: &str = "billing";
const PLANS_PATH: &str = "/api/billing/plans";
const CREATE_PATH: &str = "/payment/create";
const COMPLETE_PATH: &str = "/payment/complete";
const STATUS_PATH: &str = "/subscription/status";

/// HTTP client for the billing API.
#[derive(Debug, Clone)]
pub struct BillingClient {
    http: reqwest::Client,
    base_url: String,
}

impl BillingClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("billing client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + Sync, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = endpoint_url(SERVICE, &self.base_url, path, Vec::<(&str, &str)>::new())?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        read_json(SERVICE, response).await
    }
}

#[async_trait]
impl BillingApi for BillingClient {
    async fn plans(&self) -> Result<Vec<Plan>, GatewayError> {
        let url = endpoint_url(SERVICE, &self.base_url, PLANS_PATH, Vec::<(&str, &str)>::new())?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let payload: ListPayload<Plan> = read_json(SERVICE, response).await?;
        Ok(payload.into_vec(PLANS_PATH))
    }

    async fn create_payment(&self, request: &CreatePayment) -> Result<PaymentIntent, GatewayError> {
        let intent: PaymentIntent = self.post(CREATE_PATH, request).await?;
        tracing::info!(user_id = %request.user_id, plan = %request.plan_id, payment_id = %intent.payment_id, "payment intent created");
        Ok(intent)
    }

    async fn complete_payment(
        &self,
        request: &CompletePayment,
    ) -> Result<SubscriptionStatus, GatewayError> {
        let status: SubscriptionStatus = self.post(COMPLETE_PATH, request).await?;
        tracing::info!(user_id = %request.user_id, payment_id = %request.payment_id, subscribed = status.is_subscribed, "payment completed");
        Ok(status)
    }

    async fn subscription_status(&self, user_id: UserId) -> Result<SubscriptionStatus, GatewayError> {
        let url = endpoint_url(
            SERVICE,
            &self.base_url,
            STATUS_PATH,
            [("user_id", user_id.to_string())],
        )?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        read_json(SERVICE, response).await
    }
}
