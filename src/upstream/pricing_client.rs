//! reqwest client for the pricing/analytics API.

use std::time::Duration;

use async_trait::async_trait;

use super::{
    ListPayload, PricingApi, RangeQuery, SeriesKind, endpoint_url, read_json, transport_error,
};
use crate::domain::pivot::HotelPriceRecord;
use crate::domain::prediction::{PredictionRequest, PredictionResponse};
use crate::error::GatewayError;

const SERVICE: &str = "pricing";

/// HTTP client for the pricing API. Stateless apart from the pooled
/// connections inside [`reqwest::Client`]; cheap to clone.
#[derive(Debug, Clone)]
pub struct PricingClient {
    http: reqwest::Client,
    base_url: String,
}

impl PricingClient {
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
            .map_err(|e| GatewayError::Internal(format!("pricing client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Vec<T>, GatewayError> {
        let url = endpoint_url(SERVICE, &self.base_url, path, params)?;
        tracing::debug!(%url, "pricing request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let payload: ListPayload<T> = read_json(SERVICE, response).await?;
        Ok(payload.into_vec(path))
    }
}

#[async_trait]
impl PricingApi for PricingClient {
    async fn hotel_prices(&self, query: &RangeQuery) -> Result<Vec<HotelPriceRecord>, GatewayError> {
        let mut params = vec![
            ("user_id", query.user_id.to_string()),
            ("price_type", query.price_type.as_str().to_string()),
        ];
        params.extend(query.date_params());
        let records: Vec<HotelPriceRecord> = self.get_list("/hotel-prices", params).await?;
        tracing::debug!(user_id = %query.user_id, count = records.len(), "hotel prices fetched");
        Ok(records)
    }

    async fn series(
        &self,
        kind: SeriesKind,
        query: &RangeQuery,
    ) -> Result<Vec<serde_json::Value>, GatewayError> {
        let mut params = if kind.is_per_user() {
            vec![
                ("user_id", query.user_id.to_string()),
                ("price_type", query.price_type.as_str().to_string()),
            ]
        } else {
            let region = query.region.clone().ok_or_else(|| {
                GatewayError::Validation("user region is not set".to_string())
            })?;
            vec![("region", region)]
        };
        params.extend(query.date_params());
        self.get_list(kind.path(), params).await
    }

    async fn predict_price(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, GatewayError> {
        let url = endpoint_url(SERVICE, &self.base_url, "/predict", Vec::<(&str, &str)>::new())?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;
        let prediction: PredictionResponse = read_json(SERVICE, response).await?;
        tracing::debug!(risk = request.risk, price = prediction.predicted_price, "prediction received");
        Ok(prediction)
    }
}
