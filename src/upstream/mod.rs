//! Upstream API clients: the pricing/analytics API and the billing API.
//!
//! The services depend on the [`PricingApi`] and [`BillingApi`] traits; the
//! reqwest-backed [`PricingClient`] and [`BillingClient`] are built once at
//! startup from [`crate::config::GatewayConfig`]. Response bodies whose
//! shape varies between endpoints are normalised here through
//! [`ListPayload`], so nothing downstream branches on JSON shape.

pub mod billing_client;
pub mod pricing_client;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;
use crate::domain::pivot::HotelPriceRecord;
use crate::domain::prediction::{PredictionRequest, PredictionResponse};
use crate::error::GatewayError;

pub use billing_client::BillingClient;
pub use pricing_client::PricingClient;

/// Which aggregate the pricing API reports per hotel and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Average across booking sites.
    Avg,
    /// Cheapest booking site.
    #[default]
    Min,
}

impl PriceType {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Min => "min",
        }
    }
}

/// Dashboard series served by the pricing API besides hotel prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Principal-component trend summaries of competitor prices.
    PcaTrends,
    /// Flight fares into the region.
    Flights,
    /// Daily weather for the region.
    Weather,
    /// Public holidays.
    Holidays,
    /// Concerts, shows and other events in the region.
    Performances,
}

impl SeriesKind {
    /// Upstream path of the series.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::PcaTrends => "/pca-trends",
            Self::Flights => "/flights",
            Self::Weather => "/weather",
            Self::Holidays => "/holidays",
            Self::Performances => "/performances",
        }
    }

    /// Whether the series is keyed by user (competitor set) rather than region.
    #[must_use]
    pub const fn is_per_user(self) -> bool {
        matches!(self, Self::PcaTrends)
    }
}

impl std::str::FromStr for SeriesKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pca-trends" => Ok(Self::PcaTrends),
            "flights" => Ok(Self::Flights),
            "weather" => Ok(Self::Weather),
            "holidays" => Ok(Self::Holidays),
            "performances" | "events" => Ok(Self::Performances),
            other => Err(GatewayError::UnknownSeries(other.to_string())),
        }
    }
}

/// Date-range query shared by the dashboard endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// Requesting user; the pricing API resolves the competitor set from it.
    pub user_id: UserId,
    /// User region, required by region-keyed series.
    pub region: Option<String>,
    /// Price aggregate.
    pub price_type: PriceType,
    /// First stay date, inclusive.
    pub start_date: NaiveDate,
    /// Last stay date, inclusive.
    pub end_date: NaiveDate,
}

impl RangeQuery {
    fn date_params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ]
    }
}

/// List body that some endpoints return bare and others wrap in `items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `[...]`
    Bare(Vec<T>),
    /// `{"items": [...]}`
    Wrapped {
        /// Wrapped list.
        items: Vec<T>,
    },
    /// Anything else; treated as empty.
    Other(serde_json::Value),
}

impl<T> ListPayload<T> {
    /// Returns the list, or an empty one for unrecognised shapes.
    pub fn into_vec(self, endpoint: &str) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
            Self::Other(value) => {
                tracing::warn!(endpoint, kind = json_kind(&value), "unexpected list shape, using empty list");
                Vec::new()
            }
        }
    }
}

/// A subscription plan offered by the billing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    /// Plan identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price per period.
    pub price: f64,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Length of the paid period in days.
    #[serde(default)]
    pub duration_days: Option<u32>,
}

/// Body of `POST /payment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatePayment {
    /// Paying user.
    pub user_id: UserId,
    /// Chosen plan.
    pub plan_id: String,
}

/// Payment intent handed to the client-side payment sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentIntent {
    /// Billing-side payment identifier.
    pub payment_id: String,
    /// Secret the payment SDK needs to present the sheet.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Amount to charge.
    #[serde(default)]
    pub amount: Option<f64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Body of `POST /payment/complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompletePayment {
    /// Paying user.
    pub user_id: UserId,
    /// Payment returned by `create`.
    pub payment_id: String,
}

/// Subscription status as reported by the billing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionStatus {
    /// Whether billing considers the user subscribed.
    #[serde(default)]
    pub is_subscribed: bool,
    /// End of the paid period.
    #[serde(default)]
    pub subscription_end_date: Option<DateTime<Utc>>,
}

/// Pricing/analytics API.
#[async_trait]
pub trait PricingApi: Send + Sync + fmt::Debug {
    /// Competitor hotel prices over a date range.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn hotel_prices(&self, query: &RangeQuery) -> Result<Vec<HotelPriceRecord>, GatewayError>;

    /// One of the auxiliary dashboard series.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn series(
        &self,
        kind: SeriesKind,
        query: &RangeQuery,
    ) -> Result<Vec<serde_json::Value>, GatewayError>;

    /// Runs the price model for one risk level.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn predict_price(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, GatewayError>;
}

/// Billing API.
#[async_trait]
pub trait BillingApi: Send + Sync + fmt::Debug {
    /// Available plans.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn plans(&self) -> Result<Vec<Plan>, GatewayError>;

    /// Creates a payment intent.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn create_payment(&self, request: &CreatePayment) -> Result<PaymentIntent, GatewayError>;

    /// Confirms a completed payment and returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn complete_payment(
        &self,
        request: &CompletePayment,
    ) -> Result<SubscriptionStatus, GatewayError>;

    /// Current subscription status of a user.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] on transport or status failure.
    async fn subscription_status(&self, user_id: UserId) -> Result<SubscriptionStatus, GatewayError>;
}

/// Joins a base URL, a path and query parameters.
fn endpoint_url<I, K, V>(
    service: &'static str,
    base_url: &str,
    path: &str,
    params: I,
) -> Result<reqwest::Url, GatewayError>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    reqwest::Url::parse_with_params(&format!("{base_url}{path}"), params).map_err(|e| {
        GatewayError::Upstream {
            service,
            message: format!("invalid url {base_url}{path}: {e}"),
        }
    })
}

/// Checks the status and decodes a JSON body.
async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), url = %response.url(), "upstream returned error status");
        return Err(GatewayError::UpstreamStatus {
            service,
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Upstream {
            service,
            message: format!("parse error: {e}"),
        })
}

/// Maps a transport error.
fn transport_error(service: &'static str, err: &reqwest::Error) -> GatewayError {
    tracing::warn!(service, error = %err, "upstream request failed");
    GatewayError::Upstream {
        service,
        message: err.to_string(),
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn list_payload_accepts_bare_and_wrapped() {
        let bare: ListPayload<u32> = serde_json::from_str("[1, 2]").unwrap_or(ListPayload::Bare(vec![]));
        assert_eq!(bare.into_vec("test"), vec![1, 2]);

        let wrapped: ListPayload<u32> =
            serde_json::from_str(r#"{"items": [3]}"#).unwrap_or(ListPayload::Bare(vec![]));
        assert_eq!(wrapped.into_vec("test"), vec![3]);
    }

    #[test]
    fn list_payload_degrades_to_empty() {
        let other: ListPayload<u32> =
            serde_json::from_str(r#"{"error": "nope"}"#).unwrap_or(ListPayload::Bare(vec![9]));
        assert!(other.into_vec("test").is_empty());
    }

    #[test]
    fn series_kind_parses_path_segments() {
        assert_eq!("weather".parse::<SeriesKind>().ok(), Some(SeriesKind::Weather));
        assert_eq!("events".parse::<SeriesKind>().ok(), Some(SeriesKind::Performances));
        assert!(matches!(
            "stocks".parse::<SeriesKind>(),
            Err(GatewayError::UnknownSeries(_))
        ));
    }

    #[test]
    fn endpoint_url_encodes_params() {
        let Ok(url) = endpoint_url(
            "pricing",
            "http://api.test",
            "/weather",
            [("region", "Jeju Island")],
        ) else {
            panic!("url should build");
        };
        assert_eq!(url.as_str(), "http://api.test/weather?region=Jeju+Island");
    }
}
