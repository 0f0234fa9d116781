//! Shared fixtures for the integration tests: upstream doubles, state
//! builders and request helpers.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use chrono::{Duration, Utc};

use hotel_pricing_gateway::api::session::USER_ID_HEADER;
use hotel_pricing_gateway::app_state::AppState;
use hotel_pricing_gateway::config::GatewayConfig;
use hotel_pricing_gateway::domain::pivot::HotelPriceRecord;
use hotel_pricing_gateway::domain::prediction::{PredictionRequest, PredictionResponse};
use hotel_pricing_gateway::domain::{UserId, UserProfile};
use hotel_pricing_gateway::error::GatewayError;
use hotel_pricing_gateway::persistence::MemoryProfileStore;
use hotel_pricing_gateway::upstream::{
    BillingApi, CompletePayment, CreatePayment, PaymentIntent, Plan, PricingApi, RangeQuery,
    SeriesKind, SubscriptionStatus,
};

/// Pricing API double returning fixed records and counting predictions.
#[derive(Debug, Default)]
pub struct FakePricing {
    pub records: Vec<HotelPriceRecord>,
    pub predictions: AtomicUsize,
}

impl FakePricing {
    pub fn prediction_calls(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PricingApi for FakePricing {
    async fn hotel_prices(&self, _query: &RangeQuery) -> Result<Vec<HotelPriceRecord>, GatewayError> {
        Ok(self.records.clone())
    }

    async fn series(
        &self,
        kind: SeriesKind,
        query: &RangeQuery,
    ) -> Result<Vec<serde_json::Value>, GatewayError> {
        Ok(vec![serde_json::json!({
            "path": kind.path(),
            "region": query.region,
        })])
    }

    async fn predict_price(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, GatewayError> {
        self.predictions.fetch_add(1, Ordering::SeqCst);
        Ok(PredictionResponse {
            predicted_price: 100.0 * f64::from(request.risk),
        })
    }
}

/// Billing API double: every completed payment buys 30 days.
#[derive(Debug, Default)]
pub struct FakeBilling;

#[async_trait]
impl BillingApi for FakeBilling {
    async fn plans(&self) -> Result<Vec<Plan>, GatewayError> {
        Ok(vec![Plan {
            id: "monthly".to_string(),
            name: "Monthly".to_string(),
            price: 49.0,
            currency: Some("USD".to_string()),
            duration_days: Some(30),
        }])
    }

    async fn create_payment(&self, request: &CreatePayment) -> Result<PaymentIntent, GatewayError> {
        Ok(PaymentIntent {
            payment_id: format!("pay_{}", request.plan_id),
            client_secret: Some("secret".to_string()),
            amount: Some(49.0),
            currency: Some("USD".to_string()),
        })
    }

    async fn complete_payment(
        &self,
        _request: &CompletePayment,
    ) -> Result<SubscriptionStatus, GatewayError> {
        Ok(SubscriptionStatus {
            is_subscribed: true,
            subscription_end_date: Some(Utc::now() + Duration::days(30)),
        })
    }

    async fn subscription_status(&self, _user_id: UserId) -> Result<SubscriptionStatus, GatewayError> {
        Ok(SubscriptionStatus {
            is_subscribed: false,
            subscription_end_date: None,
        })
    }
}

pub fn record(hotel: &str, date: &str, price: Option<f64>) -> HotelPriceRecord {
    HotelPriceRecord {
        hotel_name: hotel.to_string(),
        date: date.to_string(),
        room_price: price,
        site: None,
    }
}

/// Profile with an active subscription, not yet onboarded.
pub fn subscribed_profile(id: UserId) -> UserProfile {
    let mut profile = UserProfile::new(id);
    profile.is_subscribed = true;
    profile.subscription_end_date = Some(Utc::now() + Duration::days(30));
    profile.region = Some("Busan".to_string());
    profile
}

/// Builds state over an in-memory store and the fakes.
pub fn state_with(profiles: Vec<UserProfile>, pricing: Arc<FakePricing>) -> AppState {
    state_with_reveal_step(profiles, pricing, 10)
}

/// Like [`state_with`], with a custom spacing between prediction slots.
pub fn state_with_reveal_step(
    profiles: Vec<UserProfile>,
    pricing: Arc<FakePricing>,
    reveal_step_ms: u64,
) -> AppState {
    let config = GatewayConfig {
        persistence_enabled: false,
        prediction_reveal_step_ms: reveal_step_ms,
        ..GatewayConfig::default()
    };
    AppState::new(
        &config,
        Arc::new(MemoryProfileStore::with_profiles(profiles)),
        pricing,
        Arc::new(FakeBilling),
    )
}

/// Builds a request, optionally signed in and with a JSON body.
pub fn request(
    method: Method,
    uri: &str,
    user: Option<UserId>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };
    request
}

/// Reads a JSON response body.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let Ok(value) = serde_json::from_slice(&bytes) else {
        panic!("body should be JSON");
    };
    value
}
