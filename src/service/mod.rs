//! Service layer: business logic orchestration.
//!
//! [`ProfileService`] owns every profile read and write and emits events
//! through the [`super::domain::EventBus`]. [`DashboardService`] and
//! [`PredictionService`] sit on the pricing API, [`BillingService`] on the
//! billing API; all three lean on [`ProfileService`] for the user's saved
//! settings.

pub mod billing_service;
pub mod dashboard_service;
pub mod prediction_service;
pub mod profile_service;

pub use billing_service::BillingService;
pub use dashboard_service::{DashboardPrices, DashboardQuery, DashboardService};
pub use prediction_service::PredictionService;
pub use profile_service::ProfileService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::ProfileService;
    use crate::domain::gate::GatePaths;
    use crate::domain::pivot::HotelPriceRecord;
    use crate::domain::prediction::{PredictionRequest, PredictionResponse};
    use crate::domain::{DraftRegistry, EventBus, UserId, UserProfile};
    use crate::error::GatewayError;
    use crate::persistence::MemoryProfileStore;
    use crate::upstream::{
        BillingApi, CompletePayment, CreatePayment, PaymentIntent, Plan, PricingApi, RangeQuery,
        SeriesKind, SubscriptionStatus,
    };

    pub(crate) fn profile_service(profiles: Vec<UserProfile>) -> ProfileService {
        ProfileService::new(
            Arc::new(MemoryProfileStore::with_profiles(profiles)),
            Arc::new(DraftRegistry::new()),
            EventBus::new(64),
            GatePaths::default(),
        )
    }

    pub(crate) fn record(hotel: &str, date: &str, price: Option<f64>) -> HotelPriceRecord {
        HotelPriceRecord {
            hotel_name: hotel.to_string(),
            date: date.to_string(),
            room_price: price,
            site: None,
        }
    }

    /// Pricing API double that counts calls and can fail one risk level.
    #[derive(Debug, Default)]
    pub(crate) struct StubPricing {
        records: Vec<HotelPriceRecord>,
        failing_risk: Option<u8>,
        calls: AtomicUsize,
        last_region: Mutex<Option<String>>,
    }

    impl StubPricing {
        pub(crate) fn with_records(records: Vec<HotelPriceRecord>) -> Self {
            Self {
                records,
                ..Self::default()
            }
        }

        pub(crate) fn failing_risk(risk: u8) -> Self {
            Self {
                failing_risk: Some(risk),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_region(&self) -> Option<String> {
            self.last_region.lock().ok().and_then(|r| r.clone())
        }

        fn note_region(&self, region: Option<String>) {
            if let Ok(mut slot) = self.last_region.lock() {
                *slot = region;
            }
        }
    }

    #[async_trait]
    impl PricingApi for StubPricing {
        async fn hotel_prices(
            &self,
            _query: &RangeQuery,
        ) -> Result<Vec<HotelPriceRecord>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        async fn series(
            &self,
            _kind: SeriesKind,
            query: &RangeQuery,
        ) -> Result<Vec<serde_json::Value>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.note_region(query.region.clone());
            Ok(vec![serde_json::json!({"date": query.start_date.to_string()})])
        }

        async fn predict_price(
            &self,
            request: &PredictionRequest,
        ) -> Result<PredictionResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.note_region(Some(request.region.clone()));
            if self.failing_risk == Some(request.risk) {
                return Err(GatewayError::UpstreamStatus {
                    service: "pricing",
                    status: 500,
                });
            }
            Ok(PredictionResponse {
                predicted_price: 100.0 + f64::from(request.risk) * 10.0,
            })
        }
    }

    /// Billing API double that subscribes every completed payment for 30 days.
    #[derive(Debug, Default)]
    pub(crate) struct StubBilling;

    #[async_trait]
    impl BillingApi for StubBilling {
        async fn plans(&self) -> Result<Vec<Plan>, GatewayError> {
            Ok(vec![Plan {
                id: "monthly".to_string(),
                name: "Monthly".to_string(),
                price: 49.0,
                currency: Some("USD".to_string()),
                duration_days: Some(30),
            }])
        }

        async fn create_payment(
            &self,
            request: &CreatePayment,
        ) -> Result<PaymentIntent, GatewayError> {
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

        async fn subscription_status(
            &self,
            _user_id: UserId,
        ) -> Result<SubscriptionStatus, GatewayError> {
            Ok(SubscriptionStatus {
                is_subscribed: false,
                subscription_end_date: None,
            })
        }
    }
}
