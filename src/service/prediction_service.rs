//! Prediction service: validates input, fans out one request per risk level
//! and fans the results back in.

use std::sync::Arc;

use futures_util::future::join_all;

use super::ProfileService;
use crate::domain::UserId;
use crate::domain::prediction::{
    DEFAULT_REVEAL_STEP_MS, PredictionInput, PredictionMode, PredictionSlot, RiskLevel,
    collect_slots, validate_prediction,
};
use crate::error::GatewayError;
use crate::upstream::PricingApi;

/// Runs three-risk-level price predictions.
#[derive(Debug, Clone)]
pub struct PredictionService {
    pricing: Arc<dyn PricingApi>,
    profiles: ProfileService,
    mode: PredictionMode,
    reveal_step_ms: u64,
}

impl PredictionService {
    /// Creates a new `PredictionService` in all-or-nothing mode.
    #[must_use]
    pub fn new(pricing: Arc<dyn PricingApi>, profiles: ProfileService) -> Self {
        Self {
            pricing,
            profiles,
            mode: PredictionMode::default(),
            reveal_step_ms: DEFAULT_REVEAL_STEP_MS,
        }
    }

    /// Sets the fan-in mode and the reveal step.
    #[must_use]
    pub fn with_presentation(mut self, mode: PredictionMode, reveal_step_ms: u64) -> Self {
        self.mode = mode;
        self.reveal_step_ms = reveal_step_ms;
        self
    }

    /// Fan-in mode.
    #[must_use]
    pub const fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Delay between two revealed slots.
    #[must_use]
    pub const fn reveal_step_ms(&self) -> u64 {
        self.reveal_step_ms
    }

    /// Validates and runs a prediction.
    ///
    /// When the input carries no region, the region saved on the user's
    /// profile is used. Upstream failures do not fail the call: they are
    /// reported in the returned slots.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if the input is invalid, in which
    /// case no prediction request is issued.
    pub async fn predict(
        &self,
        user_id: UserId,
        mut input: PredictionInput,
    ) -> Result<Vec<PredictionSlot>, GatewayError> {
        if input.region.as_deref().is_none_or(|r| r.trim().is_empty()) {
            input.region = self
                .profiles
                .find(user_id)
                .await?
                .and_then(|profile| profile.region);
        }
        let validated = validate_prediction(&input)?;

        let calls = RiskLevel::ALL.map(|risk| {
            let request = validated.request_for(risk);
            let pricing = Arc::clone(&self.pricing);
            async move {
                let result = pricing
                    .predict_price(&request)
                    .await
                    .map(|response| response.predicted_price);
                if let Err(e) = &result {
                    tracing::warn!(risk = risk.as_u8(), error = %e, "prediction request failed");
                }
                (risk, result)
            }
        });
        let outcomes = join_all(calls).await;

        let slots = collect_slots(outcomes, self.mode, self.reveal_step_ms);
        tracing::info!(
            %user_id,
            date = %validated.date,
            failed = slots.iter().filter(|s| s.error.is_some()).count(),
            "prediction completed"
        );
        Ok(slots)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserProfile;
    use crate::domain::prediction::PREDICTION_FAILURE_MESSAGE;
    use crate::service::test_support::{StubPricing, profile_service, record};

    fn input(date: &str) -> PredictionInput {
        PredictionInput {
            date: Some(date.to_string()),
            region: Some("Busan".to_string()),
            address: Some("1 Pier Rd".to_string()),
            occupancy: Some(0.8),
            records: vec![
                record("A", "2025-01-01", Some(100.0)),
                record("B", "2025-01-01", Some(90.0)),
                record("A", "2025-01-02", None),
            ],
        }
    }

    fn service(pricing: &Arc<StubPricing>, profiles: Vec<UserProfile>) -> PredictionService {
        PredictionService::new(
            Arc::clone(pricing) as Arc<dyn PricingApi>,
            profile_service(profiles),
        )
        .with_presentation(PredictionMode::AllOrNothing, 300)
    }

    #[tokio::test]
    async fn three_slots_in_risk_order() {
        let pricing = Arc::new(StubPricing::default());
        let Ok(slots) = service(&pricing, vec![]).predict(UserId::new(), input("2025-01-01")).await
        else {
            panic!("prediction should run");
        };
        assert_eq!(pricing.calls(), 3);
        let risks: Vec<u8> = slots.iter().map(|s| s.risk.as_u8()).collect();
        assert_eq!(risks, vec![1, 2, 3]);
        let delays: Vec<u64> = slots.iter().map(|s| s.reveal_after_ms).collect();
        assert_eq!(delays, vec![0, 300, 600]);
        assert!(slots.iter().all(|s| s.predicted_price.is_some()));
    }

    #[tokio::test]
    async fn date_without_prices_makes_no_calls() {
        let pricing = Arc::new(StubPricing::default());
        let result = service(&pricing, vec![])
            .predict(UserId::new(), input("2025-01-02"))
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
        assert_eq!(pricing.calls(), 0);
    }

    #[tokio::test]
    async fn one_failure_fails_all_slots() {
        let pricing = Arc::new(StubPricing::failing_risk(2));
        let Ok(slots) = service(&pricing, vec![]).predict(UserId::new(), input("2025-01-01")).await
        else {
            panic!("prediction should run");
        };
        assert_eq!(pricing.calls(), 3);
        assert!(
            slots
                .iter()
                .all(|s| s.error.as_deref() == Some(PREDICTION_FAILURE_MESSAGE))
        );
    }

    #[tokio::test]
    async fn settled_mode_fails_only_the_failed_level() {
        let pricing = Arc::new(StubPricing::failing_risk(2));
        let svc = service(&pricing, vec![]).with_presentation(PredictionMode::Settled, 300);
        let Ok(slots) = svc.predict(UserId::new(), input("2025-01-01")).await else {
            panic!("prediction should run");
        };
        let failed: Vec<u8> = slots
            .iter()
            .filter(|s| s.error.is_some())
            .map(|s| s.risk.as_u8())
            .collect();
        assert_eq!(failed, vec![2]);
    }

    #[tokio::test]
    async fn missing_region_falls_back_to_profile() {
        let id = UserId::new();
        let mut profile = UserProfile::new(id);
        profile.region = Some("Jeju".to_string());
        let pricing = Arc::new(StubPricing::default());
        let mut request = input("2025-01-01");
        request.region = None;

        let result = service(&pricing, vec![profile]).predict(id, request).await;
        assert!(result.is_ok());
        assert_eq!(pricing.last_region().as_deref(), Some("Jeju"));
    }

    #[tokio::test]
    async fn missing_region_everywhere_is_rejected() {
        let pricing = Arc::new(StubPricing::default());
        let mut request = input("2025-01-01");
        request.region = None;

        let result = service(&pricing, vec![]).predict(UserId::new(), request).await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
        assert_eq!(pricing.calls(), 0);
    }
}
