//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::{DraftRegistry, EventBus};
use crate::persistence::ProfileStore;
use crate::service::{BillingService, DashboardService, PredictionService, ProfileService};
use crate::upstream::{BillingApi, PricingApi};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Gate, profile and onboarding operations.
    pub profile_service: Arc<ProfileService>,
    /// Price table, charts and context series.
    pub dashboard_service: Arc<DashboardService>,
    /// Three-risk-level predictions.
    pub prediction_service: Arc<PredictionService>,
    /// Plans, payments and subscription status.
    pub billing_service: Arc<BillingService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the service layer over the given store and upstream clients.
    #[must_use]
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn ProfileStore>,
        pricing: Arc<dyn PricingApi>,
        billing: Arc<dyn BillingApi>,
    ) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let profiles = ProfileService::new(
            store,
            Arc::new(DraftRegistry::new()),
            event_bus.clone(),
            config.gate_paths.clone(),
        )
        .with_selection_limits(config.max_competitors, config.notice_dismiss_ms);

        let dashboard_service = DashboardService::new(Arc::clone(&pricing), profiles.clone());
        let prediction_service = PredictionService::new(pricing, profiles.clone())
            .with_presentation(config.prediction_mode, config.prediction_reveal_step_ms);
        let billing_service = BillingService::new(billing, profiles.clone());

        Self {
            profile_service: Arc::new(profiles),
            dashboard_service: Arc::new(dashboard_service),
            prediction_service: Arc::new(prediction_service),
            billing_service: Arc::new(billing_service),
            event_bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryProfileStore;
    use crate::service::test_support::{StubBilling, StubPricing};

    #[test]
    fn zero_event_bus_capacity_still_builds() {
        let config = GatewayConfig {
            event_bus_capacity: 0,
            persistence_enabled: false,
            ..GatewayConfig::default()
        };
        let state = AppState::new(
            &config,
            Arc::new(MemoryProfileStore::new()),
            Arc::new(StubPricing::default()),
            Arc::new(StubBilling),
        );
        assert_eq!(state.event_bus.capacity(), 1);
    }
}
