//! Billing service: plans, payments and the subscription mirror on the
//! profile.

use std::sync::Arc;

use super::ProfileService;
use crate::domain::UserId;
use crate::error::GatewayError;
use crate::upstream::{
    BillingApi, CompletePayment, CreatePayment, PaymentIntent, Plan, SubscriptionStatus,
};

/// Orchestration layer over the billing API.
///
/// Billing is the source of truth for subscriptions; every status the
/// billing API reports is written through to the profile so the gate sees
/// it immediately.
#[derive(Debug, Clone)]
pub struct BillingService {
    billing: Arc<dyn BillingApi>,
    profiles: ProfileService,
}

impl BillingService {
    /// Creates a new `BillingService`.
    #[must_use]
    pub fn new(billing: Arc<dyn BillingApi>, profiles: ProfileService) -> Self {
        Self { billing, profiles }
    }

    /// Lists the available plans.
    ///
    /// # Errors
    ///
    /// Returns an upstream [`GatewayError`] if the billing API fails.
    pub async fn plans(&self) -> Result<Vec<Plan>, GatewayError> {
        self.billing.plans().await
    }

    /// Creates a payment intent for a plan.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a blank plan id, or an
    /// upstream error if the billing API fails.
    pub async fn create_payment(
        &self,
        user_id: UserId,
        plan_id: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let plan_id = plan_id.trim();
        if plan_id.is_empty() {
            return Err(GatewayError::Validation("plan_id is required".to_string()));
        }
        self.billing
            .create_payment(&CreatePayment {
                user_id,
                plan_id: plan_id.to_string(),
            })
            .await
    }

    /// Confirms a payment and mirrors the new status onto the profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a blank payment id, an
    /// upstream error if the billing API fails, or a persistence error if
    /// the profile cannot be written.
    pub async fn complete_payment(
        &self,
        user_id: UserId,
        payment_id: &str,
    ) -> Result<SubscriptionStatus, GatewayError> {
        let payment_id = payment_id.trim();
        if payment_id.is_empty() {
            return Err(GatewayError::Validation("payment_id is required".to_string()));
        }
        let status = self
            .billing
            .complete_payment(&CompletePayment {
                user_id,
                payment_id: payment_id.to_string(),
            })
            .await?;
        self.profiles.apply_subscription(user_id, &status).await?;
        Ok(status)
    }

    /// Fetches the current subscription status and mirrors it onto the
    /// profile.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the billing API fails, or a persistence
    /// error if the profile cannot be written.
    pub async fn subscription(&self, user_id: UserId) -> Result<SubscriptionStatus, GatewayError> {
        let status = self.billing.subscription_status(user_id).await?;
        self.profiles.apply_subscription(user_id, &status).await?;
        Ok(status)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserProfile;
    use crate::domain::gate::GateRoute;
    use crate::service::test_support::{StubBilling, profile_service};

    #[tokio::test]
    async fn complete_payment_updates_profile_and_gate() {
        let id = UserId::new();
        let profiles = profile_service(vec![UserProfile::new(id)]);
        let service = BillingService::new(Arc::new(StubBilling::default()), profiles.clone());

        let before = profiles.evaluate_gate(Some(id)).await;
        assert!(!before.is_subscribed);

        let Ok(status) = service.complete_payment(id, "pay_1").await else {
            panic!("payment should complete");
        };
        assert!(status.is_subscribed);

        let Ok(profile) = profiles.profile(id).await else {
            panic!("profile should exist");
        };
        assert!(profile.is_subscribed);

        let after = profiles.evaluate_gate(Some(id)).await;
        assert!(after.is_subscribed);
        assert_eq!(after.route, GateRoute::Onboarding);
    }

    #[tokio::test]
    async fn blank_plan_is_rejected() {
        let service = BillingService::new(
            Arc::new(StubBilling::default()),
            profile_service(vec![]),
        );
        let result = service.create_payment(UserId::new(), "  ").await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn create_payment_returns_intent() {
        let service = BillingService::new(
            Arc::new(StubBilling::default()),
            profile_service(vec![]),
        );
        let Ok(intent) = service.create_payment(UserId::new(), "monthly").await else {
            panic!("intent should be created");
        };
        assert_eq!(intent.payment_id, "pay_monthly");
    }
}
