//! User profile record and subscription evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// A row of the `users` profile table.
///
/// The profile is the only record shared across dashboard features. Writes
/// are read-modify-write without version checks, so concurrent updates
/// resolve as last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Profile owner.
    pub id: UserId,
    /// Contact email, if the auth provider shared one.
    #[serde(default)]
    pub email: Option<String>,
    /// Set once onboarding has been saved.
    #[serde(default)]
    pub is_initialized: bool,
    /// Subscription flag as recorded by the billing flow.
    #[serde(default)]
    pub is_subscribed: bool,
    /// End of the paid period. A subscription is only active before it.
    #[serde(default)]
    pub subscription_end_date: Option<DateTime<Utc>>,
    /// Name of the user's own hotel.
    #[serde(default)]
    pub hotel_name: Option<String>,
    /// Street address of the user's own hotel.
    #[serde(default)]
    pub hotel_address: Option<String>,
    /// Region used for weather, flights, events and predictions.
    #[serde(default)]
    pub region: Option<String>,
    /// Competitor set chosen during onboarding (at most five names).
    #[serde(default)]
    pub competitor_hotels: Vec<String>,
    /// Hotels starred on the dashboard.
    #[serde(default)]
    pub favorite_hotels: Vec<String>,
}

impl UserProfile {
    /// Creates an empty, uninitialized and unsubscribed profile.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            email: None,
            is_initialized: false,
            is_subscribed: false,
            subscription_end_date: None,
            hotel_name: None,
            hotel_address: None,
            region: None,
            competitor_hotels: Vec::new(),
            favorite_hotels: Vec::new(),
        }
    }

    /// Returns `true` when the subscription flag is set and the paid period
    /// ends strictly after `now`.
    ///
    /// Evaluated on every call; nothing is cached between checks.
    #[must_use]
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.is_subscribed && self.subscription_end_date.is_some_and(|end| end > now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn future_end_date_is_active() {
        let now = Utc::now();
        let mut profile = UserProfile::new(UserId::new());
        profile.is_subscribed = true;
        profile.subscription_end_date = Some(now + Duration::days(3));
        assert!(profile.has_active_subscription(now));
    }

    #[test]
    fn past_end_date_is_inactive() {
        let now = Utc::now();
        let mut profile = UserProfile::new(UserId::new());
        profile.is_subscribed = true;
        profile.subscription_end_date = Some(now - Duration::seconds(1));
        assert!(!profile.has_active_subscription(now));
    }

    #[test]
    fn end_date_equal_to_now_is_inactive() {
        let now = Utc::now();
        let mut profile = UserProfile::new(UserId::new());
        profile.is_subscribed = true;
        profile.subscription_end_date = Some(now);
        assert!(!profile.has_active_subscription(now));
    }

    #[test]
    fn flag_off_is_inactive_even_with_future_date() {
        let now = Utc::now();
        let mut profile = UserProfile::new(UserId::new());
        profile.subscription_end_date = Some(now + Duration::days(30));
        assert!(!profile.has_active_subscription(now));
    }

    #[test]
    fn missing_end_date_is_inactive() {
        let mut profile = UserProfile::new(UserId::new());
        profile.is_subscribed = true;
        assert!(!profile.has_active_subscription(Utc::now()));
    }
}
