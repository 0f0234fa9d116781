//! Domain events reflecting profile mutations.
//!
//! Every profile write emits a [`DashboardEvent`] through the
//! [`super::EventBus`]. WebSocket clients subscribed to the affected user
//! receive it and re-run the gate instead of waiting for the next focus or
//! visibility poll.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserId;

/// Domain event emitted after every profile mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// Onboarding was saved: hotel and competitor set persisted.
    OnboardingSaved {
        /// Profile owner.
        user_id: UserId,
        /// Home hotel name.
        hotel_name: String,
        /// Persisted competitor set.
        competitor_hotels: Vec<String>,
        /// Write timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The favorite list changed.
    FavoritesChanged {
        /// Profile owner.
        user_id: UserId,
        /// New favorite list.
        favorite_hotels: Vec<String>,
        /// Write timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A payment completed or the billing status was refreshed.
    SubscriptionChanged {
        /// Profile owner.
        user_id: UserId,
        /// New subscription flag.
        is_subscribed: bool,
        /// New end of the paid period.
        subscription_end_date: Option<DateTime<Utc>>,
        /// Write timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    /// Returns the user this event concerns.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::OnboardingSaved { user_id, .. }
            | Self::FavoritesChanged { user_id, .. }
            | Self::SubscriptionChanged { user_id, .. } => *user_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::OnboardingSaved { .. } => "onboarding_saved",
            Self::FavoritesChanged { .. } => "favorites_changed",
            Self::SubscriptionChanged { .. } => "subscription_changed",
        }
    }

    /// Returns `true` if the event can change the gate verdict.
    #[must_use]
    pub const fn affects_gate(&self) -> bool {
        matches!(
            self,
            Self::OnboardingSaved { .. } | Self::SubscriptionChanged { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_event_serializes_with_tag() {
        let event = DashboardEvent::SubscriptionChanged {
            user_id: UserId::new(),
            is_subscribed: true,
            subscription_end_date: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"subscription_changed\""));
        assert!(event.affects_gate());
    }

    #[test]
    fn favorites_do_not_affect_gate() {
        let id = UserId::new();
        let event = DashboardEvent::FavoritesChanged {
            user_id: id,
            favorite_hotels: vec!["A".to_string()],
            timestamp: Utc::now(),
        };
        assert_eq!(event.user_id(), id);
        assert_eq!(event.event_type_str(), "favorites_changed");
        assert!(!event.affects_gate());
    }
}
