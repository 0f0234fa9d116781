//! Auth/subscription gate: decides where a visitor belongs.
//!
//! The gate is re-evaluated whenever the client regains focus or
//! visibility, and whenever a profile change is pushed over the event bus.
//! Evaluation is a pure function of the session, the profile lookup result
//! and the current time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{UserId, UserProfile};

/// Coarse state of a visitor with respect to auth and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No session.
    Anonymous,
    /// Signed in without an active subscription.
    AuthenticatedUnsubscribed,
    /// Subscribed, onboarding not yet saved.
    AuthenticatedSubscribedUninitialized,
    /// Subscribed and onboarded.
    AuthenticatedSubscribedInitialized,
}

/// Where the client should go after evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateRoute {
    /// Sign-in page.
    Auth,
    /// Onboarding form (hotel + competitor set).
    Onboarding,
    /// Price dashboard.
    Dashboard,
    /// Stay on the current page and prompt for a subscription.
    Stay,
}

/// Outcome of the profile lookup that feeds the gate.
#[derive(Debug, Clone, Copy)]
pub enum ProfileLookup<'a> {
    /// Profile row found.
    Found(&'a UserProfile),
    /// No profile row for this user.
    Missing,
    /// The profile store failed.
    Failed,
}

/// Paths the gate redirects to, taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePaths {
    /// Sign-in path.
    pub auth: String,
    /// Onboarding path.
    pub onboarding: String,
    /// Dashboard path.
    pub dashboard: String,
}

impl Default for GatePaths {
    fn default() -> Self {
        Self {
            auth: "/login".to_string(),
            onboarding: "/onboarding".to_string(),
            dashboard: "/dashboard".to_string(),
        }
    }
}

impl GatePaths {
    /// Returns the redirect target for a route, or `None` for [`GateRoute::Stay`].
    #[must_use]
    pub fn path_for(&self, route: GateRoute) -> Option<&str> {
        match route {
            GateRoute::Auth => Some(&self.auth),
            GateRoute::Onboarding => Some(&self.onboarding),
            GateRoute::Dashboard => Some(&self.dashboard),
            GateRoute::Stay => None,
        }
    }
}

/// Result of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GateDecision {
    /// Evaluated visitor state.
    pub state: GateState,
    /// Routing verdict.
    pub route: GateRoute,
    /// Redirect path; absent when the client should stay.
    pub redirect_to: Option<String>,
    /// Whether the subscription is active right now.
    pub is_subscribed: bool,
    /// Whether onboarding has been saved.
    pub is_initialized: bool,
}

/// Evaluates the gate.
///
/// Precedence, first match wins:
/// 1. no session: auth page
/// 2. profile lookup failed or no profile: onboarding
/// 3. subscribed but not initialized: onboarding
/// 4. initialized: dashboard
/// 5. otherwise: stay and prompt for a subscription
#[must_use]
pub fn evaluate_gate(
    session: Option<UserId>,
    lookup: ProfileLookup<'_>,
    now: DateTime<Utc>,
    paths: &GatePaths,
) -> GateDecision {
    let (state, route, is_subscribed, is_initialized) = match (session, lookup) {
        (None, _) => (GateState::Anonymous, GateRoute::Auth, false, false),
        (Some(_), ProfileLookup::Failed | ProfileLookup::Missing) => (
            GateState::AuthenticatedUnsubscribed,
            GateRoute::Onboarding,
            false,
            false,
        ),
        (Some(_), ProfileLookup::Found(profile)) => {
            let subscribed = profile.has_active_subscription(now);
            let initialized = profile.is_initialized;
            let state = match (subscribed, initialized) {
                (false, _) => GateState::AuthenticatedUnsubscribed,
                (true, false) => GateState::AuthenticatedSubscribedUninitialized,
                (true, true) => GateState::AuthenticatedSubscribedInitialized,
            };
            let route = if subscribed && !initialized {
                GateRoute::Onboarding
            } else if initialized {
                GateRoute::Dashboard
            } else {
                GateRoute::Stay
            };
            (state, route, subscribed, initialized)
        }
    };

    GateDecision {
        state,
        route,
        redirect_to: paths.path_for(route).map(str::to_string),
        is_subscribed,
        is_initialized,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn profile(subscribed_until: Option<i64>, initialized: bool, now: DateTime<Utc>) -> UserProfile {
        let mut p = UserProfile::new(UserId::new());
        p.is_initialized = initialized;
        if let Some(days) = subscribed_until {
            p.is_subscribed = true;
            p.subscription_end_date = Some(now + Duration::days(days));
        }
        p
    }

    #[test]
    fn anonymous_goes_to_auth() {
        let d = evaluate_gate(None, ProfileLookup::Missing, Utc::now(), &GatePaths::default());
        assert_eq!(d.state, GateState::Anonymous);
        assert_eq!(d.route, GateRoute::Auth);
        assert_eq!(d.redirect_to.as_deref(), Some("/login"));
    }

    #[test]
    fn lookup_failure_goes_to_onboarding() {
        let d = evaluate_gate(
            Some(UserId::new()),
            ProfileLookup::Failed,
            Utc::now(),
            &GatePaths::default(),
        );
        assert_eq!(d.route, GateRoute::Onboarding);
    }

    #[test]
    fn missing_profile_goes_to_onboarding() {
        let d = evaluate_gate(
            Some(UserId::new()),
            ProfileLookup::Missing,
            Utc::now(),
            &GatePaths::default(),
        );
        assert_eq!(d.route, GateRoute::Onboarding);
        assert_eq!(d.redirect_to.as_deref(), Some("/onboarding"));
    }

    #[test]
    fn subscribed_uninitialized_goes_to_onboarding() {
        let now = Utc::now();
        let p = profile(Some(10), false, now);
        let d = evaluate_gate(Some(p.id), ProfileLookup::Found(&p), now, &GatePaths::default());
        assert_eq!(d.state, GateState::AuthenticatedSubscribedUninitialized);
        assert_eq!(d.route, GateRoute::Onboarding);
    }

    #[test]
    fn initialized_goes_to_dashboard() {
        let now = Utc::now();
        let p = profile(Some(10), true, now);
        let d = evaluate_gate(Some(p.id), ProfileLookup::Found(&p), now, &GatePaths::default());
        assert_eq!(d.state, GateState::AuthenticatedSubscribedInitialized);
        assert_eq!(d.route, GateRoute::Dashboard);
        assert!(d.is_subscribed);
    }

    #[test]
    fn initialized_with_expired_subscription_still_reaches_dashboard() {
        let now = Utc::now();
        let p = profile(Some(-1), true, now);
        let d = evaluate_gate(Some(p.id), ProfileLookup::Found(&p), now, &GatePaths::default());
        assert_eq!(d.state, GateState::AuthenticatedUnsubscribed);
        assert_eq!(d.route, GateRoute::Dashboard);
        assert!(!d.is_subscribed);
    }

    #[test]
    fn unsubscribed_uninitialized_stays() {
        let now = Utc::now();
        let p = profile(None, false, now);
        let d = evaluate_gate(Some(p.id), ProfileLookup::Found(&p), now, &GatePaths::default());
        assert_eq!(d.route, GateRoute::Stay);
        assert!(d.redirect_to.is_none());
    }

    #[test]
    fn expired_subscription_is_reevaluated_against_now() {
        let now = Utc::now();
        let p = profile(Some(1), false, now);
        let later = now + Duration::days(2);
        let d = evaluate_gate(Some(p.id), ProfileLookup::Found(&p), later, &GatePaths::default());
        assert_eq!(d.route, GateRoute::Stay);
    }
}
