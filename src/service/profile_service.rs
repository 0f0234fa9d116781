//! Profile service: gate evaluation, unsaved drafts (onboarding form and
//! favorites) and the profile writes an explicit save leads to.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::gate::{GateDecision, GatePaths, ProfileLookup, evaluate_gate};
use crate::domain::selection::{CompetitorSelection, MapPlace, ToggleOutcome};
use crate::domain::{DashboardEvent, DraftRegistry, EventBus, OnboardingDraft, UserId, UserProfile};
use crate::error::GatewayError;
use crate::persistence::ProfileStore;
use crate::upstream::SubscriptionStatus;

/// Orchestration layer for everything that reads or writes a profile.
///
/// Every write follows the same pattern: fetch → mutate → save → emit
/// event. Writes are last-write-wins; there is no version check.
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    drafts: Arc<DraftRegistry>,
    event_bus: EventBus,
    gate_paths: GatePaths,
    max_competitors: usize,
    notice_dismiss_ms: u64,
}

impl ProfileService {
    /// Creates a new `ProfileService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ProfileStore>,
        drafts: Arc<DraftRegistry>,
        event_bus: EventBus,
        gate_paths: GatePaths,
    ) -> Self {
        Self {
            store,
            drafts,
            event_bus,
            gate_paths,
            max_competitors: crate::domain::selection::DEFAULT_MAX_COMPETITORS,
            notice_dismiss_ms: crate::domain::selection::DEFAULT_NOTICE_DISMISS_MS,
        }
    }

    /// Overrides the competitor cap and the at-capacity notice lifetime.
    #[must_use]
    pub fn with_selection_limits(mut self, max_competitors: usize, notice_dismiss_ms: u64) -> Self {
        self.max_competitors = max_competitors;
        self.notice_dismiss_ms = notice_dismiss_ms;
        self
    }

    /// Competitor cap and at-capacity notice lifetime, in that order.
    #[must_use]
    pub const fn selection_limits(&self) -> (usize, u64) {
        (self.max_competitors, self.notice_dismiss_ms)
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`DraftRegistry`].
    #[must_use]
    pub fn drafts(&self) -> &Arc<DraftRegistry> {
        &self.drafts
    }

    /// Evaluates the auth/subscription gate for a session.
    ///
    /// A failing profile store is not an error here: the gate treats it like
    /// a missing profile and sends the user to onboarding.
    pub async fn evaluate_gate(&self, session: Option<UserId>) -> GateDecision {
        let now = Utc::now();
        let Some(user_id) = session else {
            return evaluate_gate(None, ProfileLookup::Missing, now, &self.gate_paths);
        };
        let decision = match self.store.fetch(user_id).await {
            Ok(Some(profile)) => evaluate_gate(
                session,
                ProfileLookup::Found(&profile),
                now,
                &self.gate_paths,
            ),
            Ok(None) => evaluate_gate(session, ProfileLookup::Missing, now, &self.gate_paths),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "profile lookup failed during gate evaluation");
                evaluate_gate(session, ProfileLookup::Failed, now, &self.gate_paths)
            }
        };
        tracing::debug!(%user_id, route = ?decision.route, "gate evaluated");
        decision
    }

    /// Returns the profile if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store fails.
    pub async fn find(&self, user_id: UserId) -> Result<Option<UserProfile>, GatewayError> {
        self.store.fetch(user_id).await
    }

    /// Returns the profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProfileNotFound`] if the user has no profile.
    pub async fn profile(&self, user_id: UserId) -> Result<UserProfile, GatewayError> {
        self.store
            .fetch(user_id)
            .await?
            .ok_or_else(|| GatewayError::ProfileNotFound(*user_id.as_uuid()))
    }

    /// Adds or removes a hotel from the user's unsaved favorite list.
    ///
    /// The store is not touched; [`ProfileService::save_favorites`] or
    /// [`ProfileService::save_onboarding`] persists the list.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if the name is blank, or a
    /// [`GatewayError::PersistenceError`] if the store fails while opening
    /// the draft.
    pub async fn toggle_favorite(
        &self,
        user_id: UserId,
        hotel_name: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let name = hotel_name.trim();
        if name.is_empty() {
            return Err(GatewayError::Validation("hotel name is required".to_string()));
        }
        let lock = self.draft_lock(user_id).await?;
        let mut draft = lock.write().await;
        let added = draft.toggle_favorite(name);
        tracing::debug!(%user_id, hotel = name, added, "favorite toggled");
        Ok(draft.favorites.as_slice().to_vec())
    }

    /// Persists the unsaved favorite list.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProfileNotFound`] if the user has no profile,
    /// or a [`GatewayError::PersistenceError`] if the store fails.
    pub async fn save_favorites(&self, user_id: UserId) -> Result<Vec<String>, GatewayError> {
        let mut profile = self.profile(user_id).await?;
        let Some(lock) = self.drafts.get(user_id).await else {
            return Ok(profile.favorite_hotels);
        };
        let favorites = lock.read().await.favorites.as_slice().to_vec();
        if favorites == profile.favorite_hotels {
            return Ok(favorites);
        }

        profile.favorite_hotels = favorites;
        self.store.save(&profile).await?;

        let _ = self.event_bus.publish(DashboardEvent::FavoritesChanged {
            user_id,
            favorite_hotels: profile.favorite_hotels.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(%user_id, favorites = profile.favorite_hotels.len(), "favorites saved");
        Ok(profile.favorite_hotels)
    }

    /// Returns the user's onboarding draft, opening one if needed.
    ///
    /// New drafts start from the saved profile when there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store fails while
    /// opening a new draft.
    pub async fn draft(&self, user_id: UserId) -> Result<OnboardingDraft, GatewayError> {
        let lock = self.draft_lock(user_id).await?;
        let draft = lock.read().await.clone();
        Ok(draft)
    }

    /// Sets the home hotel fields of the draft.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store fails while
    /// opening a new draft.
    pub async fn set_draft_hotel(
        &self,
        user_id: UserId,
        hotel_name: Option<String>,
        hotel_address: Option<String>,
        region: Option<String>,
    ) -> Result<OnboardingDraft, GatewayError> {
        let lock = self.draft_lock(user_id).await?;
        let mut draft = lock.write().await;
        draft.set_hotel(hotel_name, hotel_address, region);
        Ok(draft.clone())
    }

    /// Applies a map click to the draft's competitor set.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store fails while
    /// opening a new draft.
    pub async fn toggle_competitor(
        &self,
        user_id: UserId,
        place: &MapPlace,
    ) -> Result<(ToggleOutcome, OnboardingDraft), GatewayError> {
        let lock = self.draft_lock(user_id).await?;
        let mut draft = lock.write().await;
        let outcome = draft.toggle_competitor(place);
        tracing::debug!(%user_id, place = %place.name, ?outcome, "competitor toggle");
        Ok((outcome, draft.clone()))
    }

    /// Persists the draft and marks the profile initialized.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if the hotel name or address is
    /// missing, or a [`GatewayError::PersistenceError`] if the store fails.
    pub async fn save_onboarding(&self, user_id: UserId) -> Result<UserProfile, GatewayError> {
        let lock = self.draft_lock(user_id).await?;
        let draft = lock.read().await.clone();

        let Some(hotel_name) = draft.hotel_name.clone() else {
            return Err(GatewayError::Validation("hotel name is required".to_string()));
        };
        if draft.hotel_address.is_none() {
            return Err(GatewayError::Validation("hotel address is required".to_string()));
        }

        let mut profile = self
            .store
            .fetch(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id));
        profile.hotel_name = Some(hotel_name.clone());
        profile.hotel_address = draft.hotel_address.clone();
        profile.region = draft.region.clone();
        profile.competitor_hotels = draft.competitors.hotels().to_vec();
        profile.favorite_hotels = draft.favorites.as_slice().to_vec();
        profile.is_initialized = true;
        self.store.save(&profile).await?;

        let _ = self.drafts.remove(user_id).await;
        let _ = self.event_bus.publish(DashboardEvent::OnboardingSaved {
            user_id,
            hotel_name: hotel_name.clone(),
            competitor_hotels: profile.competitor_hotels.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %user_id,
            hotel = %hotel_name,
            competitors = profile.competitor_hotels.len(),
            "onboarding saved"
        );
        Ok(profile)
    }

    /// Mirrors a billing status onto the profile. Emits an event only when
    /// something changed.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the store fails.
    pub async fn apply_subscription(
        &self,
        user_id: UserId,
        status: &SubscriptionStatus,
    ) -> Result<UserProfile, GatewayError> {
        let mut profile = self
            .store
            .fetch(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id));
        if profile.is_subscribed == status.is_subscribed
            && profile.subscription_end_date == status.subscription_end_date
        {
            return Ok(profile);
        }

        profile.is_subscribed = status.is_subscribed;
        profile.subscription_end_date = status.subscription_end_date;
        self.store.save(&profile).await?;

        let _ = self.event_bus.publish(DashboardEvent::SubscriptionChanged {
            user_id,
            is_subscribed: profile.is_subscribed,
            subscription_end_date: profile.subscription_end_date,
            timestamp: Utc::now(),
        });

        tracing::info!(%user_id, subscribed = profile.is_subscribed, "subscription updated");
        Ok(profile)
    }

    /// Drops drafts nobody has edited for `ttl`. Returns how many went.
    pub async fn sweep_idle_drafts(&self, ttl: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            return 0;
        };
        let removed = self.drafts.remove_idle(cutoff).await;
        if removed > 0 {
            tracing::info!(removed, "idle drafts dropped");
        }
        removed
    }

    async fn draft_lock(
        &self,
        user_id: UserId,
    ) -> Result<Arc<tokio::sync::RwLock<OnboardingDraft>>, GatewayError> {
        if let Some(lock) = self.drafts.get(user_id).await {
            return Ok(lock);
        }
        let selection = CompetitorSelection::new(self.max_competitors, self.notice_dismiss_ms);
        let saved = self.store.fetch(user_id).await?;
        Ok(self
            .drafts
            .get_or_insert_with(user_id, || match saved {
                Some(profile) => OnboardingDraft::from_profile(&profile, selection),
                None => OnboardingDraft::new(user_id, selection),
            })
            .await)
    }
}
