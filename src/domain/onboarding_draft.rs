//! Unsaved profile edits for one user: the onboarding form and the
//! favorite list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::selection::{
    CompetitorSelection, HotelList, MapPlace, SelectionState, ToggleOutcome,
};
use super::{UserId, UserProfile};

/// Profile edits kept between clicks.
///
/// Nothing here reaches the profile store until the user saves.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingDraft {
    /// Draft owner.
    pub user_id: UserId,
    /// Home hotel name typed or picked from autocomplete.
    pub hotel_name: Option<String>,
    /// Home hotel address.
    pub hotel_address: Option<String>,
    /// Region derived from the address.
    pub region: Option<String>,
    /// Competitor set built from map clicks.
    pub competitors: CompetitorSelection,
    /// Favorite hotels as edited on the dashboard.
    pub favorites: HotelList,
    /// Last edit.
    pub updated_at: DateTime<Utc>,
}

impl OnboardingDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(user_id: UserId, competitors: CompetitorSelection) -> Self {
        Self {
            user_id,
            hotel_name: None,
            hotel_address: None,
            region: None,
            competitors,
            favorites: HotelList::default(),
            updated_at: Utc::now(),
        }
    }

    /// Creates a draft pre-filled from a saved profile, so that re-running
    /// onboarding starts from the current settings.
    #[must_use]
    pub fn from_profile(profile: &UserProfile, competitors: CompetitorSelection) -> Self {
        Self {
            user_id: profile.id,
            hotel_name: profile.hotel_name.clone(),
            hotel_address: profile.hotel_address.clone(),
            region: profile.region.clone(),
            competitors: competitors.with_hotels(profile.competitor_hotels.clone()),
            favorites: HotelList::from_names(profile.favorite_hotels.clone()),
            updated_at: Utc::now(),
        }
    }

    /// Replaces the home hotel fields. Blank values clear the field.
    pub fn set_hotel(&mut self, name: Option<String>, address: Option<String>, region: Option<String>) {
        self.hotel_name = clean(name);
        self.hotel_address = clean(address);
        self.region = clean(region);
        self.updated_at = Utc::now();
    }

    /// Applies a map click to the competitor set.
    pub fn toggle_competitor(&mut self, place: &MapPlace) -> ToggleOutcome {
        let outcome = self.competitors.toggle(place);
        if matches!(outcome, ToggleOutcome::Added | ToggleOutcome::Removed) {
            self.updated_at = Utc::now();
        }
        outcome
    }

    /// Adds or removes a favorite hotel. Returns `true` if it is now a
    /// favorite.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        self.updated_at = Utc::now();
        self.favorites.toggle(name)
    }

    /// Whether the draft has been left alone since `cutoff`.
    #[must_use]
    pub fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff
    }

    /// Competitor selection state.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.competitors.state()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
