//! Onboarding DTOs: draft view, hotel form and map toggles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::OnboardingDraft;
use crate::domain::selection::{SelectionState, ToggleOutcome};

/// Request body for `PUT /onboarding/draft/hotel`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SetHotelRequest {
    /// Home hotel name.
    #[serde(default)]
    pub hotel_name: Option<String>,
    /// Home hotel address.
    #[serde(default)]
    pub hotel_address: Option<String>,
    /// Region derived from the address.
    #[serde(default)]
    pub region: Option<String>,
}

/// Draft as shown on the onboarding form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DraftResponse {
    /// Home hotel name.
    pub hotel_name: Option<String>,
    /// Home hotel address.
    pub hotel_address: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Selected competitors in click order.
    pub competitor_hotels: Vec<String>,
    /// Competitor cap.
    pub max_competitors: usize,
    /// Whether more competitors can be added.
    pub selection_state: SelectionState,
    /// Unsaved favorite hotels.
    pub favorite_hotels: Vec<String>,
    /// Last edit.
    pub updated_at: DateTime<Utc>,
}

impl From<&OnboardingDraft> for DraftResponse {
    fn from(draft: &OnboardingDraft) -> Self {
        Self {
            hotel_name: draft.hotel_name.clone(),
            hotel_address: draft.hotel_address.clone(),
            region: draft.region.clone(),
            competitor_hotels: draft.competitors.hotels().to_vec(),
            max_competitors: draft.competitors.max(),
            selection_state: draft.selection_state(),
            favorite_hotels: draft.favorites.as_slice().to_vec(),
            updated_at: draft.updated_at,
        }
    }
}

/// Response body for `POST /onboarding/draft/competitors/toggle`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitorToggleResponse {
    /// What the click did: `added`, `removed`, `rejected` (with a `notice`)
    /// or `ignored`.
    #[schema(value_type = Object)]
    pub result: ToggleOutcome,
    /// Draft after the click.
    pub draft: DraftResponse,
}
