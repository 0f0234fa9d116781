//! Hotel selection sets: the capped competitor set and plain toggle lists.
//!
//! Competitors are picked by clicking places on the onboarding map. Only
//! places typed `lodging` count; anything else is ignored. The set holds
//! at most [`DEFAULT_MAX_COMPETITORS`] names, and a click that would exceed
//! the cap is rejected with a short-lived on-map notice.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default competitor cap.
pub const DEFAULT_MAX_COMPETITORS: usize = 5;

/// Default lifetime of the at-capacity notice, in milliseconds.
pub const DEFAULT_NOTICE_DISMISS_MS: u64 = 2_000;

/// Map place type that marks a hotel.
pub const LODGING_PLACE_TYPE: &str = "lodging";

/// A place resolved from a map click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MapPlace {
    /// Display name of the place.
    pub name: String,
    /// Provider place types, e.g. `["lodging", "point_of_interest"]`.
    #[serde(default)]
    pub types: Vec<String>,
}

impl MapPlace {
    /// Returns `true` if the place is a hotel.
    #[must_use]
    pub fn is_lodging(&self) -> bool {
        self.types.iter().any(|t| t == LODGING_PLACE_TYPE)
    }
}

/// Transient message shown on the map; the client dismisses it after
/// `dismiss_after_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MapNotice {
    /// Text to display.
    pub message: String,
    /// Auto-dismiss delay.
    pub dismiss_after_ms: u64,
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The hotel joined the set.
    Added,
    /// The hotel left the set.
    Removed,
    /// The set is full; nothing changed.
    Rejected {
        /// Notice to surface on the map.
        notice: MapNotice,
    },
    /// The place is not a hotel; nothing changed.
    Ignored,
}

/// Whether the competitor set can still grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// Below the cap.
    Idle,
    /// Cap reached.
    AtCapacity,
}

/// De-duplicated list of hotel names with toggle semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotelList(Vec<String>);

impl HotelList {
    /// Creates a list from names, dropping blanks and duplicates while
    /// keeping first-seen order.
    #[must_use]
    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let mut list = Self::default();
        for name in names {
            let name = name.trim().to_string();
            if !name.is_empty() && !list.contains(&name) {
                list.0.push(name);
            }
        }
        list
    }

    /// Adds the name if absent, removes it otherwise. Returns `true` if the
    /// name is now in the list.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|n| n == name) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    /// Returns `true` if the name is in the list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Capped competitor set driven by map clicks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorSelection {
    hotels: HotelList,
    max: usize,
    notice_dismiss_ms: u64,
}

impl Default for CompetitorSelection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPETITORS, DEFAULT_NOTICE_DISMISS_MS)
    }
}

impl CompetitorSelection {
    /// Creates an empty selection with the given cap and notice lifetime.
    #[must_use]
    pub fn new(max: usize, notice_dismiss_ms: u64) -> Self {
        Self {
            hotels: HotelList::default(),
            max,
            notice_dismiss_ms,
        }
    }

    /// Seeds the selection from a saved profile. Names past the cap are
    /// dropped.
    #[must_use]
    pub fn with_hotels(mut self, names: Vec<String>) -> Self {
        let list = HotelList::from_names(names);
        self.hotels = HotelList(list.into_vec().into_iter().take(self.max).collect());
        self
    }

    /// Handles a map click.
    pub fn toggle(&mut self, place: &MapPlace) -> ToggleOutcome {
        if !place.is_lodging() {
            return ToggleOutcome::Ignored;
        }
        let name = place.name.trim();
        if name.is_empty() {
            return ToggleOutcome::Ignored;
        }
        if !self.hotels.contains(name) && self.hotels.len() >= self.max {
            tracing::debug!(hotel = name, max = self.max, "competitor selection at capacity");
            return ToggleOutcome::Rejected {
                notice: MapNotice {
                    message: format!("You can select up to {} competitor hotels.", self.max),
                    dismiss_after_ms: self.notice_dismiss_ms,
                },
            };
        }
        if self.hotels.toggle(name) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Removed
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        if self.hotels.len() >= self.max {
            SelectionState::AtCapacity
        } else {
            SelectionState::Idle
        }
    }

    /// Selected hotel names.
    #[must_use]
    pub fn hotels(&self) -> &[String] {
        self.hotels.as_slice()
    }

    /// Configured cap.
    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }
}
