//! Profile-related DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /profile/favorites/toggle`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    /// Hotel to add or remove.
    pub hotel_name: String,
}

/// Response body for the favorite toggle and save endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritesResponse {
    /// Favorite list after the call.
    pub favorite_hotels: Vec<String>,
}
