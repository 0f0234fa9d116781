//! Profile handlers: read and favorite toggling.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{FavoritesResponse, ToggleFavoriteRequest};
use crate::api::session::CurrentUser;
use crate::app_state::AppState;
use crate::domain::UserProfile;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /profile`: Read the signed-in user's profile.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session or no profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    summary = "Get profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 404, description = "No profile yet", body = ErrorResponse),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, GatewayError> {
    let profile = state.profile_service.profile(user_id).await?;
    Ok(Json(profile))
}

/// `POST /profile/favorites/toggle`: Add or remove a favorite hotel.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the name is blank, or
/// the draft cannot be opened.
#[utoipa::path(
    post,
    path = "/api/v1/profile/favorites/toggle",
    tag = "Profile",
    summary = "Toggle a favorite hotel",
    description = "Adds the hotel to the unsaved favorite list if absent, removes it otherwise. The list is persisted by `POST /profile/favorites/save` or the onboarding save.",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Unsaved favorite list after the toggle", body = FavoritesResponse),
        (status = 400, description = "Blank hotel name", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<ToggleFavoriteRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let favorite_hotels = state
        .profile_service
        .toggle_favorite(user_id, &req.hotel_name)
        .await?;
    Ok(Json(FavoritesResponse { favorite_hotels }))
}

/// `POST /profile/favorites/save`: Persist the favorite list.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the user has no
/// profile, or the store fails.
#[utoipa::path(
    post,
    path = "/api/v1/profile/favorites/save",
    tag = "Profile",
    summary = "Save favorite hotels",
    description = "Writes the unsaved favorite list to the profile and notifies the user's WebSocket connections when it changed.",
    responses(
        (status = 200, description = "Saved favorite list", body = FavoritesResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 404, description = "No profile yet", body = ErrorResponse),
    )
)]
pub async fn save_favorites(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, GatewayError> {
    let favorite_hotels = state.profile_service.save_favorites(user_id).await?;
    Ok(Json(FavoritesResponse { favorite_hotels }))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/favorites/toggle", post(toggle_favorite))
        .route("/profile/favorites/save", post(save_favorites))
}
