//! Onboarding handlers: draft editing and the explicit save.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{CompetitorToggleResponse, DraftResponse, SetHotelRequest};
use crate::api::session::CurrentUser;
use crate::app_state::AppState;
use crate::domain::UserProfile;
use crate::domain::selection::MapPlace;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /onboarding/draft`: Current onboarding draft.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session or the profile store
/// fails while opening a new draft.
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/draft",
    tag = "Onboarding",
    summary = "Get the onboarding draft",
    description = "Returns the unsaved onboarding state. A new draft starts from the saved profile, if any.",
    responses(
        (status = 200, description = "Draft", body = DraftResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn get_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, GatewayError> {
    let draft = state.profile_service.draft(user_id).await?;
    Ok(Json(DraftResponse::from(&draft)))
}

/// `PUT /onboarding/draft/hotel`: Set the home hotel.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session or the profile store
/// fails while opening a new draft.
#[utoipa::path(
    put,
    path = "/api/v1/onboarding/draft/hotel",
    tag = "Onboarding",
    summary = "Set the home hotel",
    description = "Replaces the hotel name, address and region of the draft. Blank values clear the field.",
    request_body = SetHotelRequest,
    responses(
        (status = 200, description = "Draft after the edit", body = DraftResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn set_hotel(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<SetHotelRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let draft = state
        .profile_service
        .set_draft_hotel(user_id, req.hotel_name, req.hotel_address, req.region)
        .await?;
    Ok(Json(DraftResponse::from(&draft)))
}

/// `POST /onboarding/draft/competitors/toggle`: Apply a map click.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session or the profile store
/// fails while opening a new draft.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/draft/competitors/toggle",
    tag = "Onboarding",
    summary = "Toggle a competitor hotel",
    description = "Adds the clicked hotel to the competitor set, or removes it if already selected. Non-hotel places are ignored. A click that would exceed the cap is rejected with a notice the client shows on the map and dismisses after `dismiss_after_ms`.",
    request_body = MapPlace,
    responses(
        (status = 200, description = "Toggle result and draft", body = CompetitorToggleResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn toggle_competitor(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(place): Json<MapPlace>,
) -> Result<impl IntoResponse, GatewayError> {
    let (result, draft) = state
        .profile_service
        .toggle_competitor(user_id, &place)
        .await?;
    Ok(Json(CompetitorToggleResponse {
        result,
        draft: DraftResponse::from(&draft),
    }))
}

/// `POST /onboarding/save`: Persist the draft.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the hotel name or
/// address is missing, or the profile cannot be written.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/save",
    tag = "Onboarding",
    summary = "Save onboarding",
    description = "Writes the hotel and competitor set to the profile and marks it initialized. Emits an `onboarding_saved` event.",
    responses(
        (status = 200, description = "Saved profile", body = UserProfile),
        (status = 400, description = "Hotel name or address missing", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn save(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, GatewayError> {
    let profile = state.profile_service.save_onboarding(user_id).await?;
    Ok(Json(profile))
}

/// Onboarding routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding/draft", get(get_draft))
        .route("/onboarding/draft/hotel", put(set_hotel))
        .route("/onboarding/draft/competitors/toggle", post(toggle_competitor))
        .route("/onboarding/save", post(save))
}
