//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    CompletePaymentRequest, CompetitorToggleResponse, CreatePaymentRequest, DraftResponse,
    FavoritesResponse, PredictRequest, PredictResponse, SetHotelRequest, ToggleFavoriteRequest,
};
use super::handlers::{billing, dashboard, gate, onboarding, prediction, profile, system};
use crate::domain::gate::{GateDecision, GateRoute, GateState};
use crate::domain::prediction::PredictionSlot;
use crate::domain::selection::{MapNotice, MapPlace, SelectionState};
use crate::domain::{UserId, UserProfile};
use crate::error::{ErrorBody, ErrorResponse};
use crate::upstream::{PaymentIntent, Plan, PriceType, SubscriptionStatus};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "hotel-pricing-gateway",
        description = "Backend-for-frontend gateway for a hotel competitive-pricing dashboard."
    ),
    paths(
        system::health_handler,
        system::client_settings_handler,
        gate::get_gate,
        profile::get_profile,
        profile::toggle_favorite,
        profile::save_favorites,
        onboarding::get_draft,
        onboarding::set_hotel,
        onboarding::toggle_competitor,
        onboarding::save,
        dashboard::get_prices,
        dashboard::get_series,
        prediction::predict,
        billing::list_plans,
        billing::create_payment,
        billing::complete_payment,
        billing::get_subscription,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        UserId,
        UserProfile,
        GateDecision,
        GateState,
        GateRoute,
        MapPlace,
        MapNotice,
        SelectionState,
        PredictionSlot,
        PriceType,
        Plan,
        PaymentIntent,
        SubscriptionStatus,
        ToggleFavoriteRequest,
        FavoritesResponse,
        SetHotelRequest,
        DraftResponse,
        CompetitorToggleResponse,
        PredictRequest,
        PredictResponse,
        CreatePaymentRequest,
        CompletePaymentRequest,
        system::HealthResponse,
        system::ClientSettings,
    )),
    tags(
        (name = "System", description = "Health and client settings"),
        (name = "Gate", description = "Auth/subscription routing"),
        (name = "Profile", description = "Profile and favorites"),
        (name = "Onboarding", description = "Home hotel and competitor set"),
        (name = "Dashboard", description = "Prices, pivot table and context series"),
        (name = "Predictions", description = "Three-risk-level price prediction"),
        (name = "Billing", description = "Plans, payments and subscription"),
    )
)]
pub struct ApiDoc;
