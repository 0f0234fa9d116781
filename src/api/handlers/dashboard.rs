//! Dashboard handlers: hotel prices and context series.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;

use crate::api::dto::DateRangeParams;
use crate::api::session::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::upstream::SeriesKind;

/// `GET /dashboard/prices`: Prices with pivot table and trend series.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the range is inverted,
/// or the pricing API fails.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/prices",
    tag = "Dashboard",
    summary = "Hotel prices",
    description = "Fetches competitor prices for the range and returns the raw records, the pivot table (one row per hotel with the minimum price per date, followed by `avg`, `max` and `min` rows) and one chart series per hotel. Repeat `hotels` once per hotel to filter.",
    params(DateRangeParams),
    responses(
        (status = 200, description = "Records, pivot and trends", body = serde_json::Value),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "Pricing API failed", body = ErrorResponse),
    )
)]
pub async fn get_prices(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state
        .dashboard_service
        .prices(user_id, &params.into_query())
        .await?;
    Ok(Json(view))
}

/// `GET /dashboard/series/{kind}`: One auxiliary series.
///
/// # Errors
///
/// Returns [`GatewayError`] if there is no session, the series is unknown,
/// the range is inverted, the region is missing, or the pricing API fails.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/series/{kind}",
    tag = "Dashboard",
    summary = "Context series",
    description = "Passes through one of `pca-trends`, `flights`, `weather`, `holidays` or `performances`. Region-keyed series use the region saved on the profile.",
    params(
        ("kind" = String, Path, description = "Series name"),
        DateRangeParams,
    ),
    responses(
        (status = 200, description = "Series items", body = Vec<serde_json::Value>),
        (status = 400, description = "Unknown series or invalid input", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "Pricing API failed", body = ErrorResponse),
    )
)]
pub async fn get_series(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(kind): Path<String>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let kind: SeriesKind = kind.parse()?;
    let items = state
        .dashboard_service
        .series(user_id, kind, &params.into_query())
        .await?;
    Ok(Json(items))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/prices", get(get_prices))
        .route("/dashboard/series/{kind}", get(get_series))
}
