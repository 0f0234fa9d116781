//! # hotel-pricing-gateway
//!
//! Backend-for-frontend gateway for a hotel competitive-pricing dashboard.
//!
//! The gateway owns the dashboard's logic: it decides where a visitor
//! belongs (sign-in, onboarding, dashboard, or a subscription prompt),
//! keeps the onboarding draft with its capped competitor set, turns raw
//! price records into a pivot table and chart series, fans prediction
//! requests out over three risk levels, and drives the subscription
//! payment flow. Pricing data and billing live in external APIs; this
//! service is a coordination layer.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Profile / Dashboard / Prediction / Billing services (service/)
//!     ├── EventBus, DraftRegistry (domain/)
//!     │
//!     ├── Gate, pivot, selection, prediction logic (domain/)
//!     │
//!     ├── Pricing + billing API clients (upstream/)
//!     └── Profile store: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
pub mod ws;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Builds the full application router (REST, WebSocket and, with the
/// `swagger-ui` feature, the API docs) bound to `state`.
///
/// HTTP middleware (tracing, CORS, timeouts) is left to the caller.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .with_state(state)
}
