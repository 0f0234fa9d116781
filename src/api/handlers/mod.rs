//! REST endpoint handlers organized by resource.

pub mod billing;
pub mod dashboard;
pub mod gate;
pub mod onboarding;
pub mod prediction;
pub mod profile;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(gate::routes())
        .merge(profile::routes())
        .merge(onboarding::routes())
        .merge(dashboard::routes())
        .merge(prediction::routes())
        .merge(billing::routes())
}
