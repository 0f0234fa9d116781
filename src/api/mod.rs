//! REST API layer: route handlers, DTOs, session extraction, and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and
//! `/config/client` sit at the root. With the `swagger-ui` feature the
//! OpenAPI document is served at `/api-docs/openapi.json` and browsable at
//! `/swagger-ui`.

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod session;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}
