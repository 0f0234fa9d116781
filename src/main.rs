//! hotel-pricing-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hotel_pricing_gateway::app_state::AppState;
use hotel_pricing_gateway::config::GatewayConfig;
use hotel_pricing_gateway::persistence::{
    MemoryProfileStore, PostgresProfileStore, ProfileStore,
};
use hotel_pricing_gateway::upstream::{BillingClient, PricingClient};

const DRAFT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting hotel-pricing-gateway");

    // Build persistence layer
    let store: Arc<dyn ProfileStore> = if config.persistence_enabled {
        Arc::new(
            PostgresProfileStore::connect(&config)
                .await
                .context("connecting profile store")?,
        )
    } else {
        tracing::warn!("persistence disabled, profiles are kept in memory");
        Arc::new(MemoryProfileStore::new())
    };

    // Build upstream clients
    let pricing = Arc::new(
        PricingClient::new(config.pricing_api_base_url.clone(), config.upstream_timeout())
            .context("building pricing client")?,
    );
    let billing = Arc::new(
        BillingClient::new(config.billing_api_base_url.clone(), config.upstream_timeout())
            .context("building billing client")?,
    );
    tracing::info!(
        pricing = %config.pricing_api_base_url,
        billing = %config.billing_api_base_url,
        "upstream clients ready"
    );

    // Build application state and router
    let app_state = AppState::new(&config, store, pricing, billing);

    // Drop drafts nobody finished
    let profiles = Arc::clone(&app_state.profile_service);
    let draft_ttl = config.draft_ttl();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(DRAFT_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            profiles.sweep_idle_drafts(draft_ttl).await;
        }
    });

    let request_timeout = config.upstream_timeout().saturating_mul(2);
    let app = hotel_pricing_gateway::app(app_state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
