//! PostgreSQL implementation of the profile store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::ProfileStore;
use crate::config::GatewayConfig;
use crate::domain::{UserId, UserProfile};
use crate::error::GatewayError;

type ProfileRow = (
    Uuid,
    Option<String>,
    bool,
    bool,
    Option<DateTime<Utc>>,
    Option<String>,
    Option<String>,
    Option<String>,
    Vec<String>,
    Vec<String>,
);

/// PostgreSQL-backed profile store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from the configuration and applies
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        tracing::info!(
            max_connections = config.database_max_connections,
            "profile store connected"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn fetch(&self, user_id: UserId) -> Result<Option<UserProfile>, GatewayError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, email, is_initialized, is_subscribed, subscription_end_date, \
             hotel_name, hotel_address, region, competitor_hotels, favorite_hotels \
             FROM users WHERE id = $1",
        )
        .bind(*user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row.map(
            |(
                id,
                email,
                is_initialized,
                is_subscribed,
                subscription_end_date,
                hotel_name,
                hotel_address,
                region,
                competitor_hotels,
                favorite_hotels,
            )| UserProfile {
                id: UserId::from_uuid(id),
                email,
                is_initialized,
                is_subscribed,
                subscription_end_date,
                hotel_name,
                hotel_address,
                region,
                competitor_hotels,
                favorite_hotels,
            },
        ))
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO users (id, email, is_initialized, is_subscribed, subscription_end_date, \
             hotel_name, hotel_address, region, competitor_hotels, favorite_hotels, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now()) \
             ON CONFLICT (id) DO UPDATE SET \
             email = EXCLUDED.email, \
             is_initialized = EXCLUDED.is_initialized, \
             is_subscribed = EXCLUDED.is_subscribed, \
             subscription_end_date = EXCLUDED.subscription_end_date, \
             hotel_name = EXCLUDED.hotel_name, \
             hotel_address = EXCLUDED.hotel_address, \
             region = EXCLUDED.region, \
             competitor_hotels = EXCLUDED.competitor_hotels, \
             favorite_hotels = EXCLUDED.favorite_hotels, \
             updated_at = now()",
        )
        .bind(*profile.id.as_uuid())
        .bind(&profile.email)
        .bind(profile.is_initialized)
        .bind(profile.is_subscribed)
        .bind(profile.subscription_end_date)
        .bind(&profile.hotel_name)
        .bind(&profile.hotel_address)
        .bind(&profile.region)
        .bind(&profile.competitor_hotels)
        .bind(&profile.favorite_hotels)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        tracing::debug!(user_id = %profile.id, "profile saved");
        Ok(())
    }
}
