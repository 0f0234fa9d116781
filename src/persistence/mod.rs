//! Persistence layer: the `users` profile store.
//!
//! [`ProfileStore`] is the seam between the services and storage. The
//! PostgreSQL implementation backs production; the in-memory one is used
//! when persistence is disabled and in tests.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};
use crate::error::GatewayError;

pub use memory::MemoryProfileStore;
pub use postgres::PostgresProfileStore;

/// Read/write access to profile rows.
///
/// Writes replace the whole row; there is no version check, so concurrent
/// read-modify-write cycles resolve as last write wins.
#[async_trait]
pub trait ProfileStore: Send + Sync + fmt::Debug {
    /// Loads a profile, `None` when the user has no row yet.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn fetch(&self, user_id: UserId) -> Result<Option<UserProfile>, GatewayError>;

    /// Inserts or replaces a profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn save(&self, profile: &UserProfile) -> Result<(), GatewayError>;
}
