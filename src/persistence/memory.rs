//! In-memory profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProfileStore;
use crate::domain::{UserId, UserProfile};
use crate::error::GatewayError;

/// Profile store kept in a `RwLock<HashMap>`; contents vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given profiles.
    #[must_use]
    pub fn with_profiles<I: IntoIterator<Item = UserProfile>>(profiles: I) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn fetch(&self, user_id: UserId) -> Result<Option<UserProfile>, GatewayError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_fetch() {
        let store = MemoryProfileStore::new();
        let mut profile = UserProfile::new(UserId::new());
        profile.hotel_name = Some("Harbor Hotel".to_string());

        tokio_test::assert_ok!(store.save(&profile).await);

        let Ok(Some(fetched)) = store.fetch(profile.id).await else {
            panic!("profile should exist");
        };
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let id = UserId::new();
        let store = MemoryProfileStore::with_profiles([UserProfile::new(id)]);

        let mut first = UserProfile::new(id);
        first.favorite_hotels = vec!["A".to_string()];
        let mut second = UserProfile::new(id);
        second.favorite_hotels = vec!["B".to_string()];

        tokio_test::assert_ok!(store.save(&first).await);
        tokio_test::assert_ok!(store.save(&second).await);

        let Ok(Some(fetched)) = store.fetch(id).await else {
            panic!("profile should exist");
        };
        assert_eq!(fetched.favorite_hotels, vec!["B".to_string()]);
    }

    #[test]
    fn unknown_user_is_none() {
        let store = MemoryProfileStore::new();
        let fetched = tokio_test::block_on(store.fetch(UserId::new()));
        assert!(matches!(fetched, Ok(None)));
    }
}
