//! In-memory onboarding drafts with per-user locking.
//!
//! [`DraftRegistry`] keeps one [`OnboardingDraft`] per user in a `HashMap`
//! where each entry is individually protected by a [`tokio::sync::RwLock`],
//! so map clicks from different users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::UserId;
use super::onboarding_draft::OnboardingDraft;

/// Store of unsaved onboarding drafts.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<OnboardingDraft>>` for per-user locking. Drafts live until
/// onboarding is saved or [`DraftRegistry::remove_idle`] sweeps them.
#[derive(Debug, Default)]
pub struct DraftRegistry {
    drafts: RwLock<HashMap<UserId, Arc<RwLock<OnboardingDraft>>>>,
}

impl DraftRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's draft, creating it with `init` when absent.
    pub async fn get_or_insert_with<F>(&self, user_id: UserId, init: F) -> Arc<RwLock<OnboardingDraft>>
    where
        F: FnOnce() -> OnboardingDraft,
    {
        if let Some(existing) = self.drafts.read().await.get(&user_id) {
            return Arc::clone(existing);
        }
        let mut map = self.drafts.write().await;
        Arc::clone(
            map.entry(user_id)
                .or_insert_with(|| Arc::new(RwLock::new(init()))),
        )
    }

    /// Returns the user's draft if one exists.
    pub async fn get(&self, user_id: UserId) -> Option<Arc<RwLock<OnboardingDraft>>> {
        self.drafts.read().await.get(&user_id).map(Arc::clone)
    }

    /// Drops the user's draft, returning a snapshot of it.
    pub async fn remove(&self, user_id: UserId) -> Option<OnboardingDraft> {
        let arc = self.drafts.write().await.remove(&user_id)?;
        let draft = arc.read().await.clone();
        Some(draft)
    }

    /// Drops every draft last edited before `cutoff`. Drafts whose lock is
    /// held by an in-flight edit are kept. Returns how many were dropped.
    pub async fn remove_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut map = self.drafts.write().await;
        let before = map.len();
        map.retain(|_, draft| {
            draft
                .try_read()
                .map_or(true, |guard| !guard.idle_since(cutoff))
        });
        before - map.len()
    }

    /// Number of open drafts.
    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    /// Returns `true` if no draft is open.
    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}
