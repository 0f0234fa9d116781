//! Per-connection subscription manager.
//!
//! Tracks which users a WebSocket client follows and provides server-side
//! event filtering. A connection may only follow its own session user.

use std::collections::HashSet;

use crate::domain::UserId;

/// Manages the set of followed users for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    owner: Option<UserId>,
    user_ids: HashSet<UserId>,
}

impl SubscriptionManager {
    /// Creates a manager for a connection opened by `owner`. The owner is
    /// followed from the start.
    #[must_use]
    pub fn new(owner: Option<UserId>) -> Self {
        Self {
            owner,
            user_ids: owner.into_iter().collect(),
        }
    }

    /// Follows the given users. Returns the ids that were accepted; ids
    /// other than the owner's are refused.
    pub fn subscribe(&mut self, ids: &[UserId]) -> Vec<UserId> {
        let accepted: Vec<UserId> = ids
            .iter()
            .copied()
            .filter(|id| Some(*id) == self.owner)
            .collect();
        self.user_ids.extend(accepted.iter().copied());
        accepted
    }

    /// Stops following the given users.
    pub fn unsubscribe(&mut self, ids: &[UserId]) {
        for id in ids {
            self.user_ids.remove(id);
        }
    }

    /// Returns `true` if events for `user_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, user_id: UserId) -> bool {
        self.user_ids.contains(&user_id)
    }

    /// Returns the number of followed users.
    #[must_use]
    pub fn count(&self) -> usize {
        self.user_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_follows_nothing() {
        let mut mgr = SubscriptionManager::new(None);
        assert!(mgr.subscribe(&[UserId::new()]).is_empty());
        assert_eq!(mgr.count(), 0);
    }

    #[test]
    fn owner_is_followed_by_default() {
        let id = UserId::new();
        let mgr = SubscriptionManager::new(Some(id));
        assert!(mgr.matches(id));
        assert!(!mgr.matches(UserId::new()));
    }

    #[test]
    fn other_users_are_refused() {
        let id = UserId::new();
        let other = UserId::new();
        let mut mgr = SubscriptionManager::new(Some(id));
        let accepted = mgr.subscribe(&[id, other]);
        assert_eq!(accepted, vec![id]);
        assert!(!mgr.matches(other));
    }

    #[test]
    fn unsubscribe_then_resubscribe() {
        let id = UserId::new();
        let mut mgr = SubscriptionManager::new(Some(id));
        mgr.unsubscribe(&[id]);
        assert!(!mgr.matches(id));
        mgr.subscribe(&[id]);
        assert!(mgr.matches(id));
    }
}
