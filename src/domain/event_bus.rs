//! Profile-change fan-out.
//!
//! Every profile write publishes a [`DashboardEvent`]; each WebSocket
//! connection holds a receiver and keeps the events of the user it follows.
//! Nothing is buffered for users without a connection.

use tokio::sync::broadcast;

use super::DashboardEvent;

/// Channel capacity used when none is configured.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1_024;

/// Broadcast bus for [`DashboardEvent`]s.
///
/// Lagging receivers lose the oldest events; a client that lags re-polls
/// the gate.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUS_CAPACITY)
    }
}

impl EventBus {
    /// Creates a bus holding up to `capacity` undelivered events per
    /// receiver. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            tracing::warn!("event bus capacity 0 is invalid, using 1");
        }
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Effective channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Publishes an event and returns how many connections got it.
    /// Without connections the event is dropped.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        let user_id = event.user_id();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(%user_id, delivered, "dashboard event published");
        delivered
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::Utc;

    fn make_event(user_id: UserId) -> DashboardEvent {
        DashboardEvent::FavoritesChanged {
            user_id,
            favorite_hotels: vec!["Grand Hotel".to_string()],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(make_event(UserId::new())), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let id = UserId::new();
        bus.publish(make_event(id));

        let Ok(event) = rx.recv().await else {
            panic!("expected to receive event");
        };
        assert_eq!(event.user_id(), id);
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(make_event(UserId::new())), 2);

        let (Ok(e1), Ok(e2)) = (rx1.recv().await, rx2.recv().await) else {
            panic!("both receivers should get the event");
        };
        assert_eq!(e1.user_id(), e2.user_id());
    }

    #[tokio::test]
    async fn zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        assert_eq!(bus.capacity(), 1);

        let mut rx = bus.subscribe();
        let id = UserId::new();
        assert_eq!(bus.publish(make_event(id)), 1);
        let Ok(event) = rx.recv().await else {
            panic!("event should be delivered");
        };
        assert_eq!(event.user_id(), id);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(16);
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
