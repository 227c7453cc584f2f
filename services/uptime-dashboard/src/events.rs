//! Dashboard event bus
//!
//! Views publish after a successful mutation and subscribed views refetch.
//! Every subscriber sees events in publish order.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Something other views may need to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Services were created or deleted; lists should refetch
    ServicesChanged,
    /// A service's notification preference was saved or removed
    NotificationsChanged { service_id: String },
    /// A request came back 401 and the token was cleared; show the login view
    SessionExpired,
}

/// Broadcast hub for [`DashboardEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers, returning how many received it
    pub fn publish(&self, event: DashboardEvent) -> usize {
        tracing::debug!("Publishing {:?}", event);
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(DashboardEvent::ServicesChanged), 0);
    }

    #[tokio::test]
    async fn subscribers_see_publish_order() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DashboardEvent::ServicesChanged);
        bus.publish(DashboardEvent::NotificationsChanged {
            service_id: "svc-1".to_string(),
        });

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.unwrap(), DashboardEvent::ServicesChanged);
            assert_eq!(
                rx.recv().await.unwrap(),
                DashboardEvent::NotificationsChanged {
                    service_id: "svc-1".to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::default();
        bus.publish(DashboardEvent::ServicesChanged);
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
