//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use knxbell_domain::error::BridgeError;
use knxbell_domain::event::AccessoryEvent;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<AccessoryEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AccessoryEvent> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(
        &self,
        event: AccessoryEvent,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        // send only fails when nobody listens
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knxbell_domain::contact::ContactState;
    use knxbell_domain::id::AccessoryId;
    use knxbell_domain::press::PressKind;

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        let event = AccessoryEvent::pressed(AccessoryId::new(), PressKind::Single);
        let event_id = event.id;

        bus.publish(event).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, event_id);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = AccessoryEvent::contact_changed(AccessoryId::new(), ContactState::Detected);
        let event_id = event.id;

        bus.publish(event).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().id, event_id);
        assert_eq!(rx2.recv().await.unwrap().id, event_id);
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        let event = AccessoryEvent::pressed(AccessoryId::new(), PressKind::Long);
        assert!(bus.publish(event).await.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);

        let early = AccessoryEvent::pressed(AccessoryId::new(), PressKind::Single);
        bus.publish(early).await.unwrap();

        let mut rx = bus.subscribe();

        let later = AccessoryEvent::pressed(AccessoryId::new(), PressKind::Double);
        let later_id = later.id;
        bus.publish(later).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().id, later_id);
    }
}
