//! Event bus port: publish/subscribe for accessory events.

use std::future::Future;

use knxbell_domain::error::BridgeError;
use knxbell_domain::event::AccessoryEvent;

/// Publishes accessory events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(
        &self,
        event: AccessoryEvent,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: AccessoryEvent,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(event)
    }
}
