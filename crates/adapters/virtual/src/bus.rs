//! Virtual bus: an in-process group-address bus.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use knxbell_app::ports::{BusTransport, DatapointChange};
use knxbell_domain::error::BridgeError;
use knxbell_domain::group_address::GroupAddress;

use crate::error::BusError;

const DEFAULT_CAPACITY: usize = 64;

struct Inner {
    sender: Option<broadcast::Sender<DatapointChange>>,
    values: HashMap<GroupAddress, bool>,
}

/// In-process bus holding the current value of every written address.
///
/// A write emits a [`DatapointChange`] to all subscribers only when the
/// value differs from the current one, or on the first write to an address.
pub struct VirtualBus {
    inner: Mutex<Inner>,
}

impl Default for VirtualBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl VirtualBus {
    /// Create a bus whose subscribers buffer up to `capacity` changes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Mutex::new(Inner {
                sender: Some(sender),
                values: HashMap::new(),
            }),
        }
    }

    /// Current value of `address`, `None` if never written.
    #[must_use]
    pub fn value(&self, address: GroupAddress) -> Option<bool> {
        self.lock().values.get(&address).copied()
    }

    /// Close the bus: subscribers see the end of their stream and further
    /// writes fail.
    pub fn shutdown(&self) {
        if self.lock().sender.take().is_some() {
            tracing::info!("virtual bus shut down");
        }
    }

    fn apply(&self, address: GroupAddress, value: bool) -> Result<(), BusError> {
        let mut inner = self.lock();
        let Some(sender) = inner.sender.clone() else {
            return Err(BusError::ShutDown);
        };
        let old_value = inner.values.insert(address, value);
        if old_value == Some(value) {
            tracing::trace!(%address, value, "group write without change");
            return Ok(());
        }
        drop(inner);

        tracing::debug!(%address, ?old_value, value, "group value changed");
        // no subscribers is not an error
        let _ = sender.send(DatapointChange {
            address,
            old_value,
            new_value: value,
        });
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusTransport for VirtualBus {
    fn subscribe(&self) -> broadcast::Receiver<DatapointChange> {
        match &self.lock().sender {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    fn write(
        &self,
        address: GroupAddress,
        value: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let result = self.apply(address, value).map_err(BridgeError::from);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ga(s: &str) -> GroupAddress {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn should_emit_change_on_first_write() {
        let bus = VirtualBus::default();
        let mut rx = bus.subscribe();

        bus.write(ga("1/0/1"), false).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            DatapointChange {
                address: ga("1/0/1"),
                old_value: None,
                new_value: false,
            }
        );
        assert_eq!(bus.value(ga("1/0/1")), Some(false));
    }

    #[tokio::test]
    async fn should_not_emit_when_value_is_unchanged() {
        let bus = VirtualBus::default();
        let mut rx = bus.subscribe();

        bus.write(ga("1/0/1"), true).await.unwrap();
        bus.write(ga("1/0/1"), true).await.unwrap();
        bus.write(ga("1/0/1"), false).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.new_value);
        assert_eq!(second.old_value, Some(true));
        assert!(!second.new_value);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_fan_out_to_every_subscriber() {
        let bus = VirtualBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.write(ga("2/1/0"), true).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().address, ga("2/1/0"));
        assert_eq!(rx2.recv().await.unwrap().address, ga("2/1/0"));
    }

    #[tokio::test]
    async fn should_accept_writes_without_subscribers() {
        let bus = VirtualBus::default();
        assert!(bus.write(ga("1/0/1"), true).await.is_ok());
    }

    #[tokio::test]
    async fn should_close_subscriptions_on_shutdown() {
        let bus = VirtualBus::default();
        let mut rx = bus.subscribe();

        bus.shutdown();

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
        assert!(matches!(
            bus.subscribe().recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test]
    async fn should_reject_writes_after_shutdown() {
        let bus = VirtualBus::default();
        bus.shutdown();
        let result = bus.write(ga("1/0/1"), true).await;
        assert!(matches!(result, Err(BridgeError::Transport(_))));
    }
}
