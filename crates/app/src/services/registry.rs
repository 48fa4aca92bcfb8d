//! Doorbell registry: owns every accessory and routes bus changes to them.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use knxbell_domain::accessory::Doorbell;
use knxbell_domain::error::{BridgeError, NotFoundError, ValidationError};
use knxbell_domain::group_address::GroupAddress;
use knxbell_domain::id::AccessoryId;

use crate::ports::{DatapointChange, EventPublisher, HistoryLog};
use crate::services::classifier::Classification;
use crate::services::doorbell_service::DoorbellService;

/// Every configured doorbell, each with its own service.
pub struct DoorbellRegistry<H, P> {
    services: Vec<DoorbellService<H, P>>,
}

impl<H, P> DoorbellRegistry<H, P>
where
    H: HistoryLog + Clone,
    P: EventPublisher + Clone,
{
    /// Create a registry sharing one history log and one publisher between
    /// all doorbells.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if a doorbell fails its invariants
    /// or two doorbells derive the same id.
    pub fn new(doorbells: Vec<Doorbell>, history: H, publisher: P) -> Result<Self, BridgeError> {
        let mut seen = HashSet::with_capacity(doorbells.len());
        let mut services = Vec::with_capacity(doorbells.len());
        for doorbell in doorbells {
            doorbell.validate()?;
            if !seen.insert(doorbell.id) {
                return Err(ValidationError::DuplicateAccessory(doorbell.name().to_string()).into());
            }
            tracing::info!(
                accessory = %doorbell.name(),
                id = %doorbell.id,
                "registered doorbell"
            );
            services.push(DoorbellService::new(
                doorbell,
                history.clone(),
                publisher.clone(),
            ));
        }
        Ok(Self { services })
    }
}

impl<H: HistoryLog, P: EventPublisher> DoorbellRegistry<H, P> {
    /// Look up a doorbell service by accessory id.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no doorbell has `id`.
    pub fn get(&self, id: AccessoryId) -> Result<&DoorbellService<H, P>, BridgeError> {
        self.services
            .iter()
            .find(|service| service.id() == id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Accessory",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// All doorbell services in configuration order.
    #[must_use]
    pub fn list(&self) -> &[DoorbellService<H, P>] {
        &self.services
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Every distinct group address some doorbell listens on.
    #[must_use]
    pub fn addresses(&self) -> Vec<GroupAddress> {
        let mut addresses: Vec<GroupAddress> = Vec::new();
        for address in self
            .services
            .iter()
            .flat_map(|service| service.doorbell().addresses())
        {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }
        addresses
    }

    /// Route one change to every doorbell listening on its address.
    pub async fn dispatch(&self, change: &DatapointChange) -> Vec<(AccessoryId, Classification)> {
        let mut handled = Vec::new();
        for service in &self.services {
            for classification in service.handle_change(change).await {
                handled.push((service.id(), classification));
            }
        }
        if handled.is_empty() {
            tracing::trace!(address = %change.address, "change on unwatched address");
        }
        handled
    }
}

impl<H, P> DoorbellRegistry<H, P>
where
    H: HistoryLog + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Run the dispatch loop on a bus subscription.
    ///
    /// Changes are handled one at a time in arrival order. The task ends when
    /// the bus closes; abort the handle to stop it earlier.
    pub fn spawn(self: Arc<Self>, mut rx: broadcast::Receiver<DatapointChange>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        self.dispatch(&change).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "dispatch lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("bus closed, stopping dispatch");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use knxbell_domain::contact::ContactState;
    use knxbell_domain::press::PressKind;

    use super::*;
    use crate::services::doorbell_service::tests::{FakeHistory, FakePublisher, change, ga};

    fn doorbell(name: &str, single: &str) -> Doorbell {
        Doorbell::builder()
            .name(name)
            .single_press(ga(single))
            .build()
            .unwrap()
    }

    fn registry(
        doorbells: Vec<Doorbell>,
    ) -> Result<DoorbellRegistry<Arc<FakeHistory>, Arc<FakePublisher>>, BridgeError> {
        DoorbellRegistry::new(
            doorbells,
            Arc::new(FakeHistory::default()),
            Arc::new(FakePublisher::default()),
        )
    }

    #[test]
    fn should_reject_duplicate_accessories() {
        let result = registry(vec![
            doorbell("Front Door", "1/0/1"),
            doorbell("Front Door", "1/0/1"),
        ]);
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::DuplicateAccessory(_)))
        ));
    }

    #[test]
    fn should_find_registered_doorbell() {
        let front = doorbell("Front Door", "1/0/1");
        let id = front.id;
        let registry = registry(vec![front]).unwrap();
        assert_eq!(registry.get(id).unwrap().doorbell().name(), "Front Door");
    }

    #[test]
    fn should_return_not_found_for_unknown_id() {
        let registry = registry(vec![doorbell("Front Door", "1/0/1")]).unwrap();
        assert!(matches!(
            registry.get(AccessoryId::new()),
            Err(BridgeError::NotFound(_))
        ));
    }

    #[test]
    fn should_list_distinct_addresses() {
        let registry = registry(vec![
            doorbell("Front Door", "1/0/1"),
            doorbell("Garden Gate", "1/0/1"),
            doorbell("Back Door", "1/0/4"),
        ])
        .unwrap();
        assert_eq!(registry.addresses(), vec![ga("1/0/1"), ga("1/0/4")]);
    }

    #[tokio::test]
    async fn should_dispatch_shared_address_to_every_listener() {
        let front = doorbell("Front Door", "1/0/1");
        let gate = doorbell("Garden Gate", "1/0/1");
        let back = doorbell("Back Door", "1/0/4");
        let (front_id, gate_id, back_id) = (front.id, gate.id, back.id);
        let registry = registry(vec![front, gate, back]).unwrap();

        let handled = registry.dispatch(&change("1/0/1", true)).await;

        let ids: Vec<AccessoryId> = handled.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![front_id, gate_id]);
        assert!(
            handled
                .iter()
                .all(|(_, c)| c.press == Some(PressKind::Single))
        );
        assert_eq!(
            registry.get(back_id).unwrap().contact_state(),
            ContactState::NotDetected
        );
    }

    #[tokio::test]
    async fn should_ignore_unwatched_address() {
        let registry = registry(vec![doorbell("Front Door", "1/0/1")]).unwrap();
        assert!(registry.dispatch(&change("5/5/5", true)).await.is_empty());
    }

    #[tokio::test]
    async fn should_process_bus_changes_until_closed() {
        let front = doorbell("Front Door", "1/0/1");
        let id = front.id;
        let registry = Arc::new(registry(vec![front]).unwrap());
        let (tx, rx) = broadcast::channel(8);

        let handle = registry.clone().spawn(rx);
        tx.send(change("1/0/1", true)).unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            registry.get(id).unwrap().contact_state(),
            ContactState::Detected
        );
    }
}
