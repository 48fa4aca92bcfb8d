//! Doorbell service: the live state and use-cases of one accessory.

use std::sync::{PoisonError, RwLock};

use knxbell_domain::accessory::Doorbell;
use knxbell_domain::contact::ContactState;
use knxbell_domain::error::BridgeError;
use knxbell_domain::event::AccessoryEvent;
use knxbell_domain::history::{HistorySample, HistorySnapshot};
use knxbell_domain::id::AccessoryId;
use knxbell_domain::statistics::ContactStatistics;
use knxbell_domain::time::{UnixSeconds, now, unix_seconds};

use crate::ports::{DatapointChange, EventPublisher, HistoryLog};
use crate::services::classifier::{Classification, EventClassifier};

/// Application service owning one doorbell, its contact state and its
/// collaborators.
pub struct DoorbellService<H, P> {
    doorbell: Doorbell,
    classifier: EventClassifier,
    contact: RwLock<ContactState>,
    history: H,
    publisher: P,
}

impl<H: HistoryLog, P: EventPublisher> DoorbellService<H, P> {
    /// Create a service with the contact initially not detected.
    pub fn new(doorbell: Doorbell, history: H, publisher: P) -> Self {
        let classifier = EventClassifier::new(&doorbell);
        Self {
            doorbell,
            classifier,
            contact: RwLock::new(ContactState::default()),
            history,
            publisher,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.doorbell.id
    }

    #[must_use]
    pub fn doorbell(&self) -> &Doorbell {
        &self.doorbell
    }

    /// Whether any enabled channel listens on the change's address.
    #[must_use]
    pub fn listens_to(&self, change: &DatapointChange) -> bool {
        !self.classifier.channels_for(change.address).is_empty()
    }

    /// Classify a bus change for every channel listening on its address.
    ///
    /// Each classification publishes its press (if any), writes the contact
    /// state and appends a history sample. A failed append is logged and
    /// does not abort the classification.
    pub async fn handle_change(&self, change: &DatapointChange) -> Vec<Classification> {
        let mut classifications = Vec::new();
        for channel in self.classifier.channels_for(change.address) {
            let Some(classification) = self.classifier.on_signal_change(channel, change.new_value)
            else {
                continue;
            };

            tracing::info!(
                accessory = %self.doorbell.name(),
                address = %change.address,
                channel = %channel,
                value = change.new_value,
                "signal changed"
            );

            if let Some(press) = classification.press {
                self.publish(AccessoryEvent::pressed(self.doorbell.id, press))
                    .await;
            }

            self.write_contact(classification.contact).await;

            let sample = HistorySample::from_contact(classification.contact, unix_seconds(now()));
            if let Err(err) = self.history.record(self.doorbell.id, sample).await {
                tracing::warn!(
                    accessory = %self.doorbell.name(),
                    error = %err,
                    "failed to record history sample"
                );
            }

            classifications.push(classification);
        }
        classifications
    }

    /// Current live contact state.
    #[must_use]
    pub fn contact_state(&self) -> ContactState {
        *self
            .contact
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the live contact state from outside the bus.
    ///
    /// The write is published but not recorded in the history log.
    pub async fn set_contact_state(&self, state: ContactState) {
        tracing::debug!(accessory = %self.doorbell.name(), %state, "contact overwritten");
        self.write_contact(state).await;
    }

    /// The accessory's full history log.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Storage`] when the log cannot be read.
    pub async fn history(&self) -> Result<HistorySnapshot, BridgeError> {
        self.history.snapshot(self.doorbell.id).await
    }

    /// Derived statistics as of the current time.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Storage`] when the log cannot be read.
    pub async fn statistics(&self) -> Result<ContactStatistics, BridgeError> {
        self.statistics_at(unix_seconds(now())).await
    }

    /// Derived statistics as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Storage`] when the log cannot be read.
    pub async fn statistics_at(&self, now: UnixSeconds) -> Result<ContactStatistics, BridgeError> {
        let snapshot = self.history().await?;
        Ok(ContactStatistics::compute(
            &snapshot,
            self.contact_state().is_open(),
            now,
        ))
    }

    async fn write_contact(&self, state: ContactState) {
        {
            let mut guard = self
                .contact
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = state;
        }
        self.publish(AccessoryEvent::contact_changed(self.doorbell.id, state))
            .await;
    }

    async fn publish(&self, event: AccessoryEvent) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(accessory = %self.doorbell.name(), error = %err, "failed to publish event");
        }
    }
}
