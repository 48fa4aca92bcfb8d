//! Accessory events: immutable records of classified bus activity.

use serde::{Deserialize, Serialize};

use crate::contact::ContactState;
use crate::id::{AccessoryId, EventId};
use crate::press::PressKind;
use crate::time::{Timestamp, now};

/// What happened on an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A programmable-switch event.
    Pressed { press: PressKind },
    /// The live contact state was written.
    ContactChanged { state: ContactState },
}

/// An event published on the in-process bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryEvent {
    pub id: EventId,
    pub accessory_id: AccessoryId,
    pub kind: EventKind,
    pub timestamp: Timestamp,
}

impl AccessoryEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(accessory_id: AccessoryId, kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            accessory_id,
            kind,
            timestamp: now(),
        }
    }

    #[must_use]
    pub fn pressed(accessory_id: AccessoryId, press: PressKind) -> Self {
        Self::new(accessory_id, EventKind::Pressed { press })
    }

    #[must_use]
    pub fn contact_changed(accessory_id: AccessoryId, state: ContactState) -> Self {
        Self::new(accessory_id, EventKind::ContactChanged { state })
    }
}
