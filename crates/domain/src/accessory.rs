//! Doorbell accessory: the configured bridge between bus channels and one
//! exposed accessory.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, ValidationError};
use crate::group_address::GroupAddress;
use crate::id::AccessoryId;
use crate::press::PressKind;

/// Manufacturer reported when none is configured.
pub const DEFAULT_MANUFACTURER: &str = "knxbell";

/// Model reported for every doorbell accessory.
pub const DEFAULT_MODEL: &str = "KNX Doorbell";

/// One bus input channel feeding a doorbell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySignal {
    pub channel: PressKind,
    pub address: GroupAddress,
    pub enabled: bool,
}

impl BinarySignal {
    /// An enabled signal.
    #[must_use]
    pub fn new(channel: PressKind, address: GroupAddress) -> Self {
        Self {
            channel,
            address,
            enabled: true,
        }
    }
}

/// Identification block exposed alongside the accessory's services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
}

/// A doorbell: a mandatory single-press channel plus optional double- and
/// long-press channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doorbell {
    pub id: AccessoryId,
    pub information: AccessoryInformation,
    pub signals: Vec<BinarySignal>,
}

impl Doorbell {
    /// Create a builder for constructing a [`Doorbell`].
    #[must_use]
    pub fn builder() -> DoorbellBuilder {
        DoorbellBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.information.name
    }

    /// The signal configured for `channel`, enabled or not.
    #[must_use]
    pub fn signal(&self, channel: PressKind) -> Option<&BinarySignal> {
        self.signals.iter().find(|sig| sig.channel == channel)
    }

    /// Every address this doorbell listens on.
    pub fn addresses(&self) -> impl Iterator<Item = GroupAddress> + '_ {
        self.signals
            .iter()
            .filter(|sig| sig.enabled)
            .map(|sig| sig.address)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when the name is empty or no
    /// single-press signal is configured.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.information.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.signal(PressKind::Single).is_none() {
            return Err(ValidationError::MissingSinglePress.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Doorbell`].
#[derive(Debug, Default)]
pub struct DoorbellBuilder {
    name: Option<String>,
    single_press: Option<GroupAddress>,
    double_press: Option<GroupAddress>,
    long_press: Option<GroupAddress>,
    disabled: Vec<PressKind>,
    manufacturer: Option<String>,
}

impl DoorbellBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn single_press(mut self, address: GroupAddress) -> Self {
        self.single_press = Some(address);
        self
    }

    #[must_use]
    pub fn double_press(mut self, address: GroupAddress) -> Self {
        self.double_press = Some(address);
        self
    }

    #[must_use]
    pub fn long_press(mut self, address: GroupAddress) -> Self {
        self.long_press = Some(address);
        self
    }

    /// Keep the channel configured but stop it from producing events.
    #[must_use]
    pub fn disable(mut self, channel: PressKind) -> Self {
        self.disabled.push(channel);
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Consume the builder, validate, and return a [`Doorbell`].
    ///
    /// The id is derived from the name and the single-press address.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if the name or the single-press
    /// address is missing.
    pub fn build(self) -> Result<Doorbell, BridgeError> {
        let name = self.name.unwrap_or_default();
        let single = self.single_press.ok_or(ValidationError::MissingSinglePress)?;
        let id = AccessoryId::derive(&name, &single.to_string());

        let signals = [
            (PressKind::Single, Some(single)),
            (PressKind::Double, self.double_press),
            (PressKind::Long, self.long_press),
        ]
        .into_iter()
        .filter_map(|(channel, address)| {
            address.map(|address| BinarySignal {
                channel,
                address,
                enabled: !self.disabled.contains(&channel),
            })
        })
        .collect();

        let doorbell = Doorbell {
            id,
            information: AccessoryInformation {
                name: name.clone(),
                manufacturer: self
                    .manufacturer
                    .unwrap_or_else(|| DEFAULT_MANUFACTURER.to_string()),
                model: DEFAULT_MODEL.to_string(),
                serial_number: id.to_string(),
                firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
            },
            signals,
        };
        doorbell.validate()?;
        Ok(doorbell)
    }
}
