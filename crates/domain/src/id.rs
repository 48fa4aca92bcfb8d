//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Doorbell`](crate::accessory::Doorbell).
    AccessoryId
);

define_id!(
    /// Unique identifier for an [`AccessoryEvent`](crate::event::AccessoryEvent).
    EventId
);

/// Prefix mixed into every derived accessory id.
pub const ACCESSORY_ID_PREFIX: &str = "knxbell";

impl AccessoryId {
    /// Derive a stable id from the accessory name and its single-press address.
    ///
    /// The same configuration always yields the same id, so the history log
    /// keyed by it survives restarts.
    #[must_use]
    pub fn derive(name: &str, single_press: &str) -> Self {
        let seed = format!("{ACCESSORY_ID_PREFIX}-{name}-{single_press}");
        Self(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, seed.as_bytes()))
    }
}
