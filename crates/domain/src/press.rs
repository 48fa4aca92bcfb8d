//! Press classification: which kind of doorbell press a channel reports.

use serde::{Deserialize, Serialize};

/// The kind of press a bus channel stands for.
///
/// Every configured channel is dedicated to exactly one kind; the bus device
/// does the timing, the bridge only forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressKind {
    Single,
    Double,
    Long,
}

impl PressKind {
    /// Value of the `ProgrammableSwitchEvent` characteristic for this press.
    #[must_use]
    pub fn switch_event_value(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::Double => 1,
            Self::Long => 2,
        }
    }
}

impl std::fmt::Display for PressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
            Self::Long => f.write_str("long"),
        }
    }
}
