//! Contact state: the open/closed view of the doorbell button.

use serde::{Deserialize, Serialize};

/// How long a press is meant to look like a contact event, in milliseconds.
///
/// Published for consumers of the contact state. No suppression window is
/// enforced on the incoming signals.
pub const CONTACT_TIME_MS: u64 = 1000;

/// Live contact state of a doorbell.
///
/// `Detected` is the "open" state: it is logged as `status = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactState {
    Detected,
    #[default]
    NotDetected,
}

impl ContactState {
    /// The state a binary signal value maps to.
    #[must_use]
    pub fn from_signal(value: bool) -> Self {
        if value {
            Self::Detected
        } else {
            Self::NotDetected
        }
    }

    /// Whether this state counts as open in the history log.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Detected)
    }

    /// Value of the `ContactSensorState` characteristic.
    #[must_use]
    pub fn sensor_value(self) -> u8 {
        match self {
            Self::Detected => 0,
            Self::NotDetected => 1,
        }
    }
}

impl std::fmt::Display for ContactState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detected => f.write_str("detected"),
            Self::NotDetected => f.write_str("not_detected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_rising_signal_to_detected() {
        assert_eq!(ContactState::from_signal(true), ContactState::Detected);
        assert_eq!(ContactState::from_signal(false), ContactState::NotDetected);
    }

    #[test]
    fn should_default_to_not_detected() {
        assert_eq!(ContactState::default(), ContactState::NotDetected);
        assert!(!ContactState::default().is_open());
    }

    #[test]
    fn should_reject_unknown_state_name() {
        let result = serde_json::from_str::<ContactState>("\"ajar\"");
        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_snake_case() {
        let json = serde_json::to_string(&ContactState::NotDetected).unwrap();
        assert_eq!(json, "\"not_detected\"");
    }
}
