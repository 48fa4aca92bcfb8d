//! Custom characteristic descriptors.
//!
//! The history-derived values are published as Eve contact-sensor
//! characteristics. They are declared as data and handed to the exposure
//! layer, which owns their protocol encoding.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statistics::ContactStatistics;

/// Wire format of a characteristic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Uint32,
}

/// Access permission of a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perm {
    Read,
    Write,
    Notify,
}

/// Unit of a characteristic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Seconds,
}

/// Which derived statistic a descriptor publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    TimesOpened,
    OpenDuration,
    ClosedDuration,
    LastActivation,
}

/// A custom characteristic declared as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacteristicDescriptor {
    pub name: &'static str,
    pub uuid: Uuid,
    pub format: Format,
    pub perms: &'static [Perm],
    pub unit: Option<Unit>,
    pub statistic: Statistic,
}

pub const TIMES_OPENED: CharacteristicDescriptor = CharacteristicDescriptor {
    name: "Times Opened",
    uuid: Uuid::from_u128(0xE863_F129_079E_48FF_8F27_9C26_05A2_9F52),
    format: Format::Uint32,
    perms: &[Perm::Read, Perm::Notify],
    unit: None,
    statistic: Statistic::TimesOpened,
};

pub const OPEN_DURATION: CharacteristicDescriptor = CharacteristicDescriptor {
    name: "Open Duration",
    uuid: Uuid::from_u128(0xE863_F118_079E_48FF_8F27_9C26_05A2_9F52),
    format: Format::Uint32,
    perms: &[Perm::Read, Perm::Notify, Perm::Write],
    unit: Some(Unit::Seconds),
    statistic: Statistic::OpenDuration,
};

pub const CLOSED_DURATION: CharacteristicDescriptor = CharacteristicDescriptor {
    name: "Closed Duration",
    uuid: Uuid::from_u128(0xE863_F119_079E_48FF_8F27_9C26_05A2_9F52),
    format: Format::Uint32,
    perms: &[Perm::Read, Perm::Notify, Perm::Write],
    unit: Some(Unit::Seconds),
    statistic: Statistic::ClosedDuration,
};

pub const LAST_ACTIVATION: CharacteristicDescriptor = CharacteristicDescriptor {
    name: "Last Activation",
    uuid: Uuid::from_u128(0xE863_F11A_079E_48FF_8F27_9C26_05A2_9F52),
    format: Format::Uint32,
    perms: &[Perm::Read, Perm::Notify],
    unit: Some(Unit::Seconds),
    statistic: Statistic::LastActivation,
};

/// Every custom characteristic a doorbell registers.
pub const CUSTOM_CHARACTERISTICS: [CharacteristicDescriptor; 4] =
    [TIMES_OPENED, OPEN_DURATION, CLOSED_DURATION, LAST_ACTIVATION];

impl CharacteristicDescriptor {
    /// The value this characteristic reports for `stats`, clamped to `UINT32`.
    #[must_use]
    pub fn value(&self, stats: &ContactStatistics) -> u32 {
        match self.statistic {
            Statistic::TimesOpened => stats.times_opened,
            Statistic::OpenDuration => clamp_u32(stats.open_duration),
            Statistic::ClosedDuration => clamp_u32(stats.closed_duration),
            Statistic::LastActivation => clamp_u32(stats.last_activation),
        }
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_eve_uuids() {
        assert_eq!(
            TIMES_OPENED.uuid.to_string().to_uppercase(),
            "E863F129-079E-48FF-8F27-9C2605A29F52"
        );
        assert_eq!(
            LAST_ACTIVATION.uuid.to_string().to_uppercase(),
            "E863F11A-079E-48FF-8F27-9C2605A29F52"
        );
    }

    #[test]
    fn should_declare_durations_in_seconds() {
        for descriptor in [OPEN_DURATION, CLOSED_DURATION, LAST_ACTIVATION] {
            assert_eq!(descriptor.unit, Some(Unit::Seconds));
        }
        assert_eq!(TIMES_OPENED.unit, None);
    }

    #[test]
    fn should_allow_writes_only_on_duration_counters() {
        let writable: Vec<_> = CUSTOM_CHARACTERISTICS
            .iter()
            .filter(|d| d.perms.contains(&Perm::Write))
            .map(|d| d.name)
            .collect();
        assert_eq!(writable, vec!["Open Duration", "Closed Duration"]);
    }

    #[test]
    fn should_pick_matching_statistic_value() {
        let stats = ContactStatistics {
            times_opened: 3,
            open_duration: 20,
            closed_duration: 40,
            last_activation: 60,
        };
        let values: Vec<u32> = CUSTOM_CHARACTERISTICS
            .iter()
            .map(|d| d.value(&stats))
            .collect();
        assert_eq!(values, vec![3, 20, 40, 60]);
    }

    #[test]
    fn should_clamp_negative_and_oversized_values() {
        let stats = ContactStatistics {
            times_opened: 0,
            open_duration: -5,
            closed_duration: i64::from(u32::MAX) + 10,
            last_activation: 0,
        };
        assert_eq!(OPEN_DURATION.value(&stats), 0);
        assert_eq!(CLOSED_DURATION.value(&stats), u32::MAX);
    }
}
