//! History samples: the append-only `(status, time)` log of a contact.

use serde::{Deserialize, Serialize};

use crate::contact::ContactState;
use crate::time::UnixSeconds;

/// One immutable log entry.
///
/// Either field may be absent: such placeholders are kept in the log but
/// skipped by every statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySample {
    /// `true` = open (contact detected), `false` = closed.
    pub status: Option<bool>,
    /// Seconds since the unix epoch.
    pub time: Option<UnixSeconds>,
}

impl HistorySample {
    /// A fully defined sample.
    #[must_use]
    pub fn new(status: bool, time: UnixSeconds) -> Self {
        Self {
            status: Some(status),
            time: Some(time),
        }
    }

    /// The sample recorded for a contact-state write.
    #[must_use]
    pub fn from_contact(state: ContactState, time: UnixSeconds) -> Self {
        Self::new(state.is_open(), time)
    }
}

/// The full log of one accessory as handed out by the history collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Samples in recording order.
    pub samples: Vec<HistorySample>,
    /// Time of the first sample ever recorded, absent for an empty log.
    pub initial_time: Option<UnixSeconds>,
}

impl HistorySnapshot {
    /// Build a snapshot whose initial time is the first defined sample time.
    #[must_use]
    pub fn from_samples(samples: Vec<HistorySample>) -> Self {
        let initial_time = samples.iter().find_map(|sample| sample.time);
        Self {
            samples,
            initial_time,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_record_open_contact_as_true() {
        let sample = HistorySample::from_contact(ContactState::Detected, 42);
        assert_eq!(sample, HistorySample::new(true, 42));
    }

    #[test]
    fn should_take_initial_time_from_first_defined_sample() {
        let snapshot = HistorySnapshot::from_samples(vec![
            HistorySample {
                status: Some(true),
                time: None,
            },
            HistorySample::new(false, 120),
            HistorySample::new(true, 130),
        ]);
        assert_eq!(snapshot.initial_time, Some(120));
    }

    #[test]
    fn should_have_no_initial_time_when_empty() {
        let snapshot = HistorySnapshot::from_samples(Vec::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.initial_time, None);
    }
}
