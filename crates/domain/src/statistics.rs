//! Contact statistics reconstructed from the history log.
//!
//! Nothing here keeps running counters: every value is recomputed from the
//! full sample sequence, so the result is the same after a restart or an
//! edit of the log. Samples with an absent status (or, for durations, an
//! absent time) are transparent.

use serde::{Deserialize, Serialize};

use crate::history::{HistorySample, HistorySnapshot};
use crate::time::UnixSeconds;

/// Number of transitions into the open state.
///
/// A defined status counts when it differs from the previous defined status
/// and the previous one was not open. Consecutive open samples count once.
#[must_use]
pub fn times_opened(samples: &[HistorySample]) -> u32 {
    let mut count = 0;
    let mut prev_status = None;
    for status in samples.iter().filter_map(|sample| sample.status) {
        if Some(status) != prev_status && prev_status != Some(true) {
            count += 1;
        }
        prev_status = Some(status);
    }
    count
}

/// Total seconds spent in intervals that started with an open sample.
#[must_use]
pub fn open_duration(samples: &[HistorySample]) -> UnixSeconds {
    duration_in(samples, true)
}

/// Total seconds spent in intervals that started with a closed sample.
#[must_use]
pub fn closed_duration(samples: &[HistorySample]) -> UnixSeconds {
    duration_in(samples, false)
}

/// Sum of `time - prev_time` over consecutive valid samples whose earlier
/// sample had status `wanted`. Samples missing a status or a time neither
/// contribute nor advance the previous sample.
fn duration_in(samples: &[HistorySample], wanted: bool) -> UnixSeconds {
    let mut duration: UnixSeconds = 0;
    let mut prev: Option<(bool, UnixSeconds)> = None;
    for sample in samples {
        let (Some(status), Some(time)) = (sample.status, sample.time) else {
            continue;
        };
        if let Some((prev_status, prev_time)) = prev
            && prev_status == wanted
        {
            duration = duration.saturating_add(time.saturating_sub(prev_time));
        }
        prev = Some((status, time));
    }
    duration
}

/// Seconds between the start of the log and the last activation.
///
/// * empty log (`initial_time` absent): `0`
/// * contact currently open: `now - initial_time`
/// * otherwise: the time at which the trailing run of closed samples began,
///   relative to `initial_time`
#[must_use]
pub fn last_activation(
    samples: &[HistorySample],
    initial_time: Option<UnixSeconds>,
    contact_open: bool,
    now: UnixSeconds,
) -> UnixSeconds {
    let Some(initial_time) = initial_time else {
        return 0;
    };
    if contact_open {
        return now.saturating_sub(initial_time);
    }

    let mut last = samples.last().and_then(|sample| sample.time);
    for sample in samples.iter().rev() {
        if sample.status != Some(false) {
            break;
        }
        if let Some(time) = sample.time {
            last = Some(time);
        }
    }
    last.map_or(0, |time| time.saturating_sub(initial_time))
}

/// The four derived values exposed for a doorbell contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactStatistics {
    pub times_opened: u32,
    pub open_duration: UnixSeconds,
    pub closed_duration: UnixSeconds,
    pub last_activation: UnixSeconds,
}

impl ContactStatistics {
    /// Compute every statistic from one snapshot of the log.
    #[must_use]
    pub fn compute(snapshot: &HistorySnapshot, contact_open: bool, now: UnixSeconds) -> Self {
        let samples = snapshot.samples.as_slice();
        Self {
            times_opened: times_opened(samples),
            open_duration: open_duration(samples),
            closed_duration: closed_duration(samples),
            last_activation: last_activation(samples, snapshot.initial_time, contact_open, now),
        }
    }
}
