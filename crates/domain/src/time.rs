//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for event times and sample recording.
pub type Timestamp = DateTime<Utc>;

/// Seconds since the unix epoch, the resolution of the history log.
pub type UnixSeconds = i64;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole seconds since the epoch, rounded towards negative infinity.
#[must_use]
pub fn unix_seconds(ts: Timestamp) -> UnixSeconds {
    ts.timestamp()
}
