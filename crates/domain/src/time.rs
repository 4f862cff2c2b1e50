//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp recorded alongside each stored reading.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Age of `ts` relative to `reference`, clamped at zero.
#[must_use]
pub fn age(ts: Timestamp, reference: Timestamp) -> std::time::Duration {
    (reference - ts).to_std().unwrap_or_default()
}
