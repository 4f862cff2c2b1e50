//! Sensor readings — the values the samplers store and the publisher reads.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// A single stored sample together with the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading<T> {
    pub value: T,
    pub sampled_at: Timestamp,
}

impl<T> Reading<T> {
    /// Stamp `value` with the current time.
    #[must_use]
    pub fn now(value: T) -> Self {
        Self {
            value,
            sampled_at: now(),
        }
    }
}

/// Convert a one-wire thermometer value (thousandths of a degree) into °C.
#[must_use]
pub fn celsius_from_millidegrees(milli: i32) -> f64 {
    f64::from(milli) / 1000.0
}

/// Derive the sound level from a raw microphone ADC sample.
///
/// The microphone module has inverted polarity: a higher raw voltage means
/// a quieter room, so the level is `255 - raw`.
#[must_use]
pub fn sound_level_from_raw(raw: u8) -> u8 {
    u8::MAX - raw
}
