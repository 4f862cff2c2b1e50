//! Latest-value store shared between the samplers and the publisher.
//!
//! Each field sits behind its own mutex so the two samplers never contend.
//! A reader sees either "never sampled" or a complete earlier write; there
//! is no cross-field consistency between temperature and sound level.

use std::sync::{Mutex, MutexGuard, PoisonError};

use champlain_domain::reading::Reading;
use champlain_domain::telemetry::TelemetryMessage;

/// Most recent value of each sensor.
#[derive(Debug, Default)]
pub struct SensorReadings {
    temperature: Mutex<Option<Reading<f64>>>,
    sound_level: Mutex<Option<Reading<u8>>>,
}

impl SensorReadings {
    /// Create an empty store (no field sampled yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored temperature.
    pub fn set_temperature(&self, celsius: f64) {
        *lock(&self.temperature) = Some(Reading::now(celsius));
    }

    /// Replace the stored sound level.
    pub fn set_sound_level(&self, level: u8) {
        *lock(&self.sound_level) = Some(Reading::now(level));
    }

    #[must_use]
    pub fn temperature(&self) -> Option<Reading<f64>> {
        *lock(&self.temperature)
    }

    #[must_use]
    pub fn sound_level(&self) -> Option<Reading<u8>> {
        *lock(&self.sound_level)
    }

    /// Copy both fields out, one lock at a time.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            temperature: self.temperature(),
            sound_level: self.sound_level(),
        }
    }
}

/// Point-in-time copy of [`SensorReadings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub temperature: Option<Reading<f64>>,
    pub sound_level: Option<Reading<u8>>,
}

impl Snapshot {
    /// Build the outbound message, or `None` while either field is still empty.
    #[must_use]
    pub fn to_message(&self) -> Option<TelemetryMessage> {
        let temperature = self.temperature?;
        let sound_level = self.sound_level?;
        Some(TelemetryMessage::new(temperature.value, sound_level.value))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
