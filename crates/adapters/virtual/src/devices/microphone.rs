//! Virtual microphone — replays raw ADC samples in a loop.

use std::sync::atomic::{AtomicUsize, Ordering};

use champlain_app::ports::SoundSensor;
use champlain_domain::error::SensorError;

/// Raw samples from a quiet room with the odd loud moment. Low raw means loud.
const DEFAULT_PATTERN: [u8; 6] = [250, 245, 238, 180, 120, 240];

/// Simulated microphone on the ADC.
#[derive(Debug)]
pub struct VirtualMicrophone {
    pattern: Vec<u8>,
    cursor: AtomicUsize,
}

impl Default for VirtualMicrophone {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN.to_vec())
    }
}

impl VirtualMicrophone {
    /// An empty pattern reads as silence (raw 255).
    #[must_use]
    pub fn new(pattern: Vec<u8>) -> Self {
        Self {
            pattern,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl SoundSensor for VirtualMicrophone {
    async fn read_raw(&self) -> Result<u8, SensorError> {
        if self.pattern.is_empty() {
            return Ok(u8::MAX);
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.pattern.len();
        Ok(self.pattern[index])
    }
}
