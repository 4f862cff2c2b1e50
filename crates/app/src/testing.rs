//! In-memory port implementations shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use champlain_domain::error::{ChamplainError, SensorError};
use champlain_domain::indicator::IndicatorState;

use crate::ports::{IndicatorOutput, SoundSensor, TelemetrySink, TemperatureSensor};

/// Output recording every accepted write.
#[derive(Default)]
pub(crate) struct RecordingOutput {
    writes: Mutex<Vec<IndicatorState>>,
    failing: AtomicBool,
}

impl RecordingOutput {
    pub(crate) fn writes(&self) -> Vec<IndicatorState> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl IndicatorOutput for RecordingOutput {
    fn write(&self, state: IndicatorState) -> Result<(), ChamplainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChamplainError::Indicator(Box::new(std::io::Error::other(
                "line busy",
            ))));
        }
        self.writes.lock().unwrap().push(state);
        Ok(())
    }
}

fn not_found() -> SensorError {
    SensorError::NotFound {
        prefix: "28-".to_string(),
    }
}

/// Thermometer replaying a fixed script, then reporting "not found".
#[derive(Default)]
pub(crate) struct ScriptedThermometer {
    script: Mutex<VecDeque<Option<f64>>>,
}

impl ScriptedThermometer {
    /// `None` entries simulate a missing device.
    pub(crate) fn new(script: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl TemperatureSensor for ScriptedThermometer {
    async fn read_celsius(&self) -> Result<f64, SensorError> {
        let next = self.script.lock().unwrap().pop_front().flatten();
        next.ok_or_else(not_found)
    }
}

/// Microphone replaying raw samples, then failing.
#[derive(Default)]
pub(crate) struct ScriptedMicrophone {
    script: Mutex<VecDeque<u8>>,
}

impl ScriptedMicrophone {
    pub(crate) fn new(script: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl SoundSensor for ScriptedMicrophone {
    async fn read_raw(&self) -> Result<u8, SensorError> {
        let next = self.script.lock().unwrap().pop_front();
        next.ok_or_else(|| SensorError::Driver(Box::new(std::io::Error::other("adc offline"))))
    }
}

/// Sink keeping every published payload.
#[derive(Default)]
pub(crate) struct RecordingSink {
    published: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingSink {
    pub(crate) fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl TelemetrySink for RecordingSink {
    async fn publish(&self, payload: String) -> Result<(), ChamplainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChamplainError::Transport(Box::new(std::io::Error::other(
                "not connected",
            ))));
        }
        self.published.lock().unwrap().push(payload);
        Ok(())
    }
}
