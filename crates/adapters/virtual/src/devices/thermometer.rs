//! Virtual thermometer — a slow sine wave around a base temperature.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use champlain_app::ports::TemperatureSensor;
use champlain_domain::error::SensorError;

/// Simulated DS18B20.
///
/// Each read advances one step along the wave. Values are rounded to the
/// real sensor's 0.001 °C resolution.
#[derive(Debug)]
pub struct VirtualThermometer {
    base: f64,
    amplitude: f64,
    period_steps: u32,
    step: AtomicU32,
    connected: AtomicBool,
}

impl Default for VirtualThermometer {
    /// Swings between 22 and 26 °C, crossing the indicator threshold.
    fn default() -> Self {
        Self::new(24.0, 2.0, 12)
    }
}

impl VirtualThermometer {
    /// A period of zero is treated as one step (a constant reading).
    #[must_use]
    pub fn new(base: f64, amplitude: f64, period_steps: u32) -> Self {
        Self {
            base,
            amplitude,
            period_steps: period_steps.max(1),
            step: AtomicU32::new(0),
            connected: AtomicBool::new(true),
        }
    }

    /// Simulate the sensor being unplugged (`false`) or plugged back in.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn value_at(&self, step: u32) -> f64 {
        let phase = f64::from(step % self.period_steps) / f64::from(self.period_steps);
        let celsius = self.base + self.amplitude * (TAU * phase).sin();
        (celsius * 1000.0).round() / 1000.0
    }
}

impl TemperatureSensor for VirtualThermometer {
    async fn read_celsius(&self) -> Result<f64, SensorError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(SensorError::NotFound {
                prefix: "virtual".to_string(),
            });
        }
        let step = self.step.fetch_add(1, Ordering::Relaxed);
        Ok(self.value_at(step))
    }
}
