//! Temperature sampler — keeps `SensorReadings::temperature` fresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use champlain_domain::error::SensorError;

use crate::ports::TemperatureSensor;
use crate::readings::SensorReadings;
use crate::services::run_periodic;
use crate::shutdown::Shutdown;

/// Periodically reads a [`TemperatureSensor`] into the shared readings.
pub struct TemperatureSampler<S> {
    sensor: S,
    readings: Arc<SensorReadings>,
    interval: Duration,
}

impl<S: TemperatureSensor + 'static> TemperatureSampler<S> {
    /// Create a sampler writing into `readings` every `interval`.
    pub fn new(sensor: S, readings: Arc<SensorReadings>, interval: Duration) -> Self {
        Self {
            sensor,
            readings,
            interval,
        }
    }

    /// Spawn the sampling loop on the current runtime.
    pub fn start(self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Sample every interval until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) {
        let this = &self;
        run_periodic("temperature_sampler", self.interval, shutdown, move || async move {
            // Failures are already logged; the previous value stays in place.
            let _ = this.sample_once().await;
        })
        .await;
    }

    /// Take one reading and store it.
    ///
    /// On failure the stored temperature is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`SensorError`] reported by the sensor.
    pub async fn sample_once(&self) -> Result<f64, SensorError> {
        match self.sensor.read_celsius().await {
            Ok(celsius) => {
                self.readings.set_temperature(celsius);
                tracing::info!(temperature = celsius, "temperature sampled");
                Ok(celsius)
            }
            Err(err) => {
                tracing::warn!(%err, "temperature read failed, keeping previous value");
                Err(err)
            }
        }
    }
}
