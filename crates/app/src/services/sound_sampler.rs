//! Sound sampler — keeps `SensorReadings::sound_level` fresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use champlain_domain::error::SensorError;
use champlain_domain::reading::sound_level_from_raw;

use crate::ports::SoundSensor;
use crate::readings::SensorReadings;
use crate::services::run_periodic;
use crate::shutdown::Shutdown;

/// Periodically samples a [`SoundSensor`] and stores the derived level.
pub struct SoundSampler<S> {
    sensor: S,
    readings: Arc<SensorReadings>,
    interval: Duration,
}

impl<S: SoundSensor + 'static> SoundSampler<S> {
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
        run_periodic("sound_sampler", self.interval, shutdown, move || async move {
            let _ = this.sample_once().await;
        })
        .await;
    }

    /// Take one raw sample, derive the level (`255 - raw`) and store it.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the stored level is left untouched.
    pub async fn sample_once(&self) -> Result<u8, SensorError> {
        match self.sensor.read_raw().await {
            Ok(raw) => {
                let level = sound_level_from_raw(raw);
                self.readings.set_sound_level(level);
                tracing::info!(raw, volume = level, "sound level sampled");
                Ok(level)
            }
            Err(err) => {
                tracing::warn!(%err, "sound read failed, keeping previous value");
                Err(err)
            }
        }
    }
}
