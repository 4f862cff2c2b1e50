//! Sensor ports — one physical read per call.

use std::future::Future;
use std::sync::Arc;

use champlain_domain::error::SensorError;

/// A thermometer reporting degrees Celsius.
pub trait TemperatureSensor: Send + Sync {
    /// Take one reading.
    ///
    /// A failure is transient from the caller's point of view: the sampler
    /// logs it and tries again on the next tick.
    fn read_celsius(&self) -> impl Future<Output = Result<f64, SensorError>> + Send;
}

/// A microphone behind an 8-bit ADC channel.
pub trait SoundSensor: Send + Sync {
    /// Take one raw ADC sample (0–255, inverted polarity).
    fn read_raw(&self) -> impl Future<Output = Result<u8, SensorError>> + Send;
}

impl<T: TemperatureSensor> TemperatureSensor for Arc<T> {
    fn read_celsius(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        (**self).read_celsius()
    }
}

impl<T: SoundSensor> SoundSensor for Arc<T> {
    fn read_raw(&self) -> impl Future<Output = Result<u8, SensorError>> + Send {
        (**self).read_raw()
    }
}
