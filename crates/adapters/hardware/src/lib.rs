//! # champlain-adapter-hardware
//!
//! Raspberry Pi peripherals through Linux sysfs.
//!
//! | Device | Port | Interface |
//! |--------|------|-----------|
//! | DS18B20 thermometer | [`TemperatureSensor`] | `/sys/bus/w1/devices/28-*/w1_slave` |
//! | Microphone on ADC0832 | [`SoundSensor`] | three GPIO lines, bit-banged |
//! | Indicator LED | [`IndicatorOutput`] | one GPIO output line |
//!
//! Every GPIO pin is unexported when its owner is dropped.
//!
//! ## Dependency rule
//!
//! Depends on `champlain-app` (port traits) and `champlain-domain` only.
//!
//! [`TemperatureSensor`]: champlain_app::ports::TemperatureSensor
//! [`SoundSensor`]: champlain_app::ports::SoundSensor
//! [`IndicatorOutput`]: champlain_app::ports::IndicatorOutput

mod adc0832;
mod config;
mod error;
pub mod gpio;
mod indicator;
mod w1;

#[cfg(test)]
mod testing;

pub use adc0832::{Adc0832, AdcMicrophone};
pub use config::{AdcPins, HardwareConfig};
pub use error::HardwareError;
pub use indicator::GpioIndicator;
pub use w1::{OneWireThermometer, parse_w1_slave};

use gpio::{Direction, GpioPin};

/// The devices wired to the board.
#[derive(Debug)]
pub struct Board {
    pub thermometer: OneWireThermometer,
    pub microphone: AdcMicrophone<GpioPin>,
    pub indicator: GpioIndicator<GpioPin>,
}

impl Board {
    /// Claim every pin named in `config`.
    ///
    /// The indicator pin comes up driven low. Pins claimed before a failure
    /// are released again.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError`] if a pin cannot be exported or configured,
    /// or the ADC channel is out of range.
    pub fn open(config: &HardwareConfig) -> Result<Self, HardwareError> {
        let root = config.gpio_root.as_path();
        let indicator = GpioPin::open(root, config.indicator_pin, Direction::OutLow)?;

        let pins = config.adc;
        let adc = Adc0832::new(
            GpioPin::open(root, pins.cs, Direction::OutLow)?,
            GpioPin::open(root, pins.clk, Direction::OutLow)?,
            GpioPin::open(root, pins.dio, Direction::OutLow)?,
            pins.channel,
        )?;

        tracing::info!(
            indicator_pin = config.indicator_pin,
            cs = pins.cs,
            clk = pins.clk,
            dio = pins.dio,
            channel = pins.channel,
            w1_dir = %config.w1_devices_dir.display(),
            "hardware ready"
        );

        Ok(Self {
            thermometer: OneWireThermometer::new(&config.w1_devices_dir, &config.w1_prefix),
            microphone: AdcMicrophone::new(adc),
            indicator: GpioIndicator::new(indicator),
        })
    }
}
