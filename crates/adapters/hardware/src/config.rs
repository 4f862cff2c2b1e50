//! Hardware configuration — where the devices live and which pins they use.

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration for the sysfs hardware backend.
///
/// Pin numbers are BCM GPIO numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Directory listing one-wire devices.
    pub w1_devices_dir: PathBuf,
    /// Name prefix of the thermometer family (`28-` for DS18B20).
    pub w1_prefix: String,
    /// Root of the sysfs GPIO interface.
    pub gpio_root: PathBuf,
    /// Pin driving the indicator LED.
    pub indicator_pin: u32,
    /// ADC0832 wiring.
    pub adc: AdcPins,
}

/// ADC0832 serial interface pins and the input channel the microphone is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdcPins {
    /// Chip select (active low).
    pub cs: u32,
    /// Serial clock.
    pub clk: u32,
    /// Bidirectional data line.
    pub dio: u32,
    /// Input channel, 0 or 1.
    pub channel: u8,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            w1_devices_dir: PathBuf::from("/sys/bus/w1/devices"),
            w1_prefix: "28-".to_string(),
            gpio_root: PathBuf::from("/sys/class/gpio"),
            indicator_pin: 5,
            adc: AdcPins::default(),
        }
    }
}

impl Default for AdcPins {
    fn default() -> Self {
        Self {
            cs: 17,
            clk: 18,
            dio: 27,
            channel: 0,
        }
    }
}
