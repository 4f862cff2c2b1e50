//! # champlain-adapter-virtual
//!
//! Simulated peripherals for running the agent away from the Pi.
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualThermometer`] | `TemperatureSensor` | Sine drift around a base temperature; can be unplugged |
//! | [`VirtualMicrophone`] | `SoundSensor` | Cycles through a fixed pattern of raw samples |
//! | [`VirtualIndicator`] | `IndicatorOutput` | Holds the last written state; can be made to fail |
//!
//! ## Dependency rule
//!
//! Depends on `champlain-app` (port traits) and `champlain-domain` only.

mod devices;

pub use devices::{VirtualIndicator, VirtualMicrophone, VirtualThermometer};

/// One of each simulated device.
#[derive(Debug, Default)]
pub struct VirtualBoard {
    pub thermometer: VirtualThermometer,
    pub microphone: VirtualMicrophone,
    pub indicator: VirtualIndicator,
}

impl VirtualBoard {
    #[must_use]
    pub fn new() -> Self {
        tracing::info!("using virtual hardware");
        Self::default()
    }
}
