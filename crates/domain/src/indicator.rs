//! Indicator state — the on/off output toggled by remote commands.

use serde::{Deserialize, Serialize};

/// Temperatures strictly above this value switch the indicator on.
pub const TEMPERATURE_THRESHOLD: f64 = 25.0;

/// Discrete state of the indicator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    On,
    #[default]
    Off,
}

impl IndicatorState {
    /// State requested by a command carrying `temperature`.
    ///
    /// The boundary is exclusive: exactly [`TEMPERATURE_THRESHOLD`] is `Off`.
    #[must_use]
    pub fn for_temperature(temperature: f64) -> Self {
        if temperature > TEMPERATURE_THRESHOLD {
            Self::On
        } else {
            Self::Off
        }
    }

    /// Whether the output line should be driven high.
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
