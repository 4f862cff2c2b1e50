//! Hardware adapter error types.

use std::path::PathBuf;

use champlain_domain::error::{ChamplainError, SensorError};

/// Errors specific to the sysfs hardware adapter.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// A sysfs GPIO file could not be read or written.
    #[error("GPIO {pin}: failed to access {path:?}")]
    Gpio {
        /// BCM pin number.
        pin: u32,
        /// File that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pin did not show up after export.
    #[error("GPIO {pin} not available after export")]
    ExportTimeout {
        /// BCM pin number.
        pin: u32,
    },

    /// A value file held something other than `0` or `1`.
    #[error("GPIO {pin}: unexpected value {value:?}")]
    InvalidValue {
        /// BCM pin number.
        pin: u32,
        /// Raw file content.
        value: String,
    },

    /// The ADC0832 only has channels 0 and 1.
    #[error("ADC channel {0} out of range (0 or 1)")]
    InvalidChannel(u8),

    /// The blocking ADC task panicked or was cancelled.
    #[error("ADC read task failed")]
    Task(#[source] tokio::task::JoinError),
}

impl From<HardwareError> for ChamplainError {
    fn from(err: HardwareError) -> Self {
        Self::Hardware(Box::new(err))
    }
}

impl From<HardwareError> for SensorError {
    fn from(err: HardwareError) -> Self {
        Self::Driver(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_channel() {
        assert_eq!(
            HardwareError::InvalidChannel(3).to_string(),
            "ADC channel 3 out of range (0 or 1)"
        );
    }

    #[test]
    fn should_display_invalid_value() {
        let err = HardwareError::InvalidValue {
            pin: 27,
            value: "x".to_string(),
        };
        assert_eq!(err.to_string(), "GPIO 27: unexpected value \"x\"");
    }

    #[test]
    fn should_convert_into_hardware_error() {
        let err: ChamplainError = HardwareError::ExportTimeout { pin: 5 }.into();
        assert!(matches!(err, ChamplainError::Hardware(_)));
    }

    #[test]
    fn should_convert_into_sensor_driver_error() {
        let err: SensorError = HardwareError::ExportTimeout { pin: 18 }.into();
        assert!(matches!(err, SensorError::Driver(_)));
    }
}
