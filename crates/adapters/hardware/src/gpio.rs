//! GPIO lines through the Linux sysfs interface.
//!
//! [`GpioPin::open`] exports the pin and [`Drop`] unexports it, so a pin is
//! released on every exit path, including a panic unwinding through its
//! owner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HardwareError;

/// Attempts to wait for udev to create the pin directory after export.
const EXPORT_ATTEMPTS: u32 = 20;
const EXPORT_POLL: Duration = Duration::from_millis(10);

/// Data direction of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    /// Output, initially driven low.
    OutLow,
}

/// A single digital line.
pub trait Line: Send {
    /// Switch the line between input and output.
    ///
    /// # Errors
    ///
    /// Returns a [`HardwareError`] when the driver rejects the change.
    fn set_direction(&mut self, direction: Direction) -> Result<(), HardwareError>;

    /// Drive an output line.
    ///
    /// # Errors
    ///
    /// Returns a [`HardwareError`] when the driver rejects the write.
    fn write(&mut self, high: bool) -> Result<(), HardwareError>;

    /// Sample the line level.
    ///
    /// # Errors
    ///
    /// Returns a [`HardwareError`] when the level cannot be read.
    fn read(&mut self) -> Result<bool, HardwareError>;
}

/// An exported sysfs GPIO pin.
#[derive(Debug)]
pub struct GpioPin {
    root: PathBuf,
    pin: u32,
    dir: PathBuf,
}

impl GpioPin {
    /// Export `pin` under `root` (normally `/sys/class/gpio`) and configure
    /// its direction.
    ///
    /// An already exported pin is reused.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ExportTimeout`] if the pin directory never
    /// appears, or [`HardwareError::Gpio`] if a sysfs file cannot be written.
    pub fn open(root: &Path, pin: u32, direction: Direction) -> Result<Self, HardwareError> {
        let dir = root.join(format!("gpio{pin}"));

        if !dir.exists() {
            let export = root.join("export");
            std::fs::write(&export, pin.to_string()).map_err(|source| HardwareError::Gpio {
                pin,
                path: export,
                source,
            })?;
        }

        let mut ready = false;
        for _ in 0..EXPORT_ATTEMPTS {
            if dir.join("direction").exists() {
                ready = true;
                break;
            }
            std::thread::sleep(EXPORT_POLL);
        }
        if !ready {
            return Err(HardwareError::ExportTimeout { pin });
        }

        let mut gpio = Self {
            root: root.to_path_buf(),
            pin,
            dir,
        };
        gpio.set_direction(direction)?;
        tracing::debug!(pin, ?direction, "GPIO exported");
        Ok(gpio)
    }

    /// BCM pin number.
    #[must_use]
    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn write_attr(&self, attr: &str, value: &str) -> Result<(), HardwareError> {
        let path = self.dir.join(attr);
        std::fs::write(&path, value).map_err(|source| HardwareError::Gpio {
            pin: self.pin,
            path,
            source,
        })
    }
}

impl Line for GpioPin {
    fn set_direction(&mut self, direction: Direction) -> Result<(), HardwareError> {
        let value = match direction {
            Direction::In => "in",
            // "low" sets the direction and the initial level atomically.
            Direction::OutLow => "low",
        };
        self.write_attr("direction", value)
    }

    fn write(&mut self, high: bool) -> Result<(), HardwareError> {
        self.write_attr("value", if high { "1" } else { "0" })
    }

    fn read(&mut self) -> Result<bool, HardwareError> {
        let path = self.dir.join("value");
        let raw = std::fs::read_to_string(&path).map_err(|source| HardwareError::Gpio {
            pin: self.pin,
            path,
            source,
        })?;
        match raw.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(HardwareError::InvalidValue {
                pin: self.pin,
                value: other.to_string(),
            }),
        }
    }
}

impl Drop for GpioPin {
    fn drop(&mut self) {
        let unexport = self.root.join("unexport");
        if let Err(err) = std::fs::write(&unexport, self.pin.to_string()) {
            tracing::warn!(pin = self.pin, %err, "failed to unexport GPIO");
        } else {
            tracing::debug!(pin = self.pin, "GPIO unexported");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSysfs;

    #[test]
    fn should_export_and_configure_output_low() {
        let sysfs = FakeSysfs::new("gpio-export");
        sysfs.add_pin(5);

        let pin = GpioPin::open(sysfs.gpio_root(), 5, Direction::OutLow).unwrap();
        assert_eq!(pin.pin(), 5);
        assert_eq!(sysfs.direction(5), "low");
    }

    #[test]
    fn should_write_levels() {
        let sysfs = FakeSysfs::new("gpio-write");
        sysfs.add_pin(5);
        let mut pin = GpioPin::open(sysfs.gpio_root(), 5, Direction::OutLow).unwrap();

        pin.write(true).unwrap();
        assert_eq!(sysfs.value(5), "1");
        pin.write(false).unwrap();
        assert_eq!(sysfs.value(5), "0");
    }

    #[test]
    fn should_read_levels() {
        let sysfs = FakeSysfs::new("gpio-read");
        sysfs.add_pin(27);
        let mut pin = GpioPin::open(sysfs.gpio_root(), 27, Direction::In).unwrap();

        sysfs.set_value(27, "1\n");
        assert!(pin.read().unwrap());
        sysfs.set_value(27, "0\n");
        assert!(!pin.read().unwrap());
    }

    #[test]
    fn should_reject_garbage_value() {
        let sysfs = FakeSysfs::new("gpio-garbage");
        sysfs.add_pin(27);
        let mut pin = GpioPin::open(sysfs.gpio_root(), 27, Direction::In).unwrap();

        sysfs.set_value(27, "x");
        assert!(matches!(
            pin.read(),
            Err(HardwareError::InvalidValue { pin: 27, .. })
        ));
    }

    #[test]
    fn should_unexport_on_drop() {
        let sysfs = FakeSysfs::new("gpio-drop");
        sysfs.add_pin(17);
        let pin = GpioPin::open(sysfs.gpio_root(), 17, Direction::OutLow).unwrap();
        drop(pin);
        assert_eq!(sysfs.unexported(), "17");
    }

    #[test]
    fn should_time_out_when_pin_never_appears() {
        let sysfs = FakeSysfs::new("gpio-missing");
        let result = GpioPin::open(sysfs.gpio_root(), 99, Direction::In);
        assert!(matches!(result, Err(HardwareError::ExportTimeout { pin: 99 })));
        assert_eq!(sysfs.exported(), "99");
    }
}
