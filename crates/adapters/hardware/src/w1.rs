//! DS18B20 thermometer on the one-wire bus.
//!
//! The kernel `w1_therm` driver exposes each device as a directory named
//! `<family>-<serial>` containing a `w1_slave` file:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```
//!
//! The first line carries the CRC verdict, the second the temperature in
//! thousandths of a degree.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use champlain_app::ports::TemperatureSensor;
use champlain_domain::error::{MalformedReading, SensorError};
use champlain_domain::reading::celsius_from_millidegrees;

/// Reads the first one-wire device whose name matches a prefix.
#[derive(Debug, Clone)]
pub struct OneWireThermometer {
    devices_dir: PathBuf,
    prefix: String,
}

impl OneWireThermometer {
    #[must_use]
    pub fn new(devices_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            devices_dir: devices_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// First matching device directory, in name order.
    async fn find_device(&self) -> Result<PathBuf, SensorError> {
        let mut entries = match tokio::fs::read_dir(&self.devices_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(self.not_found()),
            Err(err) => return Err(SensorError::Driver(Box::new(err))),
        };

        let mut matches = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| SensorError::Driver(Box::new(err)))?
        {
            if entry.file_name().to_string_lossy().starts_with(&self.prefix) {
                matches.push(entry.path());
            }
        }
        matches.sort();
        matches.into_iter().next().ok_or_else(|| self.not_found())
    }

    fn not_found(&self) -> SensorError {
        SensorError::NotFound {
            prefix: self.prefix.clone(),
        }
    }
}

impl TemperatureSensor for OneWireThermometer {
    async fn read_celsius(&self) -> Result<f64, SensorError> {
        let device = self.find_device().await?;
        let text = tokio::fs::read_to_string(device.join("w1_slave"))
            .await
            .map_err(|err| SensorError::Driver(Box::new(err)))?;
        let celsius = parse_w1_slave(&text).map_err(SensorError::Malformed)?;
        tracing::debug!(device = %device_name(&device), celsius, "one-wire read");
        Ok(celsius)
    }
}

fn device_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the content of a `w1_slave` file into °C.
///
/// # Errors
///
/// Returns [`MalformedReading`] if the text has fewer than two lines, the
/// CRC verdict is not `YES`, or the `t=` field is missing or not an integer.
pub fn parse_w1_slave(text: &str) -> Result<f64, MalformedReading> {
    let mut lines = text.lines();
    let (Some(crc_line), Some(data_line)) = (lines.next(), lines.next()) else {
        return Err(MalformedReading::MissingLines {
            expected: 2,
            actual: text.lines().count(),
        });
    };

    if !crc_line.trim_end().ends_with("YES") {
        return Err(MalformedReading::CrcFailed);
    }

    let raw = data_line
        .split_whitespace()
        .find_map(|field| field.strip_prefix("t="))
        .ok_or(MalformedReading::MissingField("t="))?;
    let milli: i32 = raw
        .parse()
        .map_err(|_| MalformedReading::InvalidValue(raw.to_string()))?;
    Ok(celsius_from_millidegrees(milli))
}
