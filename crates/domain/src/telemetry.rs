//! Telemetry message — the outbound payload combining both readings.

use serde::{Deserialize, Serialize};

/// Outbound telemetry payload.
///
/// Serialized as a flat JSON object `{"temperature": <number>, "volume": <integer>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    /// Temperature in °C.
    pub temperature: f64,
    /// Sound level, 0 (quiet) to 255 (loud).
    #[serde(rename = "volume")]
    pub sound_level: u8,
}

impl TelemetryMessage {
    #[must_use]
    pub fn new(temperature: f64, sound_level: u8) -> Self {
        Self {
            temperature,
            sound_level,
        }
    }

    /// Serialize to the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature is not finite (JSON has no NaN).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        if !self.temperature.is_finite() {
            return Err(serde::ser::Error::custom("temperature must be finite"));
        }
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_with_volume_key() {
        let msg = TelemetryMessage::new(22.5, 215);
        assert_eq!(msg.to_json().unwrap(), r#"{"temperature":22.5,"volume":215}"#);
    }

    #[test]
    fn should_roundtrip_without_precision_loss() {
        let msg = TelemetryMessage::new(23.456, 128);
        let json = msg.to_json().unwrap();
        let parsed: TelemetryMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn should_contain_exactly_two_fields() {
        let msg = TelemetryMessage::new(-3.0, 0);
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("temperature"));
        assert!(obj.contains_key("volume"));
    }

    #[test]
    fn should_reject_non_finite_temperature() {
        let msg = TelemetryMessage::new(f64::NAN, 10);
        assert!(msg.to_json().is_err());
    }
}
