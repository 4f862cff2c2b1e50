//! Command message — the inbound payload that drives the indicator.

use serde::Deserialize;

use crate::indicator::IndicatorState;

/// Inbound command payload.
///
/// Only `temperature` is interpreted; any other field is ignored. A missing
/// or `null` temperature is valid and means "no change".
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct CommandMessage {
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Why an inbound payload could not be turned into a [`CommandMessage`].
#[derive(Debug, thiserror::Error)]
pub enum CommandParseError {
    /// The payload bytes are not UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The payload is valid JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// The payload is not JSON, or a field has the wrong type.
    #[error("payload is not a valid command: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandMessage {
    /// Parse a raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError`] when the payload is not UTF-8, not a
    /// JSON object, or carries a non-numeric `temperature`.
    pub fn parse(payload: &[u8]) -> Result<Self, CommandParseError> {
        let text = std::str::from_utf8(payload)?;
        // A derived struct would also accept a positional array.
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(CommandParseError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The indicator state this command asks for, if any.
    #[must_use]
    pub fn requested_state(&self) -> Option<IndicatorState> {
        self.temperature.map(IndicatorState::for_temperature)
    }
}
