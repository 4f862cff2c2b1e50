//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ChamplainError`] at port boundaries. Adapter errors are boxed into the
//! `Transport` / `Hardware` variants so the core never names adapter types.

use std::error::Error as StdError;

/// Boxed error originating from an adapter.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ChamplainError {
    /// A sensor could not produce a reading this time.
    #[error("sensor read failed")]
    Sensor(#[from] SensorError),

    /// The indicator output could not be driven.
    #[error("indicator write failed")]
    Indicator(#[source] BoxError),

    /// The messaging transport failed (connect, publish, subscribe).
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// Hardware initialisation or release failed.
    #[error("hardware error")]
    Hardware(#[source] BoxError),
}

/// Why a sensor read produced no value.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// No device matching the expected name prefix was found.
    #[error("no sensor found matching prefix {prefix:?}")]
    NotFound {
        /// Device name prefix that was searched for.
        prefix: String,
    },

    /// The device answered, but with content that could not be parsed.
    #[error("malformed sensor data: {0}")]
    Malformed(#[source] MalformedReading),

    /// The underlying driver failed.
    #[error("sensor driver failure")]
    Driver(#[source] BoxError),
}

/// Details about an unusable raw reading.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MalformedReading {
    /// The data is shorter than the expected frame.
    #[error("expected {expected} lines, got {actual}")]
    MissingLines {
        /// Lines required.
        expected: usize,
        /// Lines present.
        actual: usize,
    },

    /// The device reported a failed CRC check.
    #[error("CRC check failed")]
    CrcFailed,

    /// The value field is absent.
    #[error("missing `{0}` field")]
    MissingField(&'static str),

    /// The value field is present but not a number.
    #[error("invalid value {0:?}")]
    InvalidValue(String),

    /// Two redundant copies of the same sample disagree.
    #[error("redundant samples disagree ({first} != {second})")]
    Mismatch {
        /// First copy.
        first: u8,
        /// Second copy.
        second: u8,
    },
}
