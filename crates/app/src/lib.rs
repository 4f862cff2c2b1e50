//! # champlain-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `TemperatureSensor` — one thermometer read per call
//!   - `SoundSensor` — one raw microphone ADC sample per call
//!   - `IndicatorOutput` — drive the indicator line high or low
//!   - `TelemetrySink` — publish a serialized telemetry payload
//! - Own the **shared state**: latest [`readings::SensorReadings`] and the
//!   [`indicator::IndicatorController`]
//! - Provide the concurrent **services**: two samplers, the publisher, and
//!   the command handler, each a cancellable task
//! - Wire them together in [`agent`] behind a single shutdown signal
//!
//! ## Dependency rule
//! Depends on `champlain-domain` only (plus `tokio` for tasks, channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod agent;
pub mod indicator;
pub mod ports;
pub mod readings;
pub mod services;
pub mod shutdown;

#[cfg(test)]
mod testing;
