//! # champlain-domain
//!
//! Pure domain model for the champlain telemetry agent.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **readings** (temperature in °C, sound level 0–255)
//! - Define the outbound **telemetry message** and its wire format
//! - Define the inbound **command message** and its parse result
//! - Define the **indicator** state and the threshold rule that drives it
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod indicator;
pub mod reading;
pub mod telemetry;
