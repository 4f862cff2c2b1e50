//! Configuration loading — TOML file with environment variable overrides.
//!
//! Reads `champlain.toml` from the working directory, or the file named by
//! `CHAMPLAIN_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use champlain_adapter_hardware::HardwareConfig;
use champlain_adapter_mqtt::MqttConfig;
use champlain_app::agent::Intervals;
use serde::Deserialize;

const DEFAULT_PATH: &str = "champlain.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection and topics.
    pub mqtt: MqttConfig,
    /// Loop cadences.
    pub sampling: SamplingConfig,
    /// Which devices to drive and where they are wired.
    pub hardware: HardwareSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Seconds between iterations of each clocked task.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature_secs: u64,
    pub sound_secs: u64,
    pub publish_secs: u64,
}

/// The `[hardware]` table: a backend selector plus the sysfs wiring.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HardwareSection {
    pub backend: Backend,
    #[serde(flatten)]
    pub gpio: HardwareConfig,
}

/// Device backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Raspberry Pi peripherals through sysfs.
    #[default]
    Gpio,
    /// Simulated devices.
    Virtual,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, an
    /// override is unusable, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CHAMPLAIN_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides looked up through `var`, which is `std::env::var` in
    /// production.
    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("CHAMPLAIN_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = var("CHAMPLAIN_MQTT_PORT") {
            self.mqtt.broker_port = val.parse().map_err(|_| {
                ConfigError::Validation(format!("CHAMPLAIN_MQTT_PORT is not a port: {val:?}"))
            })?;
        }
        if let Some(val) = var("CHAMPLAIN_MQTT_CLIENT_ID") {
            self.mqtt.client_id = val;
        }
        if let Some(val) = var("CHAMPLAIN_MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = var("CHAMPLAIN_MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }
        if let Some(val) = var("CHAMPLAIN_HARDWARE") {
            self.hardware.backend = val.parse()?;
        }
        if let Some(val) = var("CHAMPLAIN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mqtt = &self.mqtt;
        if mqtt.broker_port == 0 {
            return Err(invalid("mqtt.broker_port must be non-zero"));
        }
        if mqtt.broker_host.is_empty() {
            return Err(invalid("mqtt.broker_host must not be empty"));
        }
        if mqtt.client_id.is_empty() {
            return Err(invalid("mqtt.client_id must not be empty"));
        }
        if mqtt.telemetry_topic.is_empty() || mqtt.command_topic.is_empty() {
            return Err(invalid("mqtt topics must not be empty"));
        }
        if mqtt.queue_capacity == 0 {
            return Err(invalid("mqtt.queue_capacity must be non-zero"));
        }
        if mqtt.connect_timeout_secs == 0 {
            return Err(invalid("mqtt.connect_timeout_secs must be non-zero"));
        }
        let half_client_auth = mqtt
            .tls
            .as_ref()
            .is_some_and(|tls| tls.client_cert_path.is_some() != tls.client_key_path.is_some());
        if half_client_auth {
            return Err(invalid(
                "mqtt.tls.client_cert_path and client_key_path must be set together",
            ));
        }

        let sampling = &self.sampling;
        if sampling.temperature_secs == 0 || sampling.sound_secs == 0 || sampling.publish_secs == 0
        {
            return Err(invalid("sampling intervals must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Validation(reason.to_string())
}

impl SamplingConfig {
    #[must_use]
    pub fn intervals(&self) -> Intervals {
        Intervals {
            temperature: Duration::from_secs(self.temperature_secs),
            sound: Duration::from_secs(self.sound_secs),
            publish: Duration::from_secs(self.publish_secs),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature_secs: 5,
            sound_secs: 5,
            publish_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "champlaind=info,champlain=info,rumqttc=warn".to_string(),
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gpio" => Ok(Self::Gpio),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown hardware backend {other:?} (expected \"gpio\" or \"virtual\")"
            ))),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
