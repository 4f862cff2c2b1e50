//! MQTT transport configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic the telemetry payloads are published on.
    pub telemetry_topic: String,
    /// Topic the indicator commands arrive on.
    pub command_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// How long to wait for CONNACK/SUBACK at startup, in seconds.
    pub connect_timeout_secs: u16,
    /// How long a single publish may wait for the client queue, in seconds.
    pub operation_timeout_secs: u16,
    /// Capacity of the inbound command queue.
    pub queue_capacity: usize,
    /// Optional username.
    pub username: Option<String>,
    /// Optional password (only used together with `username`).
    pub password: Option<String>,
    /// Optional TLS settings; plain TCP when absent.
    pub tls: Option<TlsConfig>,
}

/// TLS settings, including optional client-certificate authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// PEM file with the root CA used to verify the broker.
    pub ca_path: PathBuf,
    /// PEM client certificate for mutual TLS.
    pub client_cert_path: Option<PathBuf>,
    /// PEM private key matching `client_cert_path`.
    pub client_key_path: Option<PathBuf>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "champlain".to_string(),
            telemetry_topic: "champlain/telemetry".to_string(),
            command_topic: "champlain/republish".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 10,
            operation_timeout_secs: 5,
            queue_capacity: 32,
            username: None,
            password: None,
            tls: None,
        }
    }
}

impl MqttConfig {
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.operation_timeout_secs))
    }
}

impl TlsConfig {
    /// Whether client-certificate authentication is fully configured.
    #[must_use]
    pub fn has_client_auth(&self) -> bool {
        self.client_cert_path.is_some() && self.client_key_path.is_some()
    }
}
