//! MQTT adapter error types.

use std::path::PathBuf;

use champlain_domain::error::ChamplainError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The broker could not be reached or refused the connection.
    #[error("MQTT connection failed")]
    Connection(#[source] rumqttc::ConnectionError),

    /// No CONNACK/SUBACK arrived within the connect timeout.
    #[error("MQTT handshake timed out after {secs}s")]
    HandshakeTimeout {
        /// Configured timeout.
        secs: u16,
    },

    /// The broker rejected the command subscription.
    #[error("subscription to {topic:?} rejected")]
    SubscribeRejected {
        /// Topic that was rejected.
        topic: String,
    },

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// A publish did not reach the client queue in time.
    #[error("MQTT operation timed out after {secs}s")]
    OperationTimeout {
        /// Configured timeout.
        secs: u16,
    },

    /// A TLS certificate or key file could not be read.
    #[error("failed to read TLS file {path:?}")]
    TlsFile {
        /// File that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<MqttError> for ChamplainError {
    fn from(err: MqttError) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_handshake_timeout() {
        let err = MqttError::HandshakeTimeout { secs: 10 };
        assert_eq!(err.to_string(), "MQTT handshake timed out after 10s");
    }

    #[test]
    fn should_display_subscribe_rejected() {
        let err = MqttError::SubscribeRejected {
            topic: "champlain/republish".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "subscription to \"champlain/republish\" rejected"
        );
    }

    #[test]
    fn should_convert_into_transport_error() {
        let err: ChamplainError = MqttError::OperationTimeout { secs: 5 }.into();
        assert!(matches!(err, ChamplainError::Transport(_)));
    }

    #[test]
    fn should_keep_tls_file_source() {
        let err = MqttError::TlsFile {
            path: PathBuf::from("/missing/ca.pem"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
