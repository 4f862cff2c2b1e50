//! # champlain-adapter-mqtt
//!
//! MQTT adapter — connects the agent to a broker via `rumqttc`.
//!
//! ## Responsibilities
//! - Connect to the broker (plain TCP or TLS with client certificates)
//! - Fail fast when CONNACK/SUBACK do not arrive within the connect timeout
//! - Subscribe to the command topic at QoS 1 and forward every command
//!   payload into the agent's inbound queue
//! - Publish telemetry payloads at QoS 1 ([`TelemetrySink`])
//! - Disconnect cleanly on shutdown
//!
//! ## Dependency rule
//! Same as other adapters: depends on `champlain-app` and `champlain-domain`.

mod config;
mod error;

pub use config::{MqttConfig, TlsConfig};
pub use error::MqttError;

use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, SubscribeReasonCode,
    TlsConfiguration, Transport,
};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use champlain_app::ports::TelemetrySink;
use champlain_app::shutdown::Shutdown;
use champlain_domain::error::ChamplainError;

/// Pause between polls after the connection dropped.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on flushing the DISCONNECT packet at shutdown.
const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

/// Publishing half of the MQTT connection.
#[derive(Clone)]
pub struct MqttTransport {
    client: AsyncClient,
    telemetry_topic: String,
    operation_timeout_secs: u16,
}

impl MqttTransport {
    /// Connect, subscribe to the command topic, and wait for the broker to
    /// acknowledge both.
    ///
    /// Command payloads received from now on are pushed into `inbox` once
    /// the returned [`MqttEventLoop`] is started.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError`] if TLS material cannot be loaded, the broker
    /// refuses or cannot be reached, the subscription is rejected, or the
    /// handshake exceeds `connect_timeout_secs`.
    pub async fn connect(
        config: &MqttConfig,
        inbox: mpsc::Sender<Vec<u8>>,
    ) -> Result<(Self, MqttEventLoop), MqttError> {
        let options = build_options(config).await?;
        let (client, eventloop) = AsyncClient::new(options, config.queue_capacity.max(1));
        let mut event_loop = MqttEventLoop {
            client: client.clone(),
            eventloop,
            command_topic: config.command_topic.clone(),
            inbox,
        };

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            tls = config.tls.is_some(),
            "connecting to MQTT broker"
        );

        let handshake = async {
            event_loop.wait_for_connack().await?;
            client
                .subscribe(config.command_topic.as_str(), QoS::AtLeastOnce)
                .await
                .map_err(MqttError::Client)?;
            event_loop.wait_for_suback().await
        };
        tokio::time::timeout(config.connect_timeout(), handshake)
            .await
            .map_err(|_| MqttError::HandshakeTimeout {
                secs: config.connect_timeout_secs,
            })??;

        tracing::info!(command_topic = %config.command_topic, "MQTT connection succeeded");

        let transport = Self {
            client,
            telemetry_topic: config.telemetry_topic.clone(),
            operation_timeout_secs: config.operation_timeout_secs,
        };
        Ok((transport, event_loop))
    }

    fn operation_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.operation_timeout_secs))
    }
}

impl TelemetrySink for MqttTransport {
    async fn publish(&self, payload: String) -> Result<(), ChamplainError> {
        let publish =
            self.client
                .publish(self.telemetry_topic.as_str(), QoS::AtLeastOnce, false, payload);
        match tokio::time::timeout(self.operation_timeout(), publish).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(MqttError::Client(err).into()),
            Err(_) => Err(MqttError::OperationTimeout {
                secs: self.operation_timeout_secs,
            }
            .into()),
        }
    }
}

/// Receiving half of the MQTT connection: drives the `rumqttc` event loop.
pub struct MqttEventLoop {
    client: AsyncClient,
    eventloop: EventLoop,
    command_topic: String,
    inbox: mpsc::Sender<Vec<u8>>,
}

impl MqttEventLoop {
    /// Spawn the polling loop; it runs until `shutdown` fires, then sends
    /// DISCONNECT.
    pub fn start(self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(mut self, mut shutdown: Shutdown) {
        loop {
            tokio::select! {
                biased;
                () = shutdown.wait() => break,
                polled = self.eventloop.poll() => match polled {
                    Ok(event) => self.handle_event(&event),
                    Err(err) => {
                        tracing::warn!(%err, "MQTT connection error, reconnecting");
                        tokio::select! {
                            () = shutdown.wait() => break,
                            () = tokio::time::sleep(RECONNECT_DELAY) => {}
                        }
                    }
                },
            }
        }
        self.disconnect().await;
    }

    fn handle_event(&self, event: &Event) {
        if let Event::Incoming(Packet::ConnAck(ack)) = event {
            tracing::info!("MQTT reconnected");
            if !ack.session_present {
                // A fresh session has no subscriptions.
                if let Err(err) = self
                    .client
                    .try_subscribe(self.command_topic.as_str(), QoS::AtLeastOnce)
                {
                    tracing::warn!(%err, "failed to resubscribe to command topic");
                }
            }
            return;
        }
        self.dispatch(event);
    }

    /// Forward a command-topic publish into the inbound queue.
    ///
    /// Never waits: a full queue drops the payload so the event loop keeps
    /// servicing keep-alives and acknowledgements.
    fn dispatch(&self, event: &Event) -> bool {
        let Event::Incoming(Packet::Publish(publish)) = event else {
            return false;
        };
        if publish.topic != self.command_topic {
            tracing::debug!(topic = %publish.topic, "ignoring message on unexpected topic");
            return false;
        }
        match self.inbox.try_send(publish.payload.to_vec()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("command queue full, dropping command");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("command queue closed, dropping command");
                false
            }
        }
    }

    async fn wait_for_connack(&mut self) -> Result<(), MqttError> {
        loop {
            match self.eventloop.poll().await.map_err(MqttError::Connection)? {
                Event::Incoming(Packet::ConnAck(_)) => return Ok(()),
                event => {
                    self.dispatch(&event);
                }
            }
        }
    }

    async fn wait_for_suback(&mut self) -> Result<(), MqttError> {
        loop {
            match self.eventloop.poll().await.map_err(MqttError::Connection)? {
                Event::Incoming(Packet::SubAck(ack)) => {
                    let rejected = ack
                        .return_codes
                        .iter()
                        .any(|code| matches!(code, SubscribeReasonCode::Failure));
                    if rejected {
                        return Err(MqttError::SubscribeRejected {
                            topic: self.command_topic.clone(),
                        });
                    }
                    return Ok(());
                }
                event => {
                    self.dispatch(&event);
                }
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Err(err) = self.client.try_disconnect() {
            tracing::warn!(%err, "failed to queue MQTT disconnect");
            return;
        }
        let flush = async {
            loop {
                match self.eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };
        if tokio::time::timeout(DISCONNECT_GRACE, flush).await.is_err() {
            tracing::warn!("MQTT disconnect not flushed in time");
        } else {
            tracing::info!("MQTT disconnected");
        }
    }
}

async fn build_options(config: &MqttConfig) -> Result<MqttOptions, MqttError> {
    let mut options = MqttOptions::new(
        config.client_id.as_str(),
        config.broker_host.as_str(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());

    if let Some(username) = &config.username {
        options.set_credentials(username.as_str(), config.password.as_deref().unwrap_or_default());
    }

    if let Some(tls) = &config.tls {
        options.set_transport(Transport::Tls(load_tls(tls).await?));
    }

    Ok(options)
}

async fn load_tls(tls: &TlsConfig) -> Result<TlsConfiguration, MqttError> {
    let ca = read_pem(&tls.ca_path).await?;
    let client_auth = match (&tls.client_cert_path, &tls.client_key_path) {
        (Some(cert), Some(key)) => Some((read_pem(cert).await?, read_pem(key).await?)),
        _ => None,
    };
    Ok(TlsConfiguration::Simple {
        ca,
        alpn: None,
        client_auth,
    })
}

async fn read_pem(path: &std::path::Path) -> Result<Vec<u8>, MqttError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| MqttError::TlsFile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rumqttc::Publish;

    use super::*;

    fn offline_event_loop(inbox: mpsc::Sender<Vec<u8>>) -> MqttEventLoop {
        let (client, eventloop) = AsyncClient::new(MqttOptions::new("test", "localhost", 1883), 4);
        MqttEventLoop {
            client,
            eventloop,
            command_topic: "champlain/republish".to_string(),
            inbox,
        }
    }

    fn publish_on(topic: &str, payload: &[u8]) -> Event {
        Event::Incoming(Packet::Publish(Publish::new(
            topic,
            QoS::AtLeastOnce,
            payload.to_vec(),
        )))
    }

    #[tokio::test]
    async fn should_build_options_from_config() {
        let config = MqttConfig {
            broker_host: "broker.local".to_string(),
            broker_port: 1884,
            client_id: "pi".to_string(),
            keep_alive_secs: 45,
            ..MqttConfig::default()
        };
        let options = build_options(&config).await.unwrap();
        assert_eq!(options.broker_address(), ("broker.local".to_string(), 1884));
        assert_eq!(options.client_id(), "pi");
        assert_eq!(options.keep_alive(), Duration::from_secs(45));
    }

    #[tokio::test]
    async fn should_fail_when_tls_file_missing() {
        let config = MqttConfig {
            tls: Some(TlsConfig {
                ca_path: PathBuf::from("/nonexistent/champlain/ca.pem"),
                client_cert_path: None,
                client_key_path: None,
            }),
            ..MqttConfig::default()
        };
        let result = build_options(&config).await;
        assert!(matches!(result, Err(MqttError::TlsFile { .. })));
    }

    #[tokio::test]
    async fn should_forward_command_topic_payloads() {
        let (tx, mut rx) = mpsc::channel(4);
        let event_loop = offline_event_loop(tx);

        assert!(event_loop.dispatch(&publish_on("champlain/republish", br#"{"temperature": 30}"#)));
        assert_eq!(rx.recv().await.unwrap(), br#"{"temperature": 30}"#.to_vec());
    }

    #[tokio::test]
    async fn should_ignore_other_topics() {
        let (tx, mut rx) = mpsc::channel(4);
        let event_loop = offline_event_loop(tx);

        assert!(!event_loop.dispatch(&publish_on("champlain/telemetry", b"{}")));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_drop_commands_when_queue_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let event_loop = offline_event_loop(tx);

        assert!(event_loop.dispatch(&publish_on("champlain/republish", b"1")));
        assert!(!event_loop.dispatch(&publish_on("champlain/republish", b"2")));
        assert_eq!(rx.recv().await.unwrap(), b"1".to_vec());
    }

    #[tokio::test]
    async fn should_fail_connect_when_broker_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = MqttConfig {
            broker_host: "127.0.0.1".to_string(),
            broker_port: port,
            connect_timeout_secs: 5,
            ..MqttConfig::default()
        };
        let (tx, _rx) = mpsc::channel(4);

        let result = MqttTransport::connect(&config, tx).await;
        assert!(matches!(result, Err(MqttError::Connection(_))));
    }

    #[tokio::test]
    async fn should_time_out_when_broker_never_acknowledges() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = MqttConfig {
            broker_host: "127.0.0.1".to_string(),
            broker_port: port,
            connect_timeout_secs: 1,
            ..MqttConfig::default()
        };
        let (tx, _rx) = mpsc::channel(4);

        let result = MqttTransport::connect(&config, tx).await;
        assert!(matches!(
            result,
            Err(MqttError::HandshakeTimeout { secs: 1 })
        ));
        drop(listener);
    }
}
