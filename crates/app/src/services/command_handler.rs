//! Command handler — applies inbound threshold commands to the indicator.
//!
//! The transport pushes raw payloads into a bounded queue; this handler
//! drains it on its own task, so message delivery never waits on the
//! indicator and the samplers/publisher are never blocked by a command.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use champlain_domain::command::CommandMessage;
use champlain_domain::indicator::{IndicatorState, TEMPERATURE_THRESHOLD};

use crate::indicator::IndicatorController;
use crate::ports::IndicatorOutput;
use crate::shutdown::Shutdown;

/// Result of handling one inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The indicator was driven to `current`.
    Applied {
        previous: IndicatorState,
        current: IndicatorState,
    },
    /// The command carried no temperature; nothing changed.
    NoTemperature,
    /// The payload could not be parsed; it was discarded.
    Malformed,
    /// The indicator driver rejected the write; nothing changed.
    OutputFailed,
}

/// Applies [`CommandMessage`]s to an [`IndicatorController`].
pub struct CommandHandler<O> {
    indicator: Arc<IndicatorController<O>>,
}

impl<O: IndicatorOutput + 'static> CommandHandler<O> {
    pub fn new(indicator: Arc<IndicatorController<O>>) -> Self {
        Self { indicator }
    }

    /// Spawn the queue-draining loop on the current runtime.
    pub fn start(self, inbox: mpsc::Receiver<Vec<u8>>, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(self.run(inbox, shutdown))
    }

    /// Handle queued payloads in arrival order until shutdown or until
    /// every sender is gone.
    pub async fn run(self, mut inbox: mpsc::Receiver<Vec<u8>>, mut shutdown: Shutdown) {
        tracing::debug!(task = "command_handler", "task started");
        loop {
            tokio::select! {
                biased;
                () = shutdown.wait() => break,
                payload = inbox.recv() => match payload {
                    Some(payload) => {
                        self.handle(&payload);
                    }
                    None => {
                        tracing::debug!("command queue closed");
                        break;
                    }
                },
            }
        }
        tracing::debug!(task = "command_handler", "task stopped");
    }

    /// Parse one payload and apply it.
    pub fn handle(&self, payload: &[u8]) -> CommandOutcome {
        tracing::info!(payload = %String::from_utf8_lossy(payload), "command received");

        let command = match CommandMessage::parse(payload) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(%err, "discarding malformed command");
                return CommandOutcome::Malformed;
            }
        };

        let Some(temperature) = command.temperature else {
            tracing::debug!("command has no temperature, indicator unchanged");
            return CommandOutcome::NoTemperature;
        };

        let requested = IndicatorState::for_temperature(temperature);
        match requested {
            IndicatorState::On => tracing::info!(
                temperature,
                threshold = TEMPERATURE_THRESHOLD,
                "temperature over threshold, turning indicator on"
            ),
            IndicatorState::Off => tracing::info!(
                temperature,
                threshold = TEMPERATURE_THRESHOLD,
                "temperature at or below threshold, turning indicator off"
            ),
        }

        match self.indicator.apply(requested) {
            Ok(previous) => CommandOutcome::Applied {
                previous,
                current: requested,
            },
            Err(err) => {
                tracing::warn!(%err, "failed to drive indicator");
                CommandOutcome::OutputFailed
            }
        }
    }
}
