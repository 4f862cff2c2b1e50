//! # champlaind — champlain telemetry agent
//!
//! Composition root that wires the adapters to the agent and runs it.
//!
//! ## Responsibilities
//! - Load configuration (file, env vars) and install the log subscriber
//! - Open the hardware backend and force the indicator low
//! - Connect to the MQTT broker; a failure here aborts before anything runs
//! - Start the samplers, publisher and command handler
//! - Install the SIGINT/SIGTERM handlers before any pin is exported; an
//!   interrupt during startup returns normally so the board is released
//! - On SIGINT/SIGTERM: stop the agent, leave the indicator low, then
//!   disconnect from the broker
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod signal;

use std::sync::Arc;

use champlain_adapter_hardware::Board;
use champlain_adapter_mqtt::MqttTransport;
use champlain_adapter_virtual::VirtualBoard;
use champlain_app::agent::Agent;
use champlain_app::indicator::IndicatorController;
use champlain_app::ports::{IndicatorOutput, SoundSensor, TemperatureSensor};
use champlain_app::shutdown;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::{Backend, Config};
use crate::signal::{Signals, unless_interrupted};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    run(config)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "champlaind stopped on error"))
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut signals = Signals::install()?;

    match config.hardware.backend {
        Backend::Gpio => {
            let board = Board::open(&config.hardware.gpio)?;
            serve(
                &config,
                &mut signals,
                board.thermometer,
                board.microphone,
                board.indicator,
            )
            .await
        }
        Backend::Virtual => {
            let board = VirtualBoard::new();
            serve(
                &config,
                &mut signals,
                board.thermometer,
                board.microphone,
                board.indicator,
            )
            .await
        }
    }
}

async fn serve<T, S, O>(
    config: &Config,
    signals: &mut Signals,
    thermometer: T,
    microphone: S,
    indicator: O,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: TemperatureSensor + 'static,
    S: SoundSensor + 'static,
    O: IndicatorOutput + 'static,
{
    let indicator = Arc::new(IndicatorController::init(indicator)?);

    let (commands_tx, commands_rx) = mpsc::channel(config.mqtt.queue_capacity);
    let connect = MqttTransport::connect(&config.mqtt, commands_tx);
    let Some(connected) = unless_interrupted(signals.recv(), connect).await else {
        tracing::info!("interrupted before the broker connection was up");
        return Ok(());
    };
    let (transport, event_loop) = connected?;

    let agent = Agent::new(thermometer, microphone, indicator, transport)
        .with_intervals(config.sampling.intervals())
        .start(commands_rx);

    // The event loop outlives the agent so the last publishes are flushed
    // before DISCONNECT.
    let (transport_trigger, transport_shutdown) = shutdown::channel();
    let event_loop = event_loop.start(transport_shutdown);

    signals.recv().await;
    tracing::info!("shutdown requested");

    let stopped = agent.shutdown().await;
    transport_trigger.trigger();
    if let Err(err) = event_loop.await {
        tracing::error!(%err, "MQTT event loop ended abnormally");
    }
    stopped?;

    tracing::info!("champlaind stopped");
    Ok(())
}
