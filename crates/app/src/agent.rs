//! Agent — wires the samplers, publisher and command handler around the
//! shared state and runs them under one shutdown signal.
//!
//! The only things the tasks share are [`SensorReadings`] (one writer per
//! field) and the [`IndicatorController`] (written by the command handler
//! only). There is no other coordination between them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use champlain_domain::error::ChamplainError;

use crate::indicator::IndicatorController;
use crate::ports::{IndicatorOutput, SoundSensor, TelemetrySink, TemperatureSensor};
use crate::readings::SensorReadings;
use crate::services::command_handler::CommandHandler;
use crate::services::publisher::Publisher;
use crate::services::sound_sampler::SoundSampler;
use crate::services::temperature_sampler::TemperatureSampler;
use crate::shutdown::{self, ShutdownTrigger};

/// Cadence of each clocked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub temperature: Duration,
    pub sound: Duration,
    pub publish: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            temperature: Duration::from_secs(5),
            sound: Duration::from_secs(5),
            publish: Duration::from_secs(5),
        }
    }
}

/// Everything the agent needs before it can start.
pub struct Agent<T, S, O, P> {
    thermometer: T,
    microphone: S,
    indicator: Arc<IndicatorController<O>>,
    sink: P,
    intervals: Intervals,
}

impl<T, S, O, P> Agent<T, S, O, P>
where
    T: TemperatureSensor + 'static,
    S: SoundSensor + 'static,
    O: IndicatorOutput + 'static,
    P: TelemetrySink + 'static,
{
    /// Assemble an agent with the default 5 second cadence.
    pub fn new(
        thermometer: T,
        microphone: S,
        indicator: Arc<IndicatorController<O>>,
        sink: P,
    ) -> Self {
        Self {
            thermometer,
            microphone,
            indicator,
            sink,
            intervals: Intervals::default(),
        }
    }

    #[must_use]
    pub fn with_intervals(mut self, intervals: Intervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Spawn all tasks. `inbox` carries raw command payloads from the transport.
    pub fn start(self, inbox: mpsc::Receiver<Vec<u8>>) -> RunningAgent<O> {
        let (trigger, shutdown) = shutdown::channel();
        let readings = Arc::new(SensorReadings::new());

        let tasks = vec![
            (
                "temperature_sampler",
                TemperatureSampler::new(
                    self.thermometer,
                    Arc::clone(&readings),
                    self.intervals.temperature,
                )
                .start(shutdown.clone()),
            ),
            (
                "sound_sampler",
                SoundSampler::new(self.microphone, Arc::clone(&readings), self.intervals.sound)
                    .start(shutdown.clone()),
            ),
            (
                "publisher",
                Publisher::new(self.sink, Arc::clone(&readings), self.intervals.publish)
                    .start(shutdown.clone()),
            ),
            (
                "command_handler",
                CommandHandler::new(Arc::clone(&self.indicator)).start(inbox, shutdown),
            ),
        ];

        tracing::info!(
            temperature_secs = self.intervals.temperature.as_secs_f64(),
            sound_secs = self.intervals.sound.as_secs_f64(),
            publish_secs = self.intervals.publish.as_secs_f64(),
            "agent started"
        );

        RunningAgent {
            indicator: self.indicator,
            trigger,
            tasks,
        }
    }
}

/// Handle on a started agent.
pub struct RunningAgent<O> {
    indicator: Arc<IndicatorController<O>>,
    trigger: ShutdownTrigger,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl<O: IndicatorOutput> RunningAgent<O> {
    /// Stop every task, wait for them, then leave the indicator low.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the final low write fails.
    pub async fn shutdown(self) -> Result<(), ChamplainError> {
        self.trigger.trigger();
        for (task, handle) in self.tasks {
            if let Err(err) = handle.await {
                tracing::error!(task, %err, "task ended abnormally");
            }
        }
        self.indicator.force_off()?;
        tracing::info!("agent stopped, indicator off");
        Ok(())
    }
}
