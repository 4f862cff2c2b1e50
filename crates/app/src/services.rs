//! Concurrent services — the long-running units of the agent.
//!
//! Samplers and the publisher are clocked: they run one iteration per
//! interval until shutdown. The command handler is event-driven and drains
//! an inbound queue. Each service exposes a single-iteration method (used by
//! the tests) and a `run` loop (used by [`crate::agent`]).

pub mod command_handler;
pub mod publisher;
pub mod sound_sampler;
pub mod temperature_sampler;

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::shutdown::Shutdown;

/// Call `tick` once per `period`, starting immediately, until shutdown.
///
/// A tick that is already running completes before the shutdown is observed.
/// Late ticks are delayed rather than bunched up.
pub(crate) async fn run_periodic<F, Fut>(
    task: &'static str,
    period: Duration,
    mut shutdown: Shutdown,
    mut tick: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(task, period_secs = period.as_secs_f64(), "task started");
    loop {
        tokio::select! {
            biased;
            () = shutdown.wait() => break,
            _ = interval.tick() => tick().await,
        }
    }
    tracing::debug!(task, "task stopped");
}
