//! Process signals — SIGINT/SIGTERM end the agent.
//!
//! Handlers are installed eagerly by [`Signals::install`]. A signal that
//! arrives while startup is still blocking is queued, not fatal, so the
//! hardware opened so far is released on the normal return path.

use std::future::Future;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Installed interrupt handlers.
pub struct Signals {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
}

impl Signals {
    /// # Errors
    ///
    /// Returns the OS error if a handler cannot be registered.
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Resolve on the next SIGINT or SIGTERM.
    #[cfg(unix)]
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Resolve on the next Ctrl-C. A listener failure counts as a request
    /// to stop, so cleanup still runs.
    #[cfg(not(unix))]
    pub async fn recv(&mut self) {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl-C, stopping");
        }
    }
}

/// Drive `work` to completion unless `interrupt` resolves first.
///
/// Returns `None` when interrupted; `work` is dropped mid-flight.
pub async fn unless_interrupted<I, F>(interrupt: I, work: F) -> Option<F::Output>
where
    I: Future<Output = ()>,
    F: Future,
{
    tokio::select! {
        biased;
        () = interrupt => None,
        output = work => Some(output),
    }
}
