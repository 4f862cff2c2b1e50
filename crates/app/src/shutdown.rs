//! Cooperative shutdown signal shared by every long-running task.
//!
//! Backed by a tokio [`watch`] channel: the trigger flips the value once and
//! every [`Shutdown`] clone observes it. Dropping the trigger also counts as
//! a shutdown request, so tasks never outlive their owner.

use tokio::sync::watch;

/// Owner side: fires the signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

/// Observer side, cloned into each task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    receiver: watch::Receiver<bool>,
}

/// Create a connected trigger/observer pair.
#[must_use]
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, Shutdown { receiver })
}

impl ShutdownTrigger {
    /// Ask every observer to stop. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Shutdown {
    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolve once shutdown is requested (or the trigger is dropped).
    pub async fn wait(&mut self) {
        // An error means the trigger is gone, which is a shutdown as well.
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }
}
