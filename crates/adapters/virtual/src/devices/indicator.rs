//! Virtual indicator — remembers what it was last told.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use champlain_app::ports::IndicatorOutput;
use champlain_domain::error::ChamplainError;
use champlain_domain::indicator::IndicatorState;

/// Simulated LED.
#[derive(Debug, Default)]
pub struct VirtualIndicator {
    state: Mutex<IndicatorState>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl VirtualIndicator {
    /// Level of the simulated line.
    #[must_use]
    pub fn state(&self) -> IndicatorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail, leaving the line as it is.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl IndicatorOutput for VirtualIndicator {
    fn write(&self, state: IndicatorState) -> Result<(), ChamplainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChamplainError::Indicator(Box::new(std::io::Error::other(
                "virtual indicator fault",
            ))));
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%state, "virtual indicator written");
        Ok(())
    }
}
