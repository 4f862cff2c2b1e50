//! Indicator controller — the single owner of the indicator state.
//!
//! Recording a new state and driving the output are one step: the state
//! only changes if the driver accepted the write.

use std::sync::{Mutex, MutexGuard, PoisonError};

use champlain_domain::error::ChamplainError;
use champlain_domain::indicator::IndicatorState;

use crate::ports::IndicatorOutput;

/// Owns the indicator output and its last applied state.
pub struct IndicatorController<O> {
    output: O,
    state: Mutex<IndicatorState>,
}

impl<O: IndicatorOutput> IndicatorController<O> {
    /// Take ownership of `output` and force it low.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the initial low write fails.
    pub fn init(output: O) -> Result<Self, ChamplainError> {
        output.write(IndicatorState::Off)?;
        Ok(Self {
            output,
            state: Mutex::new(IndicatorState::Off),
        })
    }

    /// The last state successfully applied to the output.
    #[must_use]
    pub fn state(&self) -> IndicatorState {
        *self.lock()
    }

    /// Drive the output to `requested` and record it.
    ///
    /// The output is written even when `requested` equals the current state,
    /// so a repeated command re-asserts the line. Returns the previous state.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the recorded state is left unchanged.
    pub fn apply(&self, requested: IndicatorState) -> Result<IndicatorState, ChamplainError> {
        let mut state = self.lock();
        self.output.write(requested)?;
        let previous = *state;
        *state = requested;
        Ok(previous)
    }

    /// Leave the output in its safe low state.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the low write fails.
    pub fn force_off(&self) -> Result<(), ChamplainError> {
        self.apply(IndicatorState::Off).map(|_| ())
    }

    /// Access the underlying output driver.
    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    fn lock(&self) -> MutexGuard<'_, IndicatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
