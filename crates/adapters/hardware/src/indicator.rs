//! Indicator LED on a GPIO output line.

use std::sync::{Mutex, PoisonError};

use champlain_app::ports::IndicatorOutput;
use champlain_domain::error::ChamplainError;
use champlain_domain::indicator::IndicatorState;

use crate::gpio::Line;

/// Drives one output line high for on, low for off.
#[derive(Debug)]
pub struct GpioIndicator<L> {
    line: Mutex<L>,
}

impl<L: Line> GpioIndicator<L> {
    #[must_use]
    pub fn new(line: L) -> Self {
        Self {
            line: Mutex::new(line),
        }
    }
}

impl<L: Line> IndicatorOutput for GpioIndicator<L> {
    fn write(&self, state: IndicatorState) -> Result<(), ChamplainError> {
        self.line
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(state.is_on())
            .map_err(|err| ChamplainError::Indicator(Box::new(err)))
    }
}
