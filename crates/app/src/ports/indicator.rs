//! Indicator port — the digital output toggled by commands.

use std::sync::Arc;

use champlain_domain::error::ChamplainError;
use champlain_domain::indicator::IndicatorState;

/// Drives the indicator line.
///
/// Writes are synchronous: the command handler applies the new state to the
/// hardware in the same step as it records it.
pub trait IndicatorOutput: Send + Sync {
    /// Drive the line high for [`IndicatorState::On`], low for [`IndicatorState::Off`].
    ///
    /// # Errors
    ///
    /// Returns [`ChamplainError::Indicator`] if the driver rejects the write.
    fn write(&self, state: IndicatorState) -> Result<(), ChamplainError>;
}

impl<T: IndicatorOutput> IndicatorOutput for Arc<T> {
    fn write(&self, state: IndicatorState) -> Result<(), ChamplainError> {
        (**self).write(state)
    }
}
