//! Telemetry port — outbound publication of serialized readings.

use std::future::Future;
use std::sync::Arc;

use champlain_domain::error::ChamplainError;

/// Publishes telemetry payloads on the outbound topic with at-least-once delivery.
pub trait TelemetrySink: Send + Sync {
    /// Publish one JSON payload.
    fn publish(&self, payload: String) -> impl Future<Output = Result<(), ChamplainError>> + Send;
}

impl<T: TelemetrySink> TelemetrySink for Arc<T> {
    fn publish(&self, payload: String) -> impl Future<Output = Result<(), ChamplainError>> + Send {
        (**self).publish(payload)
    }
}
