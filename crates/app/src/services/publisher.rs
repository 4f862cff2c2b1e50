//! Telemetry publisher — snapshots the readings and emits one message per tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use champlain_domain::telemetry::TelemetryMessage;
use champlain_domain::time;

use crate::ports::TelemetrySink;
use crate::readings::SensorReadings;
use crate::services::run_periodic;
use crate::shutdown::Shutdown;

/// Result of a single publish tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// At least one reading has never been sampled; nothing was sent.
    Skipped,
    /// The payload was handed to the sink.
    Published(String),
    /// Serialization or the sink failed; the tick is dropped.
    Failed,
}

/// Periodically publishes the latest readings through a [`TelemetrySink`].
pub struct Publisher<P> {
    sink: P,
    readings: Arc<SensorReadings>,
    interval: Duration,
}

impl<P: TelemetrySink + 'static> Publisher<P> {
    pub fn new(sink: P, readings: Arc<SensorReadings>, interval: Duration) -> Self {
        Self {
            sink,
            readings,
            interval,
        }
    }

    /// Spawn the publishing loop on the current runtime.
    pub fn start(self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Publish every interval until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) {
        let this = &self;
        run_periodic("publisher", self.interval, shutdown, move || async move {
            this.publish_once().await;
        })
        .await;
    }

    /// Snapshot the readings and publish them if both are present.
    ///
    /// Stale values are published as-is; there is no freshness bound.
    pub async fn publish_once(&self) -> PublishOutcome {
        let snapshot = self.readings.snapshot();
        let Some(message) = snapshot.to_message() else {
            tracing::debug!(
                has_temperature = snapshot.temperature.is_some(),
                has_volume = snapshot.sound_level.is_some(),
                "readings incomplete, skipping publish"
            );
            return PublishOutcome::Skipped;
        };

        if let (Some(temperature), Some(sound)) = (snapshot.temperature, snapshot.sound_level) {
            let now = time::now();
            tracing::trace!(
                temperature_age = ?time::age(temperature.sampled_at, now),
                volume_age = ?time::age(sound.sampled_at, now),
                "reading ages"
            );
        }

        self.publish_message(&message).await
    }

    async fn publish_message(&self, message: &TelemetryMessage) -> PublishOutcome {
        let payload = match message.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize telemetry");
                return PublishOutcome::Failed;
            }
        };

        match self.sink.publish(payload.clone()).await {
            Ok(()) => {
                tracing::info!(%payload, "published");
                PublishOutcome::Published(payload)
            }
            Err(err) => {
                tracing::warn!(%err, "telemetry publish failed, dropping this tick");
                PublishOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;
    use crate::testing::RecordingSink;

    fn publisher() -> Publisher<Arc<RecordingSink>> {
        Publisher::new(
            Arc::new(RecordingSink::default()),
            Arc::new(SensorReadings::new()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn should_skip_when_nothing_sampled() {
        let publisher = publisher();
        assert_eq!(publisher.publish_once().await, PublishOutcome::Skipped);
        assert!(publisher.sink.published().is_empty());
    }

    #[tokio::test]
    async fn should_skip_until_sound_lands_then_publish() {
        let publisher = publisher();

        publisher.readings.set_temperature(22.5);
        assert_eq!(publisher.publish_once().await, PublishOutcome::Skipped);

        publisher.readings.set_sound_level(215);
        assert_eq!(
            publisher.publish_once().await,
            PublishOutcome::Published(r#"{"temperature":22.5,"volume":215}"#.to_string())
        );

        let published = publisher.sink.published();
        assert_eq!(published.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&published[0]).unwrap();
        assert_eq!(value, serde_json::json!({"temperature": 22.5, "volume": 215}));
    }

    #[tokio::test]
    async fn should_republish_stale_values_every_tick() {
        let publisher = publisher();
        publisher.readings.set_temperature(20.0);
        publisher.readings.set_sound_level(10);

        for _ in 0..3 {
            publisher.publish_once().await;
        }
        assert_eq!(publisher.sink.published().len(), 3);
    }

    #[tokio::test]
    async fn should_report_failure_and_continue_when_sink_fails() {
        let publisher = publisher();
        publisher.readings.set_temperature(20.0);
        publisher.readings.set_sound_level(10);

        publisher.sink.set_failing(true);
        assert_eq!(publisher.publish_once().await, PublishOutcome::Failed);

        publisher.sink.set_failing(false);
        assert!(matches!(
            publisher.publish_once().await,
            PublishOutcome::Published(_)
        ));
    }

    #[tokio::test]
    async fn should_fail_on_non_finite_temperature() {
        let publisher = publisher();
        publisher.readings.set_temperature(f64::INFINITY);
        publisher.readings.set_sound_level(10);
        assert_eq!(publisher.publish_once().await, PublishOutcome::Failed);
        assert!(publisher.sink.published().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_once_per_tick_after_both_fields_set() {
        let sink = Arc::new(RecordingSink::default());
        let readings = Arc::new(SensorReadings::new());
        let (trigger, shutdown) = shutdown::channel();
        let handle = Publisher::new(Arc::clone(&sink), Arc::clone(&readings), Duration::from_secs(5))
            .start(shutdown);

        // t = 0: first tick with empty readings.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(sink.published().is_empty());

        readings.set_temperature(22.5);
        readings.set_sound_level(215);

        // Ticks at t = 5 and t = 10.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(sink.published().len(), 2);

        trigger.trigger();
        handle.await.unwrap();
    }
}
