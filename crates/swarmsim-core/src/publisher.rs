//! Periodic position publishing loop.
//!
//! [`PositionPublisher`] takes a snapshot of the store every tick and
//! offers it to a [`MessageSink`]. Delivery is best-effort: a rejected
//! snapshot is counted and dropped, never retried, and the loop never
//! waits on the consumer.

use std::sync::Arc;
use std::time::Duration;

use swarmsim_types::PositionSnapshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::sink::MessageSink;
use crate::store::AgentStateStore;

/// Summary returned when the publisher loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublisherReport {
    /// Number of ticks executed.
    pub ticks: u64,
    /// Snapshots the sink accepted.
    pub published: u64,
    /// Snapshots the sink rejected.
    pub dropped: u64,
}

/// The snapshot publishing task.
#[derive(Clone)]
pub struct PositionPublisher {
    store: Arc<AgentStateStore>,
    sink: Arc<dyn MessageSink<PositionSnapshot>>,
    period: Duration,
}

impl core::fmt::Debug for PositionPublisher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PositionPublisher")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl PositionPublisher {
    /// Create a publisher sending snapshots of `store` to `sink` once per
    /// `period`.
    pub const fn new(
        store: Arc<AgentStateStore>,
        sink: Arc<dyn MessageSink<PositionSnapshot>>,
        period: Duration,
    ) -> Self {
        Self {
            store,
            sink,
            period,
        }
    }

    /// Spawn the loop on the current tokio runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<PublisherReport> {
        tokio::spawn(self.run(cancel))
    }

    /// Run the loop until `cancel` fires or the store stops running.
    pub async fn run(self, cancel: CancellationToken) -> PublisherReport {
        let mut report = PublisherReport::default();
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(period_ms = self.period.as_millis(), "Position publisher started");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if cancel.is_cancelled() || !self.store.is_running() {
                        break;
                    }
                    report.ticks = report.ticks.saturating_add(1);
                    match self.sink.publish(self.store.position_snapshot()) {
                        Ok(()) => report.published = report.published.saturating_add(1),
                        Err(e) => {
                            report.dropped = report.dropped.saturating_add(1);
                            trace!(error = %e, tick = report.ticks, "Position snapshot dropped");
                        }
                    }
                }
            }
        }

        debug!(
            ticks = report.ticks,
            published = report.published,
            dropped = report.dropped,
            "Position publisher stopped"
        );
        report
    }
}
