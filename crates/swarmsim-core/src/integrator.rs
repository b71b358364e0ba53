//! Periodic motion integration loop.
//!
//! [`MotionIntegrator`] advances every agent by one step per tick using
//! the fixed [`VELOCITY_SCALE`]. It holds no state besides its tick clock.
//! All simulation state lives in the [`AgentStateStore`].
//!
//! The loop checks its [`CancellationToken`] and the store's running flag
//! at the start of every tick and exits within one period of either being
//! cleared. The loop body never blocks.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::store::{AgentStateStore, VELOCITY_SCALE};

/// Summary returned when the integrator loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegratorReport {
    /// Number of integration steps executed.
    pub ticks: u64,
}

/// The motion integration task.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    store: Arc<AgentStateStore>,
    period: Duration,
}

impl MotionIntegrator {
    /// Create an integrator stepping `store` once per `period`.
    pub const fn new(store: Arc<AgentStateStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// Spawn the loop on the current tokio runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<IntegratorReport> {
        tokio::spawn(self.run(cancel))
    }

    /// Run the loop until `cancel` fires or the store stops running.
    pub async fn run(self, cancel: CancellationToken) -> IntegratorReport {
        let mut report = IntegratorReport::default();
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(period_ms = self.period.as_millis(), "Motion integrator started");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if cancel.is_cancelled() || !self.store.is_running() {
                        break;
                    }
                    self.store.integrate_tick(VELOCITY_SCALE);
                    report.ticks = report.ticks.saturating_add(1);
                }
            }
        }

        debug!(ticks = report.ticks, "Motion integrator stopped");
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use swarmsim_types::{ARENA_WIDTH, Point, Velocity};

    use super::*;

    #[tokio::test]
    async fn moves_agents_until_cancelled() {
        let store = Arc::new(AgentStateStore::new());
        let id = store.add_agent(Point::new(100.0, 100.0)).unwrap();
        store.mark_running().unwrap();
        store.set_velocity(id, Velocity::new(50.0, 0.0)).unwrap();

        let cancel = CancellationToken::new();
        let handle = MotionIntegrator::new(Arc::clone(&store), Duration::from_millis(1))
            .spawn(cancel.clone());
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
        let report = handle.await.unwrap();

        assert!(report.ticks > 0);
        let x = store.agent_pose(id).unwrap().x;
        assert!(x > 100.0 && x <= ARENA_WIDTH);
    }

    #[tokio::test]
    async fn exits_when_store_is_stopped() {
        let store = Arc::new(AgentStateStore::new());
        let handle = MotionIntegrator::new(Arc::clone(&store), Duration::from_millis(1))
            .spawn(CancellationToken::new());
        let report = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.ticks, 0);
    }
}
