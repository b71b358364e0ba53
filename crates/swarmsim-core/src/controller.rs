//! Simulation lifecycle and command surface.
//!
//! [`SimulationController`] is the only component that toggles the
//! running flag. It owns the loop tasks while the simulation runs, the
//! leader state, and the outbound sinks. Everything an operator can do
//! goes through here:
//!
//! - [`start`](SimulationController::start) and
//!   [`stop`](SimulationController::stop) drive the two periodic loops
//! - [`add_agent`](SimulationController::add_agent),
//!   [`add_obstacle`](SimulationController::add_obstacle) and
//!   [`reset`](SimulationController::reset) edit the arena while stopped
//! - [`select`](SimulationController::select) routes pointer presses to the
//!   leader selector while running
//!
//! Lock order is fleet gate, then leader, then store. The fleet gate keeps
//! registry updates in step with agent creation and reset. Start and stop
//! are serialized by the async mutex that holds the loop handles.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use swarmsim_types::{
    AgentId, LeaderChanged, MouseButton, ObstacleId, Point, PositionSnapshot, SelectionInput,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::error::SimError;
use crate::fleet::{FleetRegistry, InMemoryFleetRegistry, fleet_map};
use crate::ingress::VelocityIngress;
use crate::integrator::{IntegratorReport, MotionIntegrator};
use crate::leader::{self, LeaderState};
use crate::publisher::{PositionPublisher, PublisherReport};
use crate::sink::{MessageSink, NullSink};
use crate::store::AgentStateStore;

/// Point-in-time view of the simulation for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationStatus {
    /// Whether the loops are active.
    pub running: bool,
    /// Number of agents in the arena.
    pub agents: usize,
    /// Number of obstacles in the arena.
    pub obstacles: usize,
    /// Current leader, if any.
    pub leader: Option<AgentId>,
    /// When the current run started. `None` while stopped.
    pub started_at: Option<DateTime<Utc>>,
}

/// Handles for the loop tasks of one run.
struct RunningLoops {
    cancel: CancellationToken,
    integrator: JoinHandle<IntegratorReport>,
    publisher: JoinHandle<PublisherReport>,
}

impl Drop for RunningLoops {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Orchestrates the store, the loops and the leader selector.
pub struct SimulationController {
    store: Arc<AgentStateStore>,
    ingress: VelocityIngress,
    timing: TimingConfig,
    leader: Mutex<LeaderState>,
    loops: tokio::sync::Mutex<Option<RunningLoops>>,
    started_at: Mutex<Option<DateTime<Utc>>>,
    fleet_gate: Mutex<()>,
    position_sink: Arc<dyn MessageSink<PositionSnapshot>>,
    leader_sink: Arc<dyn MessageSink<LeaderChanged>>,
    fleet: Arc<dyn FleetRegistry>,
}

impl core::fmt::Debug for SimulationController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulationController")
            .field("timing", &self.timing)
            .field("running", &self.store.is_running())
            .field("leader", &*self.leader.lock())
            .finish_non_exhaustive()
    }
}

impl SimulationController {
    /// Create a stopped controller with an empty arena.
    ///
    /// `positions` receives snapshots from the publisher loop, `leader`
    /// receives leader-change events and `fleet` is kept in step with the
    /// agent set.
    pub fn new(
        timing: TimingConfig,
        positions: Arc<dyn MessageSink<PositionSnapshot>>,
        leader: Arc<dyn MessageSink<LeaderChanged>>,
        fleet: Arc<dyn FleetRegistry>,
    ) -> Self {
        let store = Arc::new(AgentStateStore::new());
        Self {
            ingress: VelocityIngress::new(Arc::clone(&store)),
            store,
            timing,
            leader: Mutex::new(LeaderState::NoLeader),
            loops: tokio::sync::Mutex::new(None),
            started_at: Mutex::new(None),
            fleet_gate: Mutex::new(()),
            position_sink: positions,
            leader_sink: leader,
            fleet,
        }
    }

    /// A controller with default loop rates whose outbound messages go
    /// nowhere.
    pub fn with_defaults() -> Self {
        Self::new(
            TimingConfig::default(),
            Arc::new(NullSink),
            Arc::new(NullSink),
            Arc::new(InMemoryFleetRegistry::new()),
        )
    }

    /// The shared store (read access for observers).
    pub const fn store(&self) -> &Arc<AgentStateStore> {
        &self.store
    }

    /// The velocity ingress path bound to this controller's store.
    pub const fn ingress(&self) -> &VelocityIngress {
        &self.ingress
    }

    /// Start both loops.
    ///
    /// # Errors
    ///
    /// [`SimError::OperationNotAllowed`] if already running.
    pub async fn start(&self) -> Result<(), SimError> {
        let mut loops = self.loops.lock().await;
        self.store.mark_running()?;

        let cancel = CancellationToken::new();
        let integrator =
            MotionIntegrator::new(Arc::clone(&self.store), self.timing.integrator_period())
                .spawn(cancel.clone());
        let publisher = PositionPublisher::new(
            Arc::clone(&self.store),
            Arc::clone(&self.position_sink),
            self.timing.publisher_period(),
        )
        .spawn(cancel.clone());

        *loops = Some(RunningLoops {
            cancel,
            integrator,
            publisher,
        });
        *self.started_at.lock() = Some(Utc::now());

        info!(
            agents = self.store.agent_count(),
            obstacles = self.store.obstacle_count(),
            integrator_hz = self.timing.integrator_hz,
            publisher_hz = self.timing.publisher_hz,
            "Simulation started"
        );
        Ok(())
    }

    /// Stop both loops and zero every agent's velocity.
    ///
    /// Returns once both loop tasks have exited. Calling it while stopped
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// [`SimError::NotRunning`] if the simulation is already stopped.
    pub async fn stop(&self) -> Result<(), SimError> {
        let mut loops = self.loops.lock().await;
        let zeroed = self.store.mark_stopped()?;
        *self.started_at.lock() = None;

        let mut integrator_ticks: u64 = 0;
        let mut publisher_report = PublisherReport::default();
        if let Some(mut running) = loops.take() {
            running.cancel.cancel();
            match (&mut running.integrator).await {
                Ok(report) => integrator_ticks = report.ticks,
                Err(e) => warn!(error = %e, "Motion integrator task failed"),
            }
            match (&mut running.publisher).await {
                Ok(report) => publisher_report = report,
                Err(e) => warn!(error = %e, "Position publisher task failed"),
            }
        }

        info!(
            agents_halted = zeroed,
            integrator_ticks,
            snapshots_published = publisher_report.published,
            snapshots_dropped = publisher_report.dropped,
            "Simulation stopped"
        );
        Ok(())
    }

    /// Clear the arena, restart id numbering and drop the leader.
    ///
    /// # Errors
    ///
    /// [`SimError::OperationNotAllowed`] while running.
    pub fn reset(&self) -> Result<(), SimError> {
        let _gate = self.fleet_gate.lock();
        let mut leader = self.leader.lock();
        self.store.reset()?;
        *leader = LeaderState::NoLeader;
        self.fleet.clear();
        info!("Simulation reset");
        Ok(())
    }

    /// Place a new agent at `point`.
    ///
    /// # Errors
    ///
    /// [`SimError::OperationNotAllowed`] while running, or
    /// [`SimError::InvalidInput`] if the point is outside the arena.
    pub fn add_agent(&self, point: Point) -> Result<AgentId, SimError> {
        let _gate = self.fleet_gate.lock();
        let id = self.store.add_agent(point)?;
        self.fleet.replace(fleet_map(self.store.agent_ids()));
        info!(agent_id = %id, x = point.x, y = point.y, "Agent added");
        Ok(id)
    }

    /// Place a new obstacle at `point`.
    ///
    /// # Errors
    ///
    /// [`SimError::OperationNotAllowed`] while running, or
    /// [`SimError::InvalidInput`] if the point is outside the arena.
    pub fn add_obstacle(&self, point: Point) -> Result<ObstacleId, SimError> {
        let id = self.store.add_obstacle(point)?;
        info!(obstacle_id = %id, x = point.x, y = point.y, "Obstacle added");
        Ok(id)
    }

    /// Route a pointer press through the leader selector.
    ///
    /// Only primary-button presses while running are considered. Returns
    /// the event that was offered to the leader sink, if any.
    pub fn select(&self, input: SelectionInput) -> Option<LeaderChanged> {
        if input.button != MouseButton::Primary {
            return None;
        }

        let mut leader = self.leader.lock();
        if !self.store.is_running() {
            debug!("Simulation stopped, selection ignored");
            return None;
        }

        let previous = *leader;
        let (next, event) = leader::select(previous, &self.store.agent_poses(), input.point());
        if next != previous {
            info!(from = ?previous, to = ?next, "Leader changed");
        }
        *leader = next;
        drop(leader);

        if let Some(event) = event {
            if let Err(e) = self.leader_sink.publish(event) {
                debug!(error = %e, leader = event.id, "Leader event dropped");
            }
        }
        event
    }

    /// The current leader state.
    pub fn leader(&self) -> LeaderState {
        *self.leader.lock()
    }

    /// Current positions of every entity.
    pub fn snapshot(&self) -> PositionSnapshot {
        self.store.position_snapshot()
    }

    /// Summarize the simulation for operators.
    pub fn status(&self) -> SimulationStatus {
        let leader = self.leader.lock().leader();
        SimulationStatus {
            running: self.store.is_running(),
            agents: self.store.agent_count(),
            obstacles: self.store.obstacle_count(),
            leader,
            started_at: *self.started_at.lock(),
        }
    }
}
