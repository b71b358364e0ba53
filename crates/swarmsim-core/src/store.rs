//! The shared agent/obstacle state store.
//!
//! [`AgentStateStore`] is the single writable substrate shared by the
//! controller, the velocity ingress, the motion integrator and the
//! position publisher. All state, including the lifecycle `running` flag,
//! lives behind one [`RwLock`] so that every precondition check and the
//! mutation it guards happen in the same critical section.
//!
//! # Invariants
//!
//! - Each agent's pose and velocity are stored together in one
//!   [`AgentEntry`], so there is never a position without a velocity or
//!   the reverse.
//! - Every stored position lies inside `[0, ARENA_WIDTH] x [0, ARENA_HEIGHT]`.
//!   Placement rejects anything outside; integration clamps.
//! - Entities are created and destroyed only while stopped, and only
//!   through the crate-private methods the controller calls.
//!
//! Critical sections are short and synchronous. No lock is ever held
//! across an `.await`.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use swarmsim_types::{
    ARENA_HEIGHT, ARENA_WIDTH, AgentId, EntityId, ObstacleId, Point, Pose, PositionSnapshot,
    Velocity,
};

use crate::error::SimError;

/// Scale applied to velocities on each integrator tick.
///
/// This is a fixed design constant, not a physical time step: a command
/// of `50` units moves an agent `1` unit per integrator tick regardless of
/// the configured tick rate. Changing the integrator rate therefore
/// changes the effective speed of every agent.
pub const VELOCITY_SCALE: f64 = 1.0 / 50.0;

/// Pose and velocity of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentEntry {
    /// Current pose.
    pub pose: Pose,
    /// Current commanded velocity.
    pub velocity: Velocity,
}

#[derive(Debug)]
struct StoreInner {
    running: bool,
    agents: BTreeMap<AgentId, AgentEntry>,
    obstacles: BTreeMap<ObstacleId, Pose>,
    next_agent: AgentId,
    next_obstacle: ObstacleId,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            running: false,
            agents: BTreeMap::new(),
            obstacles: BTreeMap::new(),
            next_agent: AgentId::FIRST,
            next_obstacle: ObstacleId::FIRST,
        }
    }
}

/// Thread-safe store of agent and obstacle state.
#[derive(Debug, Default)]
pub struct AgentStateStore {
    inner: RwLock<StoreInner>,
}

impl AgentStateStore {
    /// Create an empty, stopped store with fresh id counters.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Lifecycle flag (toggled by the controller only)
    // -----------------------------------------------------------------------

    /// Whether the simulation is currently running.
    pub fn is_running(&self) -> bool {
        self.inner.read().running
    }

    /// Flip the store into the running state.
    pub(crate) fn mark_running(&self) -> Result<(), SimError> {
        let mut inner = self.inner.write();
        if inner.running {
            return Err(SimError::not_allowed("start"));
        }
        inner.running = true;
        Ok(())
    }

    /// Flip the store into the stopped state and zero every velocity in
    /// the same critical section, so no command can slip in between.
    ///
    /// Returns the number of agents whose velocity was reset.
    pub(crate) fn mark_stopped(&self) -> Result<usize, SimError> {
        let mut inner = self.inner.write();
        if !inner.running {
            return Err(SimError::NotRunning);
        }
        inner.running = false;
        for entry in inner.agents.values_mut() {
            entry.velocity = Velocity::ZERO;
        }
        Ok(inner.agents.len())
    }

    // -----------------------------------------------------------------------
    // Creation / destruction
    // -----------------------------------------------------------------------

    /// Place a new agent at `point` with zero velocity.
    pub(crate) fn add_agent(&self, point: Point) -> Result<AgentId, SimError> {
        check_placement(point)?;
        let mut inner = self.inner.write();
        if inner.running {
            return Err(SimError::not_allowed("add agent"));
        }
        let id = inner.next_agent;
        let next = id.into_inner().checked_add(1).ok_or_else(|| SimError::InvalidInput {
            reason: "agent id space exhausted".to_owned(),
        })?;
        inner.agents.insert(
            id,
            AgentEntry {
                pose: Pose::at(point),
                velocity: Velocity::ZERO,
            },
        );
        inner.next_agent = AgentId(next);
        Ok(id)
    }

    /// Place a new static obstacle at `point`.
    pub(crate) fn add_obstacle(&self, point: Point) -> Result<ObstacleId, SimError> {
        check_placement(point)?;
        let mut inner = self.inner.write();
        if inner.running {
            return Err(SimError::not_allowed("add obstacle"));
        }
        let id = inner.next_obstacle;
        let next = id.into_inner().checked_add(1).ok_or_else(|| SimError::InvalidInput {
            reason: "obstacle id space exhausted".to_owned(),
        })?;
        inner.obstacles.insert(id, Pose::at(point));
        inner.next_obstacle = ObstacleId(next);
        Ok(id)
    }

    /// Remove every agent and obstacle and restart both id counters.
    ///
    /// The leader state is not stored here; clearing it is the
    /// controller's job.
    pub(crate) fn reset(&self) -> Result<(), SimError> {
        let mut inner = self.inner.write();
        if inner.running {
            return Err(SimError::not_allowed("reset"));
        }
        *inner = StoreInner::default();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Value mutation
    // -----------------------------------------------------------------------

    /// Overwrite the velocity of agent `id` (last write wins).
    ///
    /// Unknown ids are rejected without touching the store.
    pub(crate) fn set_velocity(&self, id: AgentId, velocity: Velocity) -> Result<(), SimError> {
        let mut inner = self.inner.write();
        if !inner.running {
            return Err(SimError::NotRunning);
        }
        let entry = inner
            .agents
            .get_mut(&id)
            .ok_or_else(|| SimError::UnknownAgent {
                identifier: id.to_string(),
            })?;
        entry.velocity = velocity;
        Ok(())
    }

    /// Advance every agent by one integrator step.
    ///
    /// `x' = clamp(x + vx * dt_scale, 0, W)` and
    /// `y' = clamp(y - vy * dt_scale, 0, H)`. The whole step runs under one
    /// write lock, so snapshots see either none or all of it.
    ///
    /// Returns the number of agents advanced.
    pub(crate) fn integrate_tick(&self, dt_scale: f64) -> usize {
        let mut inner = self.inner.write();
        for entry in inner.agents.values_mut() {
            let pose = &mut entry.pose;
            let velocity = entry.velocity;
            pose.x = clamp_axis(velocity.vx.mul_add(dt_scale, pose.x), ARENA_WIDTH);
            pose.y = clamp_axis((-velocity.vy).mul_add(dt_scale, pose.y), ARENA_HEIGHT);
        }
        inner.agents.len()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Consistent point-in-time view of every entity: agents in ascending
    /// id order, then obstacles in ascending id order.
    pub fn snapshot(&self) -> Vec<(EntityId, Pose)> {
        let inner = self.inner.read();
        inner
            .agents
            .iter()
            .map(|(id, entry)| (EntityId::from(*id), entry.pose))
            .chain(
                inner
                    .obstacles
                    .iter()
                    .map(|(id, pose)| (EntityId::from(*id), *pose)),
            )
            .collect()
    }

    /// [`snapshot`](Self::snapshot) in outbound message form.
    pub fn position_snapshot(&self) -> PositionSnapshot {
        PositionSnapshot::from_entries(self.snapshot())
    }

    /// Poses of all agents, ascending by id.
    pub fn agent_poses(&self) -> Vec<(AgentId, Pose)> {
        self.inner
            .read()
            .agents
            .iter()
            .map(|(id, entry)| (*id, entry.pose))
            .collect()
    }

    /// Ids of all agents, ascending.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.inner.read().agents.keys().copied().collect()
    }

    /// Pose and velocity of one agent.
    pub fn agent(&self, id: AgentId) -> Option<AgentEntry> {
        self.inner.read().agents.get(&id).copied()
    }

    /// Current pose of one agent.
    pub fn agent_pose(&self, id: AgentId) -> Option<Pose> {
        self.agent(id).map(|entry| entry.pose)
    }

    /// Current velocity of one agent.
    pub fn agent_velocity(&self, id: AgentId) -> Option<Velocity> {
        self.agent(id).map(|entry| entry.velocity)
    }

    /// Pose of one obstacle.
    pub fn obstacle_pose(&self, id: ObstacleId) -> Option<Pose> {
        self.inner.read().obstacles.get(&id).copied()
    }

    /// Number of live agents.
    pub fn agent_count(&self) -> usize {
        self.inner.read().agents.len()
    }

    /// Number of live obstacles.
    pub fn obstacle_count(&self) -> usize {
        self.inner.read().obstacles.len()
    }
}

/// Reject placements that would break the bounds invariant.
fn check_placement(point: Point) -> Result<(), SimError> {
    if point.is_within_arena() {
        Ok(())
    } else {
        Err(SimError::InvalidInput {
            reason: format!(
                "position ({}, {}) is outside the arena [0, {ARENA_WIDTH}] x [0, {ARENA_HEIGHT}]",
                point.x, point.y
            ),
        })
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn running_store_with_agent(at: Point) -> (AgentStateStore, AgentId) {
        let store = AgentStateStore::new();
        let id = store.add_agent(at).unwrap();
        store.mark_running().unwrap();
        (store, id)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn agent_ids_count_up_from_one() {
        let store = AgentStateStore::new();
        let ids: Vec<_> = (0..5)
            .map(|_| store.add_agent(Point::new(10.0, 10.0)).unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![AgentId(1), AgentId(2), AgentId(3), AgentId(4), AgentId(5)]
        );
    }

    #[test]
    fn obstacle_ids_count_up_from_sixty() {
        let store = AgentStateStore::new();
        let first = store.add_obstacle(Point::new(1.0, 1.0)).unwrap();
        let second = store.add_obstacle(Point::new(2.0, 2.0)).unwrap();
        assert_eq!(first, ObstacleId(60));
        assert_eq!(second, ObstacleId(61));
    }

    #[test]
    fn new_agent_has_zero_velocity_and_flat_pose() {
        let store = AgentStateStore::new();
        let id = store.add_agent(Point::new(12.0, 34.0)).unwrap();
        let entry = store.agent(id).unwrap();
        assert_eq!(entry.velocity, Velocity::ZERO);
        assert_eq!(entry.pose, Pose::at(Point::new(12.0, 34.0)));
    }

    #[test]
    fn placement_outside_arena_is_rejected() {
        let store = AgentStateStore::new();
        let result = store.add_agent(Point::new(ARENA_WIDTH + 1.0, 10.0));
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
        let result = store.add_obstacle(Point::new(f64::NAN, 10.0));
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
        assert_eq!(store.agent_count(), 0);
        assert_eq!(store.obstacle_count(), 0);
    }

    #[test]
    fn creation_is_refused_while_running() {
        let store = AgentStateStore::new();
        store.mark_running().unwrap();
        assert_eq!(
            store.add_agent(Point::new(1.0, 1.0)),
            Err(SimError::not_allowed("add agent"))
        );
        assert_eq!(
            store.add_obstacle(Point::new(1.0, 1.0)),
            Err(SimError::not_allowed("add obstacle"))
        );
        assert_eq!(store.reset(), Err(SimError::not_allowed("reset")));
    }

    #[test]
    fn set_velocity_requires_running() {
        let store = AgentStateStore::new();
        let id = store.add_agent(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(
            store.set_velocity(id, Velocity::new(1.0, 1.0)),
            Err(SimError::NotRunning)
        );
        assert_eq!(store.agent_velocity(id), Some(Velocity::ZERO));
    }

    #[test]
    fn unknown_agent_velocity_is_rejected_without_insert() {
        let (store, _) = running_store_with_agent(Point::new(1.0, 1.0));
        let result = store.set_velocity(AgentId(42), Velocity::new(5.0, 5.0));
        assert_eq!(
            result,
            Err(SimError::UnknownAgent {
                identifier: String::from("42")
            })
        );
        assert_eq!(store.agent_count(), 1);
        assert!(store.agent(AgentId(42)).is_none());
    }

    #[test]
    fn last_velocity_write_wins() {
        let (store, id) = running_store_with_agent(Point::new(1.0, 1.0));
        store.set_velocity(id, Velocity::new(1.0, 2.0)).unwrap();
        store.set_velocity(id, Velocity::new(-3.0, 4.0)).unwrap();
        assert_eq!(store.agent_velocity(id), Some(Velocity::new(-3.0, 4.0)));
    }

    #[test]
    fn fifty_ticks_at_fifty_units_moves_fifty() {
        let (store, id) = running_store_with_agent(Point::new(100.0, 100.0));
        store.set_velocity(id, Velocity::new(50.0, 0.0)).unwrap();
        for _ in 0..50 {
            store.integrate_tick(VELOCITY_SCALE);
        }
        let pose = store.agent_pose(id).unwrap();
        assert_close(pose.x, 150.0);
        assert_close(pose.y, 100.0);
        assert_close(pose.theta, 0.0);
    }

    #[test]
    fn positive_vy_moves_up_the_screen() {
        let (store, id) = running_store_with_agent(Point::new(100.0, 100.0));
        store.set_velocity(id, Velocity::new(0.0, 50.0)).unwrap();
        store.integrate_tick(VELOCITY_SCALE);
        assert_close(store.agent_pose(id).unwrap().y, 99.0);
    }

    #[test]
    fn overshoot_in_one_tick_is_clamped() {
        let (store, id) = running_store_with_agent(Point::new(950.0, 5.0));
        store.set_velocity(id, Velocity::new(1.0e6, 1.0e6)).unwrap();
        store.integrate_tick(VELOCITY_SCALE);
        let pose = store.agent_pose(id).unwrap();
        assert_close(pose.x, ARENA_WIDTH);
        assert_close(pose.y, 0.0);

        store.set_velocity(id, Velocity::new(-1.0e6, -1.0e6)).unwrap();
        store.integrate_tick(VELOCITY_SCALE);
        let pose = store.agent_pose(id).unwrap();
        assert_close(pose.x, 0.0);
        assert_close(pose.y, ARENA_HEIGHT);
    }

    #[test]
    fn obstacles_never_move() {
        let (store, id) = running_store_with_agent(Point::new(10.0, 10.0));
        store.mark_stopped().unwrap();
        let obstacle = store.add_obstacle(Point::new(500.0, 500.0)).unwrap();
        store.mark_running().unwrap();
        store.set_velocity(id, Velocity::new(100.0, 100.0)).unwrap();
        for _ in 0..10 {
            store.integrate_tick(VELOCITY_SCALE);
        }
        assert_eq!(
            store.obstacle_pose(obstacle),
            Some(Pose::at(Point::new(500.0, 500.0)))
        );
    }

    #[test]
    fn snapshot_lists_agents_then_obstacles() {
        let store = AgentStateStore::new();
        let obstacle = store.add_obstacle(Point::new(5.0, 5.0)).unwrap();
        let first = store.add_agent(Point::new(1.0, 1.0)).unwrap();
        let second = store.add_agent(Point::new(2.0, 2.0)).unwrap();
        let ids: Vec<_> = store.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec![
                EntityId::from(first),
                EntityId::from(second),
                EntityId::from(obstacle)
            ]
        );
        let snap = store.position_snapshot();
        assert_eq!(snap.ids.len(), snap.poses.len());
    }

    #[test]
    fn mark_stopped_zeroes_every_velocity() {
        let (store, id) = running_store_with_agent(Point::new(1.0, 1.0));
        store.set_velocity(id, Velocity::new(7.0, 7.0)).unwrap();
        assert_eq!(store.mark_stopped(), Ok(1));
        assert_eq!(store.agent_velocity(id), Some(Velocity::ZERO));
        assert!(!store.is_running());
        assert_eq!(store.mark_stopped(), Err(SimError::NotRunning));
    }

    #[test]
    fn mark_running_twice_is_refused() {
        let store = AgentStateStore::new();
        store.mark_running().unwrap();
        assert_eq!(store.mark_running(), Err(SimError::not_allowed("start")));
    }

    #[test]
    fn reset_clears_maps_and_counters() {
        let store = AgentStateStore::new();
        for _ in 0..3 {
            store.add_agent(Point::new(1.0, 1.0)).unwrap();
            store.add_obstacle(Point::new(2.0, 2.0)).unwrap();
        }
        store.reset().unwrap();
        assert_eq!(store.agent_count(), 0);
        assert_eq!(store.obstacle_count(), 0);
        assert_eq!(store.add_agent(Point::new(1.0, 1.0)), Ok(AgentId(1)));
        assert_eq!(store.add_obstacle(Point::new(1.0, 1.0)), Ok(ObstacleId(60)));
    }
}
