//! Leader selection by spatial hit-testing.
//!
//! [`select`] is a pure function from the current [`LeaderState`], the
//! agent poses and a selection point to the next state and the event to
//! broadcast. It knows nothing about windows, pointers or locks. The
//! controller feeds it and applies the result.
//!
//! | current | hit | next | event |
//! |---------|-----|------|-------|
//! | none | agent `A` | `A` | `A` at `A`'s pose |
//! | none | nothing | none | no event |
//! | `L` | `L` | none | `L` at the click point |
//! | `L` | agent `A != L` | `A` | `A` at `A`'s pose |
//! | `L` | nothing | `L` | `L` at the click point |
//!
//! The last row re-announces the current leader with the click point as
//! its pose even though leadership does not change.

use swarmsim_types::{AgentId, LeaderChanged, Point, Pose};

/// Selection radius around each agent's centre.
pub const SELECTION_RADIUS: f64 = 40.0;

/// Which agent, if any, is the designated leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderState {
    /// No agent is leading.
    #[default]
    NoLeader,
    /// The given agent is leading.
    LeaderSelected(AgentId),
}

impl LeaderState {
    /// The current leader, if any.
    pub const fn leader(&self) -> Option<AgentId> {
        match self {
            Self::NoLeader => None,
            Self::LeaderSelected(id) => Some(*id),
        }
    }
}

/// Find the first agent (in the given order) whose centre is strictly
/// closer than [`SELECTION_RADIUS`] to `point`.
pub fn hit_test(agents: &[(AgentId, Pose)], point: Point) -> Option<(AgentId, Pose)> {
    let radius_sq = SELECTION_RADIUS * SELECTION_RADIUS;
    agents
        .iter()
        .find(|(_, pose)| pose.point().squared_distance(&point) < radius_sq)
        .copied()
}

/// Compute the leader transition for a selection at `point`.
///
/// `agents` must be in a stable order (the store yields ascending ids);
/// when several agents overlap the point, the first one wins.
pub fn select(
    current: LeaderState,
    agents: &[(AgentId, Pose)],
    point: Point,
) -> (LeaderState, Option<LeaderChanged>) {
    let click = Pose::at(point);
    match (current, hit_test(agents, point)) {
        (LeaderState::NoLeader, None) => (LeaderState::NoLeader, None),
        (LeaderState::NoLeader, Some((hit, pose))) => (
            LeaderState::LeaderSelected(hit),
            Some(LeaderChanged::new(hit, pose)),
        ),
        (LeaderState::LeaderSelected(leader), Some((hit, _))) if hit == leader => {
            (LeaderState::NoLeader, Some(LeaderChanged::new(leader, click)))
        }
        (LeaderState::LeaderSelected(_), Some((hit, pose))) => (
            LeaderState::LeaderSelected(hit),
            Some(LeaderChanged::new(hit, pose)),
        ),
        (LeaderState::LeaderSelected(leader), None) => (
            LeaderState::LeaderSelected(leader),
            Some(LeaderChanged::new(leader, click)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: u32, x: f64, y: f64) -> (AgentId, Pose) {
        (AgentId(id), Pose::at(Point::new(x, y)))
    }

    #[test]
    fn hit_selects_leader_with_agent_pose() {
        let agents = [agent(1, 100.0, 100.0)];
        let (next, event) = select(LeaderState::NoLeader, &agents, Point::new(105.0, 105.0));
        assert_eq!(next, LeaderState::LeaderSelected(AgentId(1)));
        assert_eq!(
            event,
            Some(LeaderChanged::new(
                AgentId(1),
                Pose::at(Point::new(100.0, 100.0))
            ))
        );
    }

    #[test]
    fn miss_without_leader_emits_nothing() {
        let agents = [agent(1, 100.0, 100.0)];
        let (next, event) = select(LeaderState::NoLeader, &agents, Point::new(500.0, 500.0));
        assert_eq!(next, LeaderState::NoLeader);
        assert_eq!(event, None);
    }

    #[test]
    fn miss_with_leader_reannounces_leader_at_click_point() {
        let agents = [agent(1, 100.0, 100.0)];
        let current = LeaderState::LeaderSelected(AgentId(1));
        let (next, event) = select(current, &agents, Point::new(500.0, 500.0));
        assert_eq!(next, current);
        assert_eq!(
            event,
            Some(LeaderChanged::new(
                AgentId(1),
                Pose::at(Point::new(500.0, 500.0))
            ))
        );
    }

    #[test]
    fn hitting_current_leader_clears_it() {
        let agents = [agent(1, 100.0, 100.0)];
        let current = LeaderState::LeaderSelected(AgentId(1));
        let (next, event) = select(current, &agents, Point::new(90.0, 100.0));
        assert_eq!(next, LeaderState::NoLeader);
        assert_eq!(
            event,
            Some(LeaderChanged::new(
                AgentId(1),
                Pose::at(Point::new(90.0, 100.0))
            ))
        );
    }

    #[test]
    fn hitting_another_agent_switches_leader() {
        let agents = [agent(1, 100.0, 100.0), agent(2, 300.0, 300.0)];
        let current = LeaderState::LeaderSelected(AgentId(1));
        let (next, event) = select(current, &agents, Point::new(310.0, 290.0));
        assert_eq!(next, LeaderState::LeaderSelected(AgentId(2)));
        assert_eq!(event.and_then(|e| e.leader()), Some(AgentId(2)));
        assert_eq!(
            event.map(|e| e.pose),
            Some(Pose::at(Point::new(300.0, 300.0)))
        );
    }

    #[test]
    fn radius_boundary_is_exclusive() {
        let agents = [agent(1, 100.0, 100.0)];
        assert!(hit_test(&agents, Point::new(140.0, 100.0)).is_none());
        assert!(hit_test(&agents, Point::new(139.9, 100.0)).is_some());
    }

    #[test]
    fn overlapping_agents_pick_first_in_order() {
        let agents = [agent(1, 100.0, 100.0), agent(2, 101.0, 100.0)];
        let hit = hit_test(&agents, Point::new(100.5, 100.0));
        assert_eq!(hit.map(|(id, _)| id), Some(AgentId(1)));
    }

    #[test]
    fn empty_arena_never_hits() {
        let current = LeaderState::LeaderSelected(AgentId(3));
        let (next, event) = select(current, &[], Point::new(1.0, 1.0));
        assert_eq!(next, current);
        assert_eq!(event.and_then(|e| e.leader()), Some(AgentId(3)));
    }

    #[test]
    fn leader_state_exposes_only_the_agent_id() {
        assert_eq!(LeaderState::default(), LeaderState::NoLeader);
        assert_eq!(LeaderState::NoLeader.leader(), None);
        assert_eq!(
            LeaderState::LeaderSelected(AgentId(3)).leader(),
            Some(AgentId(3))
        );
    }
}
