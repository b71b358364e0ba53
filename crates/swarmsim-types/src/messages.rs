//! Messages exchanged with external collaborators.
//!
//! Inbound: [`VelocityCommand`] (from the fleet controller) and
//! [`SelectionInput`] (from whatever front end the operator clicks in).
//! Outbound: [`PositionSnapshot`] (to the tracker) and [`LeaderChanged`]
//! (to leader-following consumers).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::{Point, Pose, Velocity};
use crate::ids::{AgentId, EntityId};

// ---------------------------------------------------------------------------
// Inbound velocity command
// ---------------------------------------------------------------------------

/// How an inbound command names its agent.
///
/// Fleet controllers send either the integer id or its string form
/// (`"3"`), so both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum AgentIdentifier {
    /// Integer form. Negative or out-of-range values decode but never
    /// resolve.
    Numeric(i64),
    /// String form; must parse as an integer to resolve.
    Name(String),
}

impl AgentIdentifier {
    /// Resolve to an [`AgentId`], or `None` if the string form does not
    /// parse. Whether the id names a live agent is for the store to decide.
    pub fn resolve(&self) -> Option<AgentId> {
        match self {
            Self::Numeric(id) => u32::try_from(*id).ok().map(AgentId),
            Self::Name(name) => name.trim().parse::<u32>().ok().map(AgentId),
        }
    }
}

impl core::fmt::Display for AgentIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<AgentId> for AgentIdentifier {
    fn from(id: AgentId) -> Self {
        Self::Numeric(i64::from(id.0))
    }
}

/// Linear part of a velocity command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LinearVelocity {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (positive is up).
    pub y: f64,
}

/// An inbound velocity command for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VelocityCommand {
    /// The agent the command targets.
    pub agent_identifier: AgentIdentifier,
    /// Requested linear velocity.
    pub linear: LinearVelocity,
}

impl VelocityCommand {
    /// Build a command for `agent` with velocity `(x, y)`.
    pub fn new(agent: impl Into<AgentIdentifier>, x: f64, y: f64) -> Self {
        Self {
            agent_identifier: agent.into(),
            linear: LinearVelocity { x, y },
        }
    }

    /// The commanded velocity as a [`Velocity`] value.
    pub const fn velocity(&self) -> Velocity {
        Velocity::new(self.linear.x, self.linear.y)
    }
}

// ---------------------------------------------------------------------------
// Outbound position snapshot
// ---------------------------------------------------------------------------

/// Positions of every agent and obstacle at one point in time.
///
/// `ids` and `poses` are index-aligned and always the same length. Agents
/// come first in ascending id order, then obstacles in ascending id order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PositionSnapshot {
    /// Entity ids.
    pub ids: Vec<EntityId>,
    /// Entity poses, `poses[i]` belongs to `ids[i]`.
    pub poses: Vec<Pose>,
}

impl PositionSnapshot {
    /// Split `(id, pose)` pairs into the parallel-sequence form.
    pub fn from_entries(entries: impl IntoIterator<Item = (EntityId, Pose)>) -> Self {
        let (ids, poses) = entries.into_iter().unzip();
        Self { ids, poses }
    }

    /// Number of entities in the snapshot.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the snapshot contains no entities.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over `(id, pose)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Pose)> + '_ {
        self.ids.iter().copied().zip(self.poses.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Outbound leader change
// ---------------------------------------------------------------------------

/// Notification that the designated leader changed (or was re-confirmed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LeaderChanged {
    /// Agent id, or [`LeaderChanged::NO_LEADER`].
    pub id: i64,
    /// Pose carried with the event.
    pub pose: Pose,
}

impl LeaderChanged {
    /// Sentinel id meaning "no leader".
    pub const NO_LEADER: i64 = -1;

    /// An event naming `agent` with `pose`.
    pub fn new(agent: AgentId, pose: Pose) -> Self {
        Self {
            id: i64::from(agent.into_inner()),
            pose,
        }
    }

    /// Decode the id field, mapping the sentinel (or any negative value)
    /// to `None`.
    pub fn leader(&self) -> Option<AgentId> {
        u32::try_from(self.id).ok().map(AgentId)
    }
}

// ---------------------------------------------------------------------------
// Selection input
// ---------------------------------------------------------------------------

/// Which pointer button produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MouseButton {
    /// Left / primary button. Only this one selects.
    #[default]
    Primary,
    /// Right / secondary button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A pointer press at a point in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SelectionInput {
    /// Horizontal coordinate of the press.
    pub x: f64,
    /// Vertical coordinate of the press.
    pub y: f64,
    /// Button that was pressed.
    #[serde(default)]
    pub button: MouseButton,
}

impl SelectionInput {
    /// A primary-button press at `point`.
    pub const fn primary(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            button: MouseButton::Primary,
        }
    }

    /// The press location.
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
