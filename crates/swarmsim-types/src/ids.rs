//! Type-safe integer identifier wrappers.
//!
//! Agents and obstacles are numbered from two separate counters (agents
//! from [`AgentId::FIRST`], obstacles from [`ObstacleId::FIRST`]) so the
//! id spaces never overlap. Outbound snapshots flatten both into the
//! untyped [`EntityId`], which is what the external tracker consumes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a mobile agent.
    AgentId
}

define_id! {
    /// Identifier of a static obstacle.
    ObstacleId
}

define_id! {
    /// Untyped identifier carried in outbound position snapshots.
    ///
    /// Both agents and obstacles are reported as `EntityId`s; consumers
    /// tell them apart only by range.
    EntityId
}

impl AgentId {
    /// The first id handed out after construction or a reset.
    pub const FIRST: Self = Self(1);
}

impl ObstacleId {
    /// The first obstacle id handed out after construction or a reset.
    pub const FIRST: Self = Self(60);
}

impl From<AgentId> for EntityId {
    fn from(id: AgentId) -> Self {
        Self(id.0)
    }
}

impl From<ObstacleId> for EntityId {
    fn from(id: ObstacleId) -> Self {
        Self(id.0)
    }
}
