//! Shared type definitions for the Swarm Sim agent simulator.
//!
//! This crate is the single source of truth for the value types and wire
//! messages used across the workspace. Wire types flow downstream to
//! `TypeScript` via `ts-rs` for operator front ends.
//!
//! # Modules
//!
//! - [`ids`] -- Integer id wrappers for agents, obstacles and snapshot entities
//! - [`geometry`] -- `Pose`, `Velocity`, `Point` and the arena bounds
//! - [`messages`] -- Velocity commands, position snapshots, leader changes,
//!   selection input

pub mod geometry;
pub mod ids;
pub mod messages;

// Re-export all public types at crate root for convenience.
pub use geometry::{ARENA_HEIGHT, ARENA_WIDTH, Point, Pose, Velocity};
pub use ids::{AgentId, EntityId, ObstacleId};
pub use messages::{
    AgentIdentifier, LeaderChanged, LinearVelocity, MouseButton, PositionSnapshot,
    SelectionInput, VelocityCommand,
};
