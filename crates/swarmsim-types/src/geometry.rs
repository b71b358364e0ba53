//! Planar value types: [`Pose`], [`Velocity`], [`Point`] and the arena
//! bounds every position is kept inside.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Width of the arena. Valid x coordinates are `0.0..=ARENA_WIDTH`.
pub const ARENA_WIDTH: f64 = 960.0;

/// Height of the arena. Valid y coordinates are `0.0..=ARENA_HEIGHT`.
pub const ARENA_HEIGHT: f64 = 800.0;

/// A 2-D pose. `theta` is carried for the tracker's message shape but is
/// always `0.0` for entities created by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pose {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward, screen convention).
    pub y: f64,
    /// Heading in radians.
    pub theta: f64,
}

impl Pose {
    /// A pose at `point` with zero heading.
    pub const fn at(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            theta: 0.0,
        }
    }

    /// The position part of the pose.
    pub const fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Linear velocity of an agent, in command units.
///
/// `vy` is positive "up", so the integrator subtracts it from the
/// screen-space y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Velocity {
    /// Horizontal component.
    pub vx: f64,
    /// Vertical component.
    pub vy: f64,
}

impl Velocity {
    /// The velocity every agent starts with and returns to on stop.
    pub const ZERO: Self = Self { vx: 0.0, vy: 0.0 };

    /// Create a velocity from its components.
    pub const fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    /// Whether both components are finite numbers.
    pub const fn is_finite(&self) -> bool {
        self.vx.is_finite() && self.vy.is_finite()
    }
}

/// A point on the plane, used for placement and selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn squared_distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Whether the point is finite and lies inside the arena (edges
    /// included).
    pub fn is_within_arena(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (0.0..=ARENA_WIDTH).contains(&self.x)
            && (0.0..=ARENA_HEIGHT).contains(&self.y)
    }
}
