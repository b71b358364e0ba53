//! Operator API server for the Swarm Sim agent simulator.
//!
//! This crate provides an Axum HTTP server that exposes the simulation's
//! command surface and read views:
//!
//! - **Lifecycle** endpoints (start, stop, reset)
//! - **Arena edits** (place agents and obstacles while stopped)
//! - **Runtime input** (leader selection, velocity commands)
//! - **Reads** (status, position snapshot, connected-fleet mapping)
//!
//! Rejected commands come back as JSON errors with a status code derived
//! from the [`SimError`](swarmsim_core::error::SimError) variant.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
