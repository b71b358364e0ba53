//! Simulation kernel for the Swarm Sim agent simulator.
//!
//! Agents move across a bounded arena under externally commanded
//! velocities. Two periodic loops share one state store: a 100 Hz motion
//! integrator and a 50 Hz position publisher. Velocity commands and leader
//! selections arrive concurrently with both.
//!
//! # Modules
//!
//! - [`store`] -- [`AgentStateStore`], the only shared mutable state,
//!   including the running flag.
//! - [`ingress`] -- [`VelocityIngress`] applies inbound velocity commands.
//! - [`integrator`] -- [`MotionIntegrator`] periodic motion loop.
//! - [`publisher`] -- [`PositionPublisher`] periodic snapshot loop.
//! - [`leader`] -- Hit-testing and the leader transition table.
//! - [`controller`] -- [`SimulationController`] lifecycle and command surface.
//! - [`sink`] -- Best-effort outbound [`MessageSink`]s.
//! - [`fleet`] -- Connected-agent registry side channel.
//! - [`config`] -- Configuration loading from `swarmsim-config.yaml`.
//! - [`error`] -- [`SimError`].
//!
//! [`AgentStateStore`]: store::AgentStateStore
//! [`VelocityIngress`]: ingress::VelocityIngress
//! [`MotionIntegrator`]: integrator::MotionIntegrator
//! [`PositionPublisher`]: publisher::PositionPublisher
//! [`SimulationController`]: controller::SimulationController
//! [`MessageSink`]: sink::MessageSink
//! [`SimError`]: error::SimError

pub mod config;
pub mod controller;
pub mod error;
pub mod fleet;
pub mod ingress;
pub mod integrator;
pub mod leader;
pub mod publisher;
pub mod sink;
pub mod store;
