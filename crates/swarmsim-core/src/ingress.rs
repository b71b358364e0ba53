//! Velocity command ingestion.
//!
//! [`VelocityIngress`] is the asynchronous entry point for fleet-controller
//! commands. It is cheap to clone and safe to call from any task,
//! concurrently with the integrator and publisher loops.

use std::sync::Arc;

use swarmsim_types::{AgentId, VelocityCommand};
use tracing::debug;

use crate::error::SimError;
use crate::store::AgentStateStore;

/// What happened to an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressOutcome {
    /// The agent's velocity was overwritten.
    Applied(AgentId),
    /// The simulation is stopped, so the command was discarded.
    Ignored,
}

/// Applies inbound velocity commands to the store (last write wins).
#[derive(Debug, Clone)]
pub struct VelocityIngress {
    store: Arc<AgentStateStore>,
}

impl VelocityIngress {
    /// Create an ingress path writing into `store`.
    pub const fn new(store: Arc<AgentStateStore>) -> Self {
        Self { store }
    }

    /// Apply one command.
    ///
    /// While the simulation is stopped every command is silently ignored.
    ///
    /// # Errors
    ///
    /// - [`SimError::UnknownAgent`] if the identifier does not resolve or
    ///   names no live agent. The store is left unchanged.
    /// - [`SimError::InvalidInput`] if a velocity component is not finite.
    pub fn apply(&self, command: &VelocityCommand) -> Result<IngressOutcome, SimError> {
        if !self.store.is_running() {
            debug!(agent = %command.agent_identifier, "Simulation stopped, velocity command ignored");
            return Ok(IngressOutcome::Ignored);
        }

        let velocity = command.velocity();
        if !velocity.is_finite() {
            return Err(SimError::InvalidInput {
                reason: format!(
                    "velocity ({}, {}) for agent {} is not finite",
                    velocity.vx, velocity.vy, command.agent_identifier
                ),
            });
        }

        let id = command
            .agent_identifier
            .resolve()
            .ok_or_else(|| SimError::UnknownAgent {
                identifier: command.agent_identifier.to_string(),
            })?;

        match self.store.set_velocity(id, velocity) {
            Ok(()) => Ok(IngressOutcome::Applied(id)),
            // Stopped between the fast-path check and the write.
            Err(SimError::NotRunning) => {
                debug!(agent_id = %id, "Simulation stopped, velocity command ignored");
                Ok(IngressOutcome::Ignored)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use swarmsim_types::{AgentIdentifier, Point, Velocity};

    use super::*;

    fn setup(running: bool) -> (Arc<AgentStateStore>, VelocityIngress, AgentId) {
        let store = Arc::new(AgentStateStore::new());
        let id = store.add_agent(Point::new(10.0, 10.0)).unwrap();
        if running {
            store.mark_running().unwrap();
        }
        let ingress = VelocityIngress::new(Arc::clone(&store));
        (store, ingress, id)
    }

    #[test]
    fn applies_numeric_and_string_identifiers() {
        let (store, ingress, id) = setup(true);
        let outcome = ingress.apply(&VelocityCommand::new(id, 3.0, 4.0)).unwrap();
        assert_eq!(outcome, IngressOutcome::Applied(id));
        assert_eq!(store.agent_velocity(id), Some(Velocity::new(3.0, 4.0)));

        let named = VelocityCommand::new(AgentIdentifier::Name(id.to_string()), -1.0, 0.5);
        assert_eq!(ingress.apply(&named).unwrap(), IngressOutcome::Applied(id));
        assert_eq!(store.agent_velocity(id), Some(Velocity::new(-1.0, 0.5)));
    }

    #[test]
    fn ignored_while_stopped() {
        let (store, ingress, id) = setup(false);
        let outcome = ingress.apply(&VelocityCommand::new(id, 3.0, 4.0)).unwrap();
        assert_eq!(outcome, IngressOutcome::Ignored);
        assert_eq!(store.agent_velocity(id), Some(Velocity::ZERO));
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let (store, ingress, _) = setup(true);
        let result = ingress.apply(&VelocityCommand::new(AgentId(99), 1.0, 1.0));
        assert_eq!(
            result,
            Err(SimError::UnknownAgent {
                identifier: String::from("99")
            })
        );
        assert_eq!(store.agent_count(), 1);
    }

    #[test]
    fn unresolvable_name_is_unknown_agent() {
        let (_, ingress, _) = setup(true);
        let command = VelocityCommand::new(AgentIdentifier::Name(String::from("blue")), 1.0, 1.0);
        assert!(matches!(
            ingress.apply(&command),
            Err(SimError::UnknownAgent { identifier }) if identifier == "blue"
        ));
    }

    #[test]
    fn negative_numeric_identifier_is_unknown_agent() {
        let (_, ingress, _) = setup(true);
        let command = VelocityCommand::new(AgentIdentifier::Numeric(-3), 1.0, 1.0);
        assert_eq!(
            ingress.apply(&command),
            Err(SimError::UnknownAgent {
                identifier: String::from("-3")
            })
        );
    }

    #[test]
    fn non_finite_velocity_is_rejected() {
        let (store, ingress, id) = setup(true);
        let result = ingress.apply(&VelocityCommand::new(id, f64::NAN, 0.0));
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
        assert_eq!(store.agent_velocity(id), Some(Velocity::ZERO));
    }
}
