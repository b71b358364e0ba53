//! Error types for the simulation kernel.
//!
//! Every variant of [`SimError`] is a local, recoverable condition that is
//! reported to the caller. None of them ends the process.

/// Errors returned by store, ingress and controller operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The operation needs a running simulation, but it is stopped.
    #[error("simulation is not running")]
    NotRunning,

    /// The command referenced an agent that does not exist or an
    /// identifier that does not resolve to an agent id.
    #[error("unknown agent: {identifier}")]
    UnknownAgent {
        /// The identifier as it was received.
        identifier: String,
    },

    /// The operation is only legal while the simulation is stopped.
    #[error("{operation} is not allowed while the simulation is running")]
    OperationNotAllowed {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// A position or velocity was non-finite or outside the arena.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },
}

impl SimError {
    /// Shorthand for [`SimError::OperationNotAllowed`].
    pub(crate) const fn not_allowed(operation: &'static str) -> Self {
        Self::OperationNotAllowed { operation }
    }
}
