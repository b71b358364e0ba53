//! Shared application state for the operator API server.

use std::sync::Arc;

use swarmsim_core::controller::SimulationController;
use swarmsim_core::fleet::InMemoryFleetRegistry;

/// Everything a handler can reach.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The simulation the API drives.
    pub controller: Arc<SimulationController>,
    /// Local view of the connected-agent mapping.
    pub fleet: Arc<InMemoryFleetRegistry>,
}

impl AppState {
    /// Bundle a controller with the registry it updates.
    pub const fn new(
        controller: Arc<SimulationController>,
        fleet: Arc<InMemoryFleetRegistry>,
    ) -> Self {
        Self { controller, fleet }
    }
}
