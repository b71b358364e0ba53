//! Fleet registry that mirrors every change onto the bus.

use std::sync::Arc;

use swarmsim_core::fleet::{FleetMap, FleetRegistry, InMemoryFleetRegistry};
use swarmsim_core::sink::MessageSink;
use tracing::debug;

/// Keeps the local mapping for the operator API and forwards each update
/// to an outbound sink. A cleared registry is announced as an empty map.
pub struct PublishingFleetRegistry {
    local: Arc<InMemoryFleetRegistry>,
    sink: Arc<dyn MessageSink<FleetMap>>,
}

impl PublishingFleetRegistry {
    /// Wrap `local`, forwarding updates to `sink`.
    pub const fn new(
        local: Arc<InMemoryFleetRegistry>,
        sink: Arc<dyn MessageSink<FleetMap>>,
    ) -> Self {
        Self { local, sink }
    }

    fn forward(&self, connected: FleetMap) {
        let agents = connected.len();
        if let Err(e) = self.sink.publish(connected) {
            debug!(error = %e, agents, "Fleet update dropped");
        }
    }
}

impl FleetRegistry for PublishingFleetRegistry {
    fn replace(&self, connected: FleetMap) {
        self.local.replace(connected.clone());
        self.forward(connected);
    }

    fn clear(&self) {
        self.local.clear();
        self.forward(FleetMap::new());
    }
}
