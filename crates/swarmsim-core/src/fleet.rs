//! Fleet registry side channel.
//!
//! Downstream fleet tooling expects a mapping of connected agents, keyed
//! and valued by the agent id in string form. The controller replaces the
//! whole mapping after every agent is added and clears it on reset.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use swarmsim_types::AgentId;

/// Connected-agent mapping: `"3" -> "3"` for every live agent.
pub type FleetMap = BTreeMap<String, String>;

/// A consumer of the connected-agent mapping.
pub trait FleetRegistry: Send + Sync {
    /// Replace the whole mapping with `connected`.
    fn replace(&self, connected: FleetMap);

    /// Remove the mapping entirely.
    fn clear(&self);
}

/// Build the registry mapping for a set of agents.
pub fn fleet_map(agents: impl IntoIterator<Item = AgentId>) -> FleetMap {
    agents
        .into_iter()
        .map(|id| {
            let key = id.to_string();
            (key.clone(), key)
        })
        .collect()
}

/// Registry that keeps the latest mapping in memory for local readers
/// (the operator API serves it at `GET /api/fleet`).
#[derive(Debug, Default)]
pub struct InMemoryFleetRegistry {
    connected: RwLock<FleetMap>,
}

impl InMemoryFleetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the current mapping.
    pub fn current(&self) -> FleetMap {
        self.connected.read().clone()
    }
}

impl FleetRegistry for InMemoryFleetRegistry {
    fn replace(&self, connected: FleetMap) {
        *self.connected.write() = connected;
    }

    fn clear(&self) {
        self.connected.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_uses_string_ids_for_key_and_value() {
        let map = fleet_map([AgentId(1), AgentId(2)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("2").map(String::as_str), Some("2"));
    }

    #[test]
    fn replace_is_wholesale() {
        let registry = InMemoryFleetRegistry::new();
        registry.replace(fleet_map([AgentId(1), AgentId(2)]));
        registry.replace(fleet_map([AgentId(3)]));
        let current = registry.current();
        assert_eq!(current.len(), 1);
        assert!(current.contains_key("3"));
    }

    #[test]
    fn clear_empties_mapping() {
        let registry = InMemoryFleetRegistry::new();
        registry.replace(fleet_map([AgentId(1)]));
        registry.clear();
        assert!(registry.current().is_empty());
    }
}
