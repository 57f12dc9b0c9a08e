//! Process-wide container registry.
//!
//! An explicit object with an injectable lifecycle, owned by the
//! engine and passed by reference wherever acceptance rules need
//! resolving. Never a global singleton.

use crate::container::Container;
use std::collections::HashMap;

/// Mapping from container identifier to active container instance.
///
/// Registration order is preserved: it is the tie-break when the
/// pointer is over several overlapping containers at once.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: HashMap<String, Container>,
    order: Vec<String>,
}

impl ContainerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container. Re-registering an existing id replaces
    /// the previous entry in place, keeping its order slot.
    pub fn register(&mut self, container: Container) {
        if !self.containers.contains_key(&container.id) {
            self.order.push(container.id.clone());
        }
        self.containers.insert(container.id.clone(), container);
    }

    /// Unregister a container. No-op on unknown ids; mount/unmount
    /// order between containers carries no guarantee.
    pub fn unregister(&mut self, id: &str) {
        if self.containers.remove(id).is_some() {
            self.order.retain(|o| o != id);
        }
    }

    /// Look up a container by id.
    pub fn get(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    /// Whether an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Remove every registration.
    pub fn clear(&mut self) {
        self.containers.clear();
        self.order.clear();
    }

    /// Registered containers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.order.iter().filter_map(|id| self.containers.get(id))
    }

    /// Resolve a raw comma-separated id list into containers,
    /// preserving list order. Unknown ids are silently dropped and
    /// duplicates collapse onto their first occurrence.
    pub fn resolve(&self, id_list: &str) -> Vec<&Container> {
        let mut seen = Vec::new();
        id_list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|id| {
                if seen.contains(&id) {
                    return None;
                }
                seen.push(id);
                self.containers.get(id)
            })
            .collect()
    }

    /// Containers other than the source whose `accept_from` names the
    /// source, in registration order. The resolver's peer scan.
    pub fn peers_accepting(&self, source_id: &str) -> impl Iterator<Item = &Container> {
        self.iter()
            .filter(move |c| c.id != source_id && c.config.accepts_from(source_id))
    }
}
