//! A registered drop container.

use crate::config::ContainerConfig;
use dropkit_dom::NodeId;

/// One sortable/droppable root.
///
/// Draggable items are the direct children of `root`; they have no
/// identity beyond their tree position.
#[derive(Debug, Clone)]
pub struct Container {
    /// Identifier used in peers' `accept_from` lists.
    pub id: String,
    /// Root element in the document.
    pub root: NodeId,
    /// Behaviour options.
    pub config: ContainerConfig,
}

impl Container {
    /// Create a container over an existing root element.
    pub fn new(id: impl Into<String>, root: NodeId, config: ContainerConfig) -> Self {
        Self {
            id: id.into(),
            root,
            config,
        }
    }

    /// Check whether this container accepts items dragged out of
    /// `source_id`. A container always accepts its own items.
    pub fn accepts_from(&self, source_id: &str) -> bool {
        self.id == source_id || self.config.accepts_from(source_id)
    }
}
