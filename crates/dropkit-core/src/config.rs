//! Container configuration options.

use serde::{Deserialize, Serialize};

/// Layout axis used when computing insertion indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Items stack top to bottom; insertion compares pointer Y.
    #[default]
    Vertical,
    /// Items flow left to right; insertion compares pointer X.
    Horizontal,
}

/// Options accepted by a container instance.
///
/// String options keep their raw wire form (comma-separated ids,
/// space-separated classes) and are parsed on access, so a host can
/// pass attribute values through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Comma-separated ids of peer containers whose items this
    /// container accepts. Empty means no foreign drops.
    pub accept_from: String,
    /// Whether a dropped item is materialized in the container. When
    /// false, the placeholder is retained instead.
    pub add_on_drop: bool,
    /// Whether the dragged item is duplicated rather than moved.
    pub copy: bool,
    /// Space-separated class names applied to the placeholder.
    pub placeholder_class: String,
    /// Whether internal reordering is permitted.
    pub sortable: bool,
    /// Layout axis for insertion-index computation.
    pub orientation: Orientation,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            accept_from: String::new(),
            add_on_drop: true,
            copy: true,
            placeholder_class: String::new(),
            sortable: true,
            orientation: Orientation::Vertical,
        }
    }
}

impl ContainerConfig {
    /// Parsed `accept_from` ids, trimmed, empties dropped.
    pub fn accept_from_ids(&self) -> impl Iterator<Item = &str> {
        self.accept_from
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Check whether this container accepts items from a source id.
    pub fn accepts_from(&self, source_id: &str) -> bool {
        self.accept_from_ids().any(|id| id == source_id)
    }

    /// Parsed placeholder class names.
    pub fn placeholder_classes(&self) -> impl Iterator<Item = &str> {
        self.placeholder_class.split_whitespace()
    }
}
