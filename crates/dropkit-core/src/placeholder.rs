//! In-place marker showing the pending drop position.

use crate::container::Container;
use crate::resolve;
use dropkit_dom::{Document, DomResult, NodeId};

/// Class every placeholder carries, in addition to the target
/// container's configured `placeholder_class` list.
pub const PLACEHOLDER_CLASS: &str = "drag-placeholder";

/// Owns the single marker element for the active session.
///
/// The placeholder exists in exactly one container at a time; moving
/// it removes the previous placement first.
#[derive(Debug, Default)]
pub struct PlaceholderManager {
    node: Option<NodeId>,
    /// Current `(container id, filtered index)` placement.
    placement: Option<(String, usize)>,
}

impl PlaceholderManager {
    /// Create a new, empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// The marker node, while shown.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Insert or move the marker to `index` within the target's
    /// items. `index` is expressed in the filtered sibling list; the
    /// dragged item (`skip_item`) and the marker itself are skipped
    /// when mapping it to a child-list position.
    ///
    /// Repeated calls with an unchanged `(container, index)` are
    /// no-ops, so sub-pixel pointer jitter causes no reinsertion.
    pub fn show(
        &mut self,
        doc: &mut Document,
        target: &Container,
        index: usize,
        skip_item: Option<NodeId>,
    ) -> DomResult<()> {
        let unchanged = self
            .placement
            .as_ref()
            .is_some_and(|(c, i)| *c == target.id && *i == index);
        if unchanged
            && self
                .node
                .is_some_and(|n| doc.parent(n).ok().flatten() == Some(target.root))
        {
            return Ok(());
        }

        let node = match self.node {
            Some(node) if doc.exists(node) => node,
            _ => doc.create_element([PLACEHOLDER_CLASS]),
        };
        // Placeholder classes follow the container it is shown in
        let mut classes = vec![PLACEHOLDER_CLASS.to_string()];
        classes.extend(target.config.placeholder_classes().map(String::from));
        doc.get_mut(node)?.set_classes(classes);

        doc.detach(node)?;
        let mut skip = vec![node];
        skip.extend(skip_item);
        let actual = resolve::actual_child_index(doc, target.root, index, &skip)?;
        doc.insert_child(target.root, actual, node)?;

        self.node = Some(node);
        self.placement = Some((target.id.clone(), index));
        Ok(())
    }

    /// Remove the marker from the document entirely.
    pub fn hide(&mut self, doc: &mut Document) {
        if let Some(node) = self.node.take() {
            let _ = doc.remove_subtree(node);
        }
        self.placement = None;
    }

    /// Forget the marker without removing it, leaving it in place.
    /// Used on drop into a container with `add_on_drop = false`.
    pub fn release(&mut self) -> Option<NodeId> {
        self.placement = None;
        self.node.take()
    }
}
