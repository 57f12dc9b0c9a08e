//! Drop target resolution: which container, and at which index.

use crate::config::Orientation;
use crate::container::Container;
use crate::registry::ContainerRegistry;
use dropkit_dom::{Document, DomResult, NodeId};
use kurbo::{Point, Rect};

/// Result of resolving the pointer against the registered containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Target container id. `None` while the pointer is outside every
    /// container that would accept the drag; releasing there cancels.
    pub container: Option<String>,
    /// Insertion index among the target's items, counted with the
    /// dragged item and the placeholder excluded. Meaningless when
    /// `container` is `None`.
    pub index: usize,
}

impl DropTarget {
    /// The outside-everything result.
    pub fn none() -> Self {
        Self {
            container: None,
            index: 0,
        }
    }
}

/// Resolve the current pointer position to a target container and
/// insertion index.
///
/// Containers are tested in order: the source first, then peers whose
/// `accept_from` names the source, in registration order. The first
/// bounding-box hit wins, which makes overlap deterministic.
pub fn resolve_target(
    doc: &Document,
    registry: &ContainerRegistry,
    pointer: Point,
    source_id: &str,
    dragged_item: NodeId,
    original_index: usize,
    skip: &[NodeId],
) -> DomResult<DropTarget> {
    let Some(source) = registry.get(source_id) else {
        // Source unregistered mid-drag; nowhere to drop.
        return Ok(DropTarget::none());
    };

    if doc.contains_point(source.root, pointer)? {
        return resolve_index(doc, source, pointer, true, dragged_item, original_index, skip);
    }
    for peer in registry.peers_accepting(source_id) {
        if doc.contains_point(peer.root, pointer)? {
            return resolve_index(doc, peer, pointer, false, dragged_item, original_index, skip);
        }
    }
    Ok(DropTarget::none())
}

/// Compute the insertion index inside a container the pointer is over.
fn resolve_index(
    doc: &Document,
    container: &Container,
    pointer: Point,
    is_source: bool,
    dragged_item: NodeId,
    original_index: usize,
    skip: &[NodeId],
) -> DomResult<DropTarget> {
    let siblings = sibling_items(doc, container.root, is_source, dragged_item, skip)?;

    let index = if !container.config.sortable {
        if is_source {
            // No reordering inside a non-sortable source: the item
            // keeps its slot.
            original_index.min(siblings.len())
        } else {
            siblings.len()
        }
    } else {
        insertion_index(doc, &siblings, pointer, container.config.orientation)?
    };

    Ok(DropTarget {
        container: Some(container.id.clone()),
        index,
    })
}

/// Direct children eligible as insertion neighbours: the placeholder
/// is always excluded, and the dragged item is excluded from its own
/// source container to avoid a degenerate zero-width gap.
fn sibling_items(
    doc: &Document,
    root: NodeId,
    is_source: bool,
    dragged_item: NodeId,
    skip: &[NodeId],
) -> DomResult<Vec<NodeId>> {
    Ok(doc
        .children(root)?
        .iter()
        .copied()
        .filter(|id| !skip.contains(id))
        .filter(|id| !(is_source && *id == dragged_item))
        .collect())
}

/// First sibling whose midpoint lies past the pointer along the
/// layout axis; ties resolve to "before" that sibling. Appends at the
/// end when the pointer is past every midpoint.
fn insertion_index(
    doc: &Document,
    siblings: &[NodeId],
    pointer: Point,
    orientation: Orientation,
) -> DomResult<usize> {
    let pos = axis_value(pointer, orientation);
    for (i, sibling) in siblings.iter().enumerate() {
        if pos <= mid_value(doc.bounds(*sibling)?, orientation) {
            return Ok(i);
        }
    }
    Ok(siblings.len())
}

fn axis_value(point: Point, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Vertical => point.y,
        Orientation::Horizontal => point.x,
    }
}

fn mid_value(rect: Rect, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Vertical => rect.center().y,
        Orientation::Horizontal => rect.center().x,
    }
}

/// Map an insertion index expressed in the filtered sibling list back
/// to an actual child-list position, skipping the same nodes the
/// resolver skipped. Used when inserting the placeholder or the
/// dropped item.
pub fn actual_child_index(
    doc: &Document,
    root: NodeId,
    filtered_index: usize,
    skip: &[NodeId],
) -> DomResult<usize> {
    let children = doc.children(root)?;
    let mut seen = 0usize;
    for (actual, id) in children.iter().enumerate() {
        if skip.contains(id) {
            continue;
        }
        if seen == filtered_index {
            return Ok(actual);
        }
        seen += 1;
    }
    Ok(children.len())
}
