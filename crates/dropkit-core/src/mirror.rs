//! Floating mirror that follows the pointer during a drag.

use dropkit_dom::{Document, DomError, DomResult, NodeId};
use kurbo::{Point, Rect, Vec2};

/// Class applied to the mirror clone so hosts can style it.
pub const MIRROR_CLASS: &str = "drag-mirror";

/// Owns the floating visual clone of the dragged item.
///
/// The clone lives directly under the document root, outside every
/// container, so it never participates in sibling hit-testing. The
/// original item stays in place, hidden, until the session ends.
#[derive(Debug, Default)]
pub struct MirrorManager {
    mirror: Option<NodeId>,
    original: Option<NodeId>,
    grab_offset: Vec2,
}

impl MirrorManager {
    /// Create a new, empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirror node, while a session is active.
    pub fn node(&self) -> Option<NodeId> {
        self.mirror
    }

    /// Clone the dragged item, position the clone at the pointer and
    /// hide the original. Any previous mirror is destroyed first.
    pub fn create(&mut self, doc: &mut Document, item: NodeId, pointer: Point) -> DomResult<()> {
        self.destroy(doc);

        let bounds = doc.bounds(item)?;
        self.grab_offset = pointer - bounds.origin();

        let clone = doc.clone_subtree(item)?;
        if let Err(e) = self.attach(doc, item, clone, pointer, bounds) {
            // Partial creation: drop the clone again so nothing
            // detached-but-referenced survives.
            let _ = doc.remove_subtree(clone);
            return Err(e);
        }
        self.mirror = Some(clone);
        self.original = Some(item);
        Ok(())
    }

    fn attach(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        clone: NodeId,
        pointer: Point,
        bounds: Rect,
    ) -> DomResult<()> {
        doc.get_mut(clone)?.add_class(MIRROR_CLASS);
        doc.append_child(doc.root(), clone)?;
        doc.set_bounds(
            clone,
            Rect::from_origin_size(pointer - self.grab_offset, bounds.size()),
        )?;
        doc.get_mut(item)?.hidden = true;
        Ok(())
    }

    /// Reposition the mirror under the pointer, preserving the grab
    /// offset recorded at creation.
    pub fn move_to(&mut self, doc: &mut Document, pointer: Point) -> DomResult<()> {
        let Some(mirror) = self.mirror else {
            return Ok(());
        };
        let size = doc.bounds(mirror)?.size();
        doc.set_bounds(
            mirror,
            Rect::from_origin_size(pointer - self.grab_offset, size),
        )
    }

    /// Remove the mirror and restore the original item's visibility.
    ///
    /// Safe to call repeatedly, with no mirror, or after external
    /// code removed either node.
    pub fn destroy(&mut self, doc: &mut Document) {
        if let Some(mirror) = self.mirror.take() {
            if let Err(DomError::NodeNotFound(_)) = doc.remove_subtree(mirror) {
                log::debug!("mirror node already gone on destroy");
            }
        }
        if let Some(original) = self.original.take() {
            if let Ok(node) = doc.get_mut(original) {
                node.hidden = false;
            }
        }
        self.grab_offset = Vec2::ZERO;
    }
}
