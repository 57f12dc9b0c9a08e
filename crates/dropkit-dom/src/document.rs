//! Document: an arena of nodes with one implicit root.

use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A document holding the full element tree.
///
/// All lookups that can reference a removed node return
/// [`DomResult`]; callers on the pointer-event path degrade those
/// errors to a cancelled drag instead of propagating them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a fresh root node.
    pub fn new() -> Self {
        let root = Node::new(Vec::new());
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self { nodes, root: root_id }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the document, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element with the given classes.
    pub fn create_element<I, S>(&mut self, classes: I) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let node = Node::new(classes.into_iter().map(Into::into).collect());
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(&id).ok_or(DomError::NodeNotFound(id))
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(DomError::NodeNotFound(id))
    }

    /// Check whether a node exists.
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ordered children of a node.
    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        Ok(self.get(id)?.children())
    }

    /// Parent of a node, `None` if detached or the root.
    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        Ok(self.get(id)?.parent())
    }

    /// Position of a node within its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> DomResult<Option<usize>> {
        let Some(parent) = self.get(id)?.parent() else {
            return Ok(None);
        };
        Ok(self.get(parent)?.children().iter().position(|&c| c == id))
    }

    /// Append a child at the end of a parent's child list.
    ///
    /// Detaches the child from its previous parent first, DOM-style.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let len = self.children(parent)?.len();
        self.insert_child(parent, len, child)
    }

    /// Insert a child at `index` within a parent's child list.
    ///
    /// Detaches the child from its previous parent first. Fails with
    /// [`DomError::IndexOutOfBounds`] when `index > len` and
    /// [`DomError::CycleDetected`] when the child is the parent or
    /// one of its ancestors.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> DomResult<()> {
        if !self.exists(child) {
            return Err(DomError::NodeNotFound(child));
        }
        if child == parent || self.is_ancestor(child, parent)? {
            return Err(DomError::CycleDetected { parent, child });
        }
        self.detach(child)?;

        let node = self.get_mut(parent)?;
        let len = node.children.len();
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        node.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove a child from a parent's child list without deleting it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(child)?.parent() != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Detach a node from its parent, leaving it (and its subtree) in
    /// the document. No-op when already detached.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let Some(parent) = self.get(id)?.parent() else {
            return Ok(());
        };
        if let Ok(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        self.get_mut(id)?.parent = None;
        Ok(())
    }

    /// Detach a node and delete it and all its descendants.
    pub fn remove_subtree(&mut self, id: NodeId) -> DomResult<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children().iter().copied());
            }
        }
        Ok(())
    }

    /// Deep-copy a subtree with fresh ids. The copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> DomResult<NodeId> {
        let source = self.get(id)?.clone();
        let mut copy = Node::new(source.classes().to_vec());
        copy.bounds = source.bounds;
        copy.hidden = source.hidden;
        let copy_id = copy.id;
        self.nodes.insert(copy_id, copy);

        for child in source.children() {
            let child_copy = self.clone_subtree(*child)?;
            self.get_mut(child_copy)?.parent = Some(copy_id);
            self.get_mut(copy_id)?.children.push(child_copy);
        }
        Ok(copy_id)
    }

    /// Assign a node's absolute bounding box.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> DomResult<()> {
        self.get_mut(id)?.bounds = bounds;
        Ok(())
    }

    /// A node's absolute bounding box.
    pub fn bounds(&self, id: NodeId) -> DomResult<Rect> {
        Ok(self.get(id)?.bounds)
    }

    /// Hit-test a point against a node's bounding box.
    pub fn contains_point(&self, id: NodeId, point: Point) -> DomResult<bool> {
        Ok(self.get(id)?.contains(point))
    }

    /// Check whether `ancestor` is a strict ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> DomResult<bool> {
        let mut current = self.get(node)?.parent();
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.get(id)?.parent();
        }
        Ok(false)
    }
}
