//! Element nodes.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in the tree.
pub type NodeId = Uuid;

/// A single element in the retained tree.
///
/// Geometry is assigned by the host adapter rather than computed
/// here: the engine reads `bounds` for hit-testing and writes it only
/// when positioning the mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Class names, in application order.
    classes: Vec<String>,
    /// Absolute bounding box in host coordinates.
    pub bounds: Rect,
    /// Whether the host should render this node dimmed or hidden.
    pub hidden: bool,
    /// Ordered child nodes (back to front is irrelevant; this is
    /// document order).
    pub(crate) children: Vec<NodeId>,
    /// Parent node; `None` for the root and for detached nodes.
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// Create a detached node with the given classes.
    pub(crate) fn new(classes: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            classes,
            bounds: Rect::ZERO,
            hidden: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Class names in application order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check whether the node carries a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replace the full class list.
    pub fn set_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
    }

    /// Check whether a point falls inside the node's bounding box.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Ordered child ids.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
