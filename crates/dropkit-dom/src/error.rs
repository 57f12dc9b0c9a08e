//! Error types for tree operations.

use crate::node::NodeId;
use thiserror::Error;

/// Errors raised by tree lookups and mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("inserting {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
}

/// Result type for tree operations.
pub type DomResult<T> = Result<T, DomError>;
