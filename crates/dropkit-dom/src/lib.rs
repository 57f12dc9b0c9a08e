//! Dropkit DOM
//!
//! A retained element tree for the dropkit drag-and-drop engine. The
//! host adapter mirrors its real UI into this tree and assigns every
//! node an absolute bounding box; the engine hit-tests against those
//! boxes and mutates child lists, and the adapter syncs the mutations
//! back. No layout is computed here.

pub mod document;
pub mod error;
pub mod node;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use node::{Node, NodeId};
