//! Dropkit Core Library
//!
//! Platform-agnostic drag-and-drop engine for rearranging items within
//! and between containers. Hosts feed normalized pointer events in,
//! drive a frame clock, and mirror the element tree mutations back to
//! their real UI.

pub mod config;
pub mod container;
pub mod engine;
pub mod events;
pub mod mirror;
pub mod placeholder;
pub mod registry;
pub mod resolve;

pub use config::{ContainerConfig, Orientation};
pub use container::Container;
pub use engine::{DragEngine, DRAG_THRESHOLD};
pub use events::{DragEvent, DropDetail, MouseButton, PointerEvent};
pub use mirror::{MirrorManager, MIRROR_CLASS};
pub use placeholder::{PlaceholderManager, PLACEHOLDER_CLASS};
pub use registry::ContainerRegistry;
pub use resolve::{resolve_target, DropTarget};
