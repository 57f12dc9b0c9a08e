//! Typed input and output events for the engine.

use dropkit_dom::NodeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers. Touch input is normalized to `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// The host adapter translates its native events into this model and
/// feeds them to [`DragEngine::handle_pointer_event`].
///
/// [`DragEngine::handle_pointer_event`]: crate::engine::DragEngine::handle_pointer_event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
    /// Loss of pointer capture or any other host-side interruption.
    Cancel,
}

/// Outcome detail carried by [`DragEvent::Drop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDetail {
    /// Container the drag started in.
    pub source: String,
    /// Container the item was dropped into.
    pub target: String,
    /// Final insertion index, counted after removal of the item's
    /// original slot.
    pub index: usize,
    /// The item that was dragged.
    pub item: NodeId,
}

/// Lifecycle events emitted by the engine, drained via
/// [`DragEngine::take_events`]. Every variant carries a structured
/// detail payload.
///
/// [`DragEngine::take_events`]: crate::engine::DragEngine::take_events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragEvent {
    /// Movement threshold crossed; a session is now active.
    DragStart { source: String, item: NodeId },
    /// The resolved target container changed to `container`.
    DragEnter { container: String },
    /// The resolved target container is no longer `container`.
    DragLeave { container: String },
    /// The pointer was released over an accepting container.
    Drop(DropDetail),
    /// The session ended without a drop; no tree mutation occurred.
    Cancel { source: String },
}

impl DragEvent {
    /// Convenience check used by hosts filtering the queue.
    pub fn is_drop(&self) -> bool {
        matches!(self, Self::Drop(_))
    }
}
