//! The drag state machine and engine entry points.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Pending        (pointer down over a bound item)
//! Pending -> Dragging    (move past DRAG_THRESHOLD)
//! Pending -> Idle        (release before threshold: a plain click)
//! Dragging -> Idle       (release over a target: drop; otherwise cancel)
//! ```
//!
//! ## Performance notes
//!
//! Pointer move is the only high-frequency path. Moves during a drag
//! only record the latest position; geometry recomputation happens at
//! most once per [`DragEngine::on_frame`] call, so intermediate moves
//! between frames coalesce.

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::events::{DragEvent, DropDetail, MouseButton, PointerEvent};
use crate::mirror::MirrorManager;
use crate::placeholder::PlaceholderManager;
use crate::registry::ContainerRegistry;
use crate::resolve;
use dropkit_dom::{Document, DomResult, NodeId};
use kurbo::Point;
use std::collections::HashSet;

/// Pointer displacement in pixels required before a drag starts.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Ephemeral state of one in-progress drag.
#[derive(Debug, Clone)]
struct DragSession {
    /// Container the drag started in.
    source: String,
    /// The dragged item.
    item: NodeId,
    /// The item's index in the source before the drag.
    original_index: usize,
    /// Currently resolved target container, `None` while the pointer
    /// is outside every accepting container.
    target: Option<String>,
    /// Currently resolved insertion index.
    index: usize,
}

/// Lifecycle phase of the input state machine.
#[derive(Debug, Clone, Default)]
enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down on an item but the movement threshold has not
    /// been crossed yet; so far this is a plain click.
    Pending {
        source: String,
        item: NodeId,
        start: Point,
    },
    Dragging(DragSession),
}

/// The drag-and-drop engine.
///
/// Owns the element tree, the container registry and the visual
/// managers. The host adapter feeds [`PointerEvent`]s and animation
/// frames in, drains [`DragEvent`]s out via [`take_events`], and
/// syncs tree mutations back to its real UI.
///
/// The engine never panics on the pointer path: any tree anomaly
/// (an element removed mid-drag by external code) degrades to a
/// cancelled drag with mirror and placeholder torn down.
///
/// [`take_events`]: DragEngine::take_events
#[derive(Debug, Default)]
pub struct DragEngine {
    doc: Document,
    registry: ContainerRegistry,
    /// Containers currently listening for pointer-downs.
    bound: HashSet<String>,
    phase: DragPhase,
    mirror: MirrorManager,
    placeholder: PlaceholderManager,
    /// Latest move position awaiting the next frame.
    pending_move: Option<Point>,
    events: Vec<DragEvent>,
}

impl DragEngine {
    /// Create an engine with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The element tree.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for the host adapter: creating items, updating
    /// bounds after layout.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// The container registry.
    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Look up a registered container.
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.registry.get(id)
    }

    /// Whether a session is past the movement threshold.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Whether no pointer interaction is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    /// Drain the queued lifecycle events.
    pub fn take_events(&mut self) -> Vec<DragEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a container over an existing root element and bind it
    /// for pointer input. The container-component init path.
    pub fn add_container(&mut self, id: impl Into<String>, root: NodeId, config: ContainerConfig) {
        let id = id.into();
        self.registry.register(Container::new(id.clone(), root, config));
        self.bind(&id);
    }

    /// Start delivering pointer-downs for a registered container.
    /// Idempotent; unknown ids are ignored.
    pub fn bind(&mut self, id: &str) {
        if self.registry.contains(id) {
            self.bound.insert(id.to_string());
        }
    }

    /// Stop delivering pointer-downs for a container. Idempotent,
    /// including on never-bound ids. An active session keeps running;
    /// use [`destroy_container`] to also cancel it.
    ///
    /// [`destroy_container`]: DragEngine::destroy_container
    pub fn unbind(&mut self, id: &str) {
        self.bound.remove(id);
    }

    /// Whether a container is bound for pointer input.
    pub fn is_bound(&self, id: &str) -> bool {
        self.bound.contains(id)
    }

    /// Tear down one container: cancel any session it is involved in,
    /// unbind and unregister it. Idempotent; never throws for
    /// already-destroyed or never-registered ids. Elements stay in
    /// the document; they belong to the host.
    pub fn destroy_container(&mut self, id: &str) {
        if self.interaction_involves(id) {
            self.cancel();
        }
        self.bound.remove(id);
        self.registry.unregister(id);
    }

    /// Tear down the whole engine: cancel any session, unbind and
    /// unregister everything. Idempotent.
    pub fn destroy(&mut self) {
        self.cancel();
        self.bound.clear();
        self.registry.clear();
    }

    /// Cancel the active interaction, if any. Tears down mirror and
    /// placeholder without committing a move; emits
    /// [`DragEvent::Cancel`] when a session was past the threshold.
    pub fn cancel(&mut self) {
        let phase = std::mem::take(&mut self.phase);
        self.pending_move = None;
        if let DragPhase::Dragging(session) = phase {
            self.teardown();
            log::debug!("drag from '{}' cancelled", session.source);
            self.emit(DragEvent::Cancel {
                source: session.source,
            });
        }
    }

    /// Feed one normalized pointer event to the state machine.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    /// Apply the latest coalesced move. Call once per animation frame
    /// while input is flowing.
    pub fn on_frame(&mut self) {
        let Some(position) = self.pending_move.take() else {
            return;
        };
        if !self.is_dragging() {
            return;
        }
        if let Err(e) = self.drag_tick(position) {
            log::warn!("drag interrupted: {e}");
            self.cancel();
        }
    }

    fn emit(&mut self, event: DragEvent) {
        log::trace!("emit {event:?}");
        self.events.push(event);
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) {
        // A pointer-down while a session is active is ignored: at
        // most one DragSession exists at a time.
        if button != MouseButton::Left || !self.is_idle() {
            return;
        }
        match self.hit_item(position) {
            Ok(Some((source, item))) => {
                log::trace!("pointer down on item in '{source}'");
                self.phase = DragPhase::Pending {
                    source,
                    item,
                    start: position,
                };
            }
            Ok(None) => {}
            Err(e) => log::warn!("hit test failed on pointer down: {e}"),
        }
    }

    /// Find the bound container and direct child item under a point.
    fn hit_item(&self, position: Point) -> DomResult<Option<(String, NodeId)>> {
        for container in self.registry.iter() {
            if !self.bound.contains(&container.id) {
                continue;
            }
            if !self.doc.contains_point(container.root, position)? {
                continue;
            }
            for &child in self.doc.children(container.root)? {
                if self.doc.contains_point(child, position)? {
                    return Ok(Some((container.id.clone(), child)));
                }
            }
            // Inside the container but over no item
            return Ok(None);
        }
        Ok(None)
    }

    fn pointer_move(&mut self, position: Point) {
        match &self.phase {
            DragPhase::Idle => {}
            DragPhase::Pending { source, item, start } => {
                let delta = position - *start;
                if delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD {
                    let (source, item, start) = (source.clone(), *item, *start);
                    self.start_drag(source, item, start, position);
                }
            }
            DragPhase::Dragging(_) => {
                // Coalesced: the latest position wins, applied on the
                // next frame.
                self.pending_move = Some(position);
            }
        }
    }

    fn start_drag(&mut self, source: String, item: NodeId, start: Point, position: Point) {
        let original_index = match self.doc.index_in_parent(item) {
            Ok(Some(index)) => index,
            Ok(None) => {
                log::warn!("pressed item is detached, not starting a drag");
                self.phase = DragPhase::Idle;
                return;
            }
            Err(e) => {
                log::warn!("failed to start drag: {e}");
                self.phase = DragPhase::Idle;
                return;
            }
        };
        if let Err(e) = self.mirror.create(&mut self.doc, item, start) {
            log::warn!("failed to create mirror: {e}");
            self.phase = DragPhase::Idle;
            return;
        }
        log::debug!("drag started from '{source}'");
        self.emit(DragEvent::DragStart {
            source: source.clone(),
            item,
        });
        self.phase = DragPhase::Dragging(DragSession {
            source,
            item,
            original_index,
            target: None,
            index: 0,
        });
        self.pending_move = Some(position);
    }

    /// One geometry recomputation: move the mirror, resolve the
    /// target, emit boundary crossings, update the placeholder.
    fn drag_tick(&mut self, position: Point) -> DomResult<()> {
        let DragPhase::Dragging(session) = &self.phase else {
            return Ok(());
        };
        let source = session.source.clone();
        let item = session.item;
        let original_index = session.original_index;
        let prev_target = session.target.clone();

        // External removal of the dragged item forces cancellation
        self.doc.get(item)?;

        self.mirror.move_to(&mut self.doc, position)?;

        let skip: Vec<NodeId> = self.placeholder.node().into_iter().collect();
        let target = resolve::resolve_target(
            &self.doc,
            &self.registry,
            position,
            &source,
            item,
            original_index,
            &skip,
        )?;

        if target.container != prev_target {
            // Leave before enter, exactly once per boundary crossing
            if let Some(prev) = prev_target {
                self.emit(DragEvent::DragLeave { container: prev });
            }
            if let Some(next) = target.container.clone() {
                self.emit(DragEvent::DragEnter { container: next });
            }
        }

        match &target.container {
            Some(id) => {
                if let Some(container) = self.registry.get(id) {
                    self.placeholder
                        .show(&mut self.doc, container, target.index, Some(item))?;
                }
            }
            None => self.placeholder.hide(&mut self.doc),
        }

        if let DragPhase::Dragging(session) = &mut self.phase {
            session.target = target.container;
            session.index = target.index;
        }
        Ok(())
    }

    fn pointer_up(&mut self, position: Point, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match &self.phase {
            DragPhase::Idle => {}
            DragPhase::Pending { .. } => {
                // Released before the threshold: a plain click
                self.phase = DragPhase::Idle;
                self.pending_move = None;
            }
            DragPhase::Dragging(_) => self.finish_drag(position),
        }
    }

    fn finish_drag(&mut self, position: Point) {
        self.pending_move = None;
        // Resolve against the release position before committing
        if let Err(e) = self.drag_tick(position) {
            log::warn!("drag interrupted on release: {e}");
            self.cancel();
            return;
        }
        let DragPhase::Dragging(session) = std::mem::take(&mut self.phase) else {
            return;
        };

        let committed = match session.target.as_deref() {
            Some(target_id) => {
                let source_config = self.registry.get(&session.source).map(|c| c.config.clone());
                let target = self.registry.get(target_id).cloned();
                match (source_config, target) {
                    (Some(source_config), Some(target)) => {
                        match self.commit(&session, &source_config, &target) {
                            Ok(()) => true,
                            Err(e) => {
                                log::warn!("drop failed, cancelling: {e}");
                                false
                            }
                        }
                    }
                    // A container vanished between resolve and release
                    _ => false,
                }
            }
            None => false,
        };

        if !committed {
            self.teardown();
            self.emit(DragEvent::Cancel {
                source: session.source,
            });
        }
    }

    /// The atomic commit step of a drop.
    fn commit(
        &mut self,
        session: &DragSession,
        source_config: &ContainerConfig,
        target: &Container,
    ) -> DomResult<()> {
        let index = session.index;

        if !target.config.add_on_drop {
            // No item is materialized; the placeholder is retained in
            // place of one.
            self.placeholder.release();
        } else {
            self.placeholder.hide(&mut self.doc);
            if source_config.copy {
                let clone = self.doc.clone_subtree(session.item)?;
                let actual =
                    resolve::actual_child_index(&self.doc, target.root, index, &[session.item])?;
                if let Err(e) = self.doc.insert_child(target.root, actual, clone) {
                    let _ = self.doc.remove_subtree(clone);
                    return Err(e);
                }
            } else {
                self.doc.detach(session.item)?;
                if let Err(e) = self.insert_moved(session.item, target.root, index) {
                    self.restore_item(session);
                    return Err(e);
                }
            }
        }

        self.mirror.destroy(&mut self.doc);
        log::debug!(
            "dropped item from '{}' into '{}' at index {index}",
            session.source,
            target.id
        );
        self.emit(DragEvent::Drop(DropDetail {
            source: session.source.clone(),
            target: target.id.clone(),
            index,
            item: session.item,
        }));
        Ok(())
    }

    fn insert_moved(&mut self, item: NodeId, root: NodeId, index: usize) -> DomResult<()> {
        // Placeholder and item are both out of the child list at this
        // point, so the filtered index is the actual one.
        let len = self.doc.children(root)?.len();
        self.doc.insert_child(root, index.min(len), item)
    }

    /// Best-effort reattachment after a failed move, so the item does
    /// not end up belonging to no container.
    fn restore_item(&mut self, session: &DragSession) {
        let Some(source) = self.registry.get(&session.source) else {
            return;
        };
        let root = source.root;
        if let Ok(children) = self.doc.children(root) {
            let index = session.original_index.min(children.len());
            if self.doc.insert_child(root, index, session.item).is_err() {
                log::warn!("could not restore item to '{}'", session.source);
            }
        }
    }

    fn interaction_involves(&self, id: &str) -> bool {
        match &self.phase {
            DragPhase::Idle => false,
            DragPhase::Pending { source, .. } => source == id,
            DragPhase::Dragging(s) => s.source == id || s.target.as_deref() == Some(id),
        }
    }

    fn teardown(&mut self) {
        self.mirror.destroy(&mut self.doc);
        self.placeholder.hide(&mut self.doc);
        self.pending_move = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::PLACEHOLDER_CLASS;
    use kurbo::Rect;

    struct Board {
        engine: DragEngine,
        root_a: NodeId,
        root_b: NodeId,
        items_a: Vec<NodeId>,
        items_b: Vec<NodeId>,
    }

    /// Two vertical lists side by side: "a" at x 0-100 with four
    /// 40px-tall items, "b" at x 200-300 with two.
    fn board(config_a: ContainerConfig, config_b: ContainerConfig) -> Board {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut engine = DragEngine::new();
        let (root_a, items_a) = column(engine.document_mut(), 0.0, 4);
        let (root_b, items_b) = column(engine.document_mut(), 200.0, 2);
        engine.add_container("a", root_a, config_a);
        engine.add_container("b", root_b, config_b);
        Board {
            engine,
            root_a,
            root_b,
            items_a,
            items_b,
        }
    }

    fn column(doc: &mut Document, x0: f64, n: usize) -> (NodeId, Vec<NodeId>) {
        let root = doc.create_element(["list"]);
        doc.append_child(doc.root(), root).unwrap();
        doc.set_bounds(root, Rect::new(x0, 0.0, x0 + 100.0, 400.0))
            .unwrap();
        let items = (0..n)
            .map(|i| {
                let item = doc.create_element(["item"]);
                doc.append_child(root, item).unwrap();
                let y = i as f64 * 40.0;
                doc.set_bounds(item, Rect::new(x0, y, x0 + 100.0, y + 40.0))
                    .unwrap();
                item
            })
            .collect();
        (root, items)
    }

    fn accepts_a() -> ContainerConfig {
        ContainerConfig {
            accept_from: "a".to_string(),
            ..Default::default()
        }
    }

    fn no_copy() -> ContainerConfig {
        ContainerConfig {
            copy: false,
            ..Default::default()
        }
    }

    fn press(engine: &mut DragEngine, x: f64, y: f64) {
        engine.handle_pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    fn move_to(engine: &mut DragEngine, x: f64, y: f64) {
        engine.handle_pointer_event(PointerEvent::Move {
            position: Point::new(x, y),
        });
    }

    fn drag_to(engine: &mut DragEngine, x: f64, y: f64) {
        move_to(engine, x, y);
        engine.on_frame();
    }

    fn release(engine: &mut DragEngine, x: f64, y: f64) {
        engine.handle_pointer_event(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        });
    }

    /// Press on `from`, cross the threshold, glide to `to`, release.
    fn drag(engine: &mut DragEngine, from: (f64, f64), to: (f64, f64)) {
        press(engine, from.0, from.1);
        drag_to(engine, from.0 + DRAG_THRESHOLD + 1.0, from.1);
        drag_to(engine, to.0, to.1);
        release(engine, to.0, to.1);
    }

    fn drops(events: &[DragEvent]) -> Vec<&DropDetail> {
        events
            .iter()
            .filter_map(|e| match e {
                DragEvent::Drop(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_move_between_containers() {
        let mut b = board(no_copy(), accepts_a());
        let item = b.items_a[0];

        // Release past both of b's item midpoints: append at 2
        drag(&mut b.engine, (50.0, 20.0), (250.0, 70.0));

        let doc = b.engine.document();
        assert_eq!(doc.children(b.root_a).unwrap(), &b.items_a[1..]);
        assert_eq!(
            doc.children(b.root_b).unwrap(),
            &[b.items_b[0], b.items_b[1], item]
        );
        assert!(!doc.get(item).unwrap().hidden);

        let events = b.engine.take_events();
        let drops = drops(&events);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].source, "a");
        assert_eq!(drops[0].target, "b");
        assert_eq!(drops[0].index, 2);
        assert_eq!(drops[0].item, item);
    }

    #[test]
    fn test_copy_leaves_source_unchanged() {
        let mut b = board(ContainerConfig::default(), accepts_a());

        drag(&mut b.engine, (50.0, 20.0), (250.0, 10.0));

        let doc = b.engine.document();
        assert_eq!(doc.children(b.root_a).unwrap(), b.items_a.as_slice());

        let children_b = doc.children(b.root_b).unwrap();
        assert_eq!(children_b.len(), 3);
        // New item at index 0, a fresh clone of the dragged one
        let clone = children_b[0];
        assert!(!b.items_a.contains(&clone));
        assert!(doc.get(clone).unwrap().has_class("item"));
        assert_eq!(&children_b[1..], b.items_b.as_slice());

        let events = b.engine.take_events();
        assert_eq!(drops(&events)[0].index, 0);
    }

    #[test]
    fn test_release_outside_everything_cancels() {
        let mut b = board(no_copy(), accepts_a());
        let count = b.engine.document().node_count();

        drag(&mut b.engine, (50.0, 20.0), (500.0, 300.0));

        let doc = b.engine.document();
        assert_eq!(doc.children(b.root_a).unwrap(), b.items_a.as_slice());
        assert_eq!(doc.children(b.root_b).unwrap(), b.items_b.as_slice());
        // Mirror and placeholder both gone
        assert_eq!(doc.node_count(), count);

        let events = b.engine.take_events();
        assert!(events.iter().any(|e| matches!(e, DragEvent::Cancel { source } if source == "a")));
        assert!(drops(&events).is_empty());
    }

    #[test]
    fn test_enter_leave_order_once_per_crossing() {
        let mut b = board(no_copy(), accepts_a());

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 56.0, 20.0);
        // Cross into b, then jitter inside it
        drag_to(&mut b.engine, 250.0, 30.0);
        drag_to(&mut b.engine, 251.0, 31.0);
        drag_to(&mut b.engine, 250.0, 29.0);
        release(&mut b.engine, 250.0, 30.0);

        let events = b.engine.take_events();
        let crossings: Vec<&DragEvent> = events
            .iter()
            .filter(|e| matches!(e, DragEvent::DragEnter { .. } | DragEvent::DragLeave { .. }))
            .collect();
        assert_eq!(
            crossings,
            vec![
                &DragEvent::DragEnter {
                    container: "a".to_string()
                },
                &DragEvent::DragLeave {
                    container: "a".to_string()
                },
                &DragEvent::DragEnter {
                    container: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_reorder_within_sortable_container() {
        let mut b = board(no_copy(), ContainerConfig::default());

        // Item rows: 0-40, 40-80, 80-120, 120-160. Drop item 0 at
        // y=100: among [1, 2, 3] that is just on item 2's midpoint,
        // so before it -- index 1 counted after removal.
        drag(&mut b.engine, (50.0, 20.0), (50.0, 100.0));

        let doc = b.engine.document();
        assert_eq!(
            doc.children(b.root_a).unwrap(),
            &[b.items_a[1], b.items_a[0], b.items_a[2], b.items_a[3]]
        );

        let events = b.engine.take_events();
        let drops = drops(&events);
        assert_eq!(drops[0].index, 1);
        assert_eq!(drops[0].source, "a");
        assert_eq!(drops[0].target, "a");
    }

    #[test]
    fn test_destroy_container_is_idempotent_and_inert() {
        let mut b = board(ContainerConfig::default(), ContainerConfig::default());

        b.engine.destroy_container("a");
        b.engine.destroy_container("a");
        b.engine.destroy_container("never-existed");

        // Subsequent pointer-down produces no engine activity
        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 50.0, 100.0);
        release(&mut b.engine, 50.0, 100.0);

        assert!(b.engine.is_idle());
        assert!(b.engine.take_events().is_empty());
        assert_eq!(
            b.engine.document().children(b.root_a).unwrap(),
            b.items_a.as_slice()
        );
    }

    #[test]
    fn test_empty_accept_from_rejects_foreign_drops() {
        // b accepts nothing
        let mut b = board(no_copy(), ContainerConfig::default());
        let count = b.engine.document().node_count();

        drag(&mut b.engine, (50.0, 20.0), (250.0, 30.0));

        let doc = b.engine.document();
        assert_eq!(doc.children(b.root_a).unwrap(), b.items_a.as_slice());
        assert_eq!(doc.children(b.root_b).unwrap(), b.items_b.as_slice());
        assert_eq!(doc.node_count(), count);

        let events = b.engine.take_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, DragEvent::DragEnter { container } if container == "b")));
        assert!(drops(&events).is_empty());
    }

    #[test]
    fn test_click_below_threshold_is_not_a_drag() {
        let mut b = board(ContainerConfig::default(), ContainerConfig::default());

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 52.0, 22.0);
        release(&mut b.engine, 52.0, 22.0);

        assert!(b.engine.is_idle());
        assert!(b.engine.take_events().is_empty());
    }

    #[test]
    fn test_add_on_drop_false_retains_placeholder() {
        let config_b = ContainerConfig {
            accept_from: "a".to_string(),
            add_on_drop: false,
            placeholder_class: "pending-slot".to_string(),
            ..Default::default()
        };
        let mut b = board(no_copy(), config_b);

        drag(&mut b.engine, (50.0, 20.0), (250.0, 10.0));

        let doc = b.engine.document();
        // Item was not moved
        assert_eq!(doc.children(b.root_a).unwrap(), b.items_a.as_slice());

        // The placeholder stayed behind at the drop position
        let children_b = doc.children(b.root_b).unwrap();
        assert_eq!(children_b.len(), 3);
        let retained = doc.get(children_b[0]).unwrap();
        assert!(retained.has_class(PLACEHOLDER_CLASS));
        assert!(retained.has_class("pending-slot"));

        let events = b.engine.take_events();
        assert_eq!(drops(&events)[0].index, 0);
    }

    #[test]
    fn test_moves_between_frames_coalesce() {
        let mut b = board(no_copy(), accepts_a());

        press(&mut b.engine, 50.0, 20.0);
        move_to(&mut b.engine, 56.0, 20.0);
        // Swing through b and back into a without a frame in between
        move_to(&mut b.engine, 250.0, 50.0);
        move_to(&mut b.engine, 50.0, 100.0);
        b.engine.on_frame();

        let events = b.engine.take_events();
        // Only the latest position was resolved: b was never entered
        assert!(!events
            .iter()
            .any(|e| matches!(e, DragEvent::DragEnter { container } if container == "b")));
        assert!(events
            .iter()
            .any(|e| matches!(e, DragEvent::DragEnter { container } if container == "a")));

        release(&mut b.engine, 50.0, 100.0);
    }

    #[test]
    fn test_pointer_down_during_session_is_ignored() {
        let mut b = board(no_copy(), accepts_a());

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 50.0, 60.0);
        assert!(b.engine.is_dragging());

        // Second pointer-down mid-session
        press(&mut b.engine, 250.0, 10.0);
        assert!(b.engine.is_dragging());

        release(&mut b.engine, 250.0, 10.0);
        let events = b.engine.take_events();
        let starts = events
            .iter()
            .filter(|e| matches!(e, DragEvent::DragStart { .. }))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_item_removed_mid_drag_cancels() {
        let mut b = board(no_copy(), accepts_a());
        let count = b.engine.document().node_count();

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 50.0, 60.0);
        assert!(b.engine.is_dragging());

        // External code removes the dragged item
        b.engine
            .document_mut()
            .remove_subtree(b.items_a[0])
            .unwrap();
        drag_to(&mut b.engine, 50.0, 100.0);

        assert!(b.engine.is_idle());
        let events = b.engine.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, DragEvent::Cancel { source } if source == "a")));
        // No dangling mirror or placeholder
        assert_eq!(b.engine.document().node_count(), count - 1);
    }

    #[test]
    fn test_pointer_cancel_tears_down() {
        let mut b = board(no_copy(), accepts_a());
        let count = b.engine.document().node_count();

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 250.0, 30.0);
        b.engine.handle_pointer_event(PointerEvent::Cancel);

        assert!(b.engine.is_idle());
        assert_eq!(b.engine.document().node_count(), count);
        assert_eq!(
            b.engine.document().children(b.root_a).unwrap(),
            b.items_a.as_slice()
        );
    }

    #[test]
    fn test_destroying_target_container_mid_drag_cancels() {
        let mut b = board(no_copy(), accepts_a());
        let count = b.engine.document().node_count();

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 250.0, 30.0);
        assert!(b.engine.is_dragging());

        b.engine.destroy_container("b");

        assert!(b.engine.is_idle());
        assert_eq!(b.engine.document().node_count(), count);
        let events = b.engine.take_events();
        assert!(events.iter().any(|e| matches!(e, DragEvent::Cancel { .. })));

        // b's elements are untouched; only the registration is gone
        assert!(b.engine.container("b").is_none());
        assert_eq!(
            b.engine.document().children(b.root_b).unwrap(),
            b.items_b.as_slice()
        );
    }

    #[test]
    fn test_non_sortable_source_keeps_order_on_self_drop() {
        let config_a = ContainerConfig {
            copy: false,
            sortable: false,
            ..Default::default()
        };
        let mut b = board(config_a, ContainerConfig::default());

        drag(&mut b.engine, (50.0, 20.0), (50.0, 150.0));

        let doc = b.engine.document();
        assert_eq!(doc.children(b.root_a).unwrap(), b.items_a.as_slice());
        let events = b.engine.take_events();
        assert_eq!(drops(&events)[0].index, 0);
    }

    #[test]
    fn test_placeholder_follows_pointer_during_drag() {
        let mut b = board(no_copy(), accepts_a());

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 250.0, 10.0);

        // Placeholder sits in b while hovering there
        let doc = b.engine.document();
        let children_b = doc.children(b.root_b).unwrap();
        assert_eq!(children_b.len(), 3);
        assert!(doc.get(children_b[0]).unwrap().has_class(PLACEHOLDER_CLASS));

        // Leaving all containers removes it
        drag_to(&mut b.engine, 500.0, 300.0);
        assert_eq!(b.engine.document().children(b.root_b).unwrap().len(), 2);

        release(&mut b.engine, 500.0, 300.0);
    }

    #[test]
    fn test_engine_destroy_is_idempotent() {
        let mut b = board(no_copy(), accepts_a());

        press(&mut b.engine, 50.0, 20.0);
        drag_to(&mut b.engine, 50.0, 60.0);

        b.engine.destroy();
        b.engine.destroy();

        assert!(b.engine.is_idle());
        assert!(b.engine.registry().is_empty());
        press(&mut b.engine, 50.0, 20.0);
        assert!(b.engine.is_idle());
    }

    #[test]
    fn test_unbind_is_idempotent_and_blocks_new_drags() {
        let mut b = board(no_copy(), accepts_a());

        assert!(b.engine.is_bound("a"));
        b.engine.unbind("a");
        b.engine.unbind("a");
        b.engine.unbind("never-bound");
        assert!(!b.engine.is_bound("a"));

        press(&mut b.engine, 50.0, 20.0);
        assert!(b.engine.is_idle());

        // Still registered as a drop target, just not draggable-from
        assert!(b.engine.container("a").is_some());
    }
}
