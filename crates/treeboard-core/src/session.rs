//! Draw-session state machine.
//!
//! A session starts on pointer-down, follows every pointer-move and is
//! consumed on pointer-up. At most one session is active; while it is, new
//! pointer-downs are ignored. Every exit path takes the state out of the
//! controller, so nothing from a gesture survives it.
//!
//! Transforms always start from the node as it was at pointer-down, so a
//! gesture is a pure function of (start node, current pointer) and never
//! accumulates rounding error across moves.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::geometry::bounding_box;
use crate::handles::{HandleKind, LineEnd, ResizeHandle};
use crate::history::History;
use crate::input::Modifiers;
use crate::node::{DataPatch, Geometry, Node, NodeId, NodeKind, NodePatch, StrokeColor};
use crate::store::NodeStore;
use crate::tools::{DEFAULT_STROKE_WIDTH, ToolKind};
use crate::transform::{ResizeOptions, RotationDrag, line_between, resize_box, resize_line, scale_points};
use kurbo::{Point, Rect, Size, Vec2};
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// The active gesture, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawSession {
    #[default]
    Idle,
    /// Capturing a freehand stroke (canvas space).
    Freehand { stroke: Vec<Point> },
    /// Dragging out a new shape or line from `anchor`.
    BoxCreate {
        node: NodeId,
        anchor: Point,
        tool: ToolKind,
    },
    Resizing {
        node: NodeId,
        handle: ResizeHandle,
        anchor: Point,
        start: Node,
    },
    Rotating {
        node: NodeId,
        drag: RotationDrag,
        start: Node,
    },
    LineEndpoint {
        node: NodeId,
        end: LineEnd,
        start: Node,
    },
    /// Translating the pressed node, and the rest of the selection with it,
    /// by the drag delta.
    Moving {
        node: NodeId,
        anchor: Point,
        start: Node,
        others: Vec<Node>,
    },
}

impl DrawSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, DrawSession::Idle)
    }

    /// Node targeted by the session, if any.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            DrawSession::Idle | DrawSession::Freehand { .. } => None,
            DrawSession::BoxCreate { node, .. }
            | DrawSession::Resizing { node, .. }
            | DrawSession::Rotating { node, .. }
            | DrawSession::LineEndpoint { node, .. }
            | DrawSession::Moving { node, .. } => Some(*node),
        }
    }

    /// Node as it was when the gesture started (transform sessions only).
    fn start_node(&self) -> Option<&Node> {
        match self {
            DrawSession::Resizing { start, .. }
            | DrawSession::Rotating { start, .. }
            | DrawSession::LineEndpoint { start, .. }
            | DrawSession::Moving { start, .. } => Some(start),
            _ => None,
        }
    }
}

/// What a pointer-down should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Freehand,
    /// Box or line creation with a drag tool.
    Create(ToolKind),
    Handle { node: NodeId, handle: HandleKind },
    /// Drag `node`; `others` follow by the same delta.
    Move { node: NodeId, others: Vec<NodeId> },
}

/// Result of feeding an event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing to do (no session, or a session was already active).
    Ignored,
    Started,
    Updated,
    /// A creation gesture produced a node.
    Created { node: NodeId, tool: ToolKind },
    /// A transform gesture finished on this node.
    Committed(NodeId),
    /// A freehand stroke was too short to keep.
    Discarded,
    Cancelled,
    /// The target node disappeared mid-gesture.
    Aborted,
}

/// Mutable collaborators a session works against.
pub struct SessionEnv<'a, S: NodeStore + ?Sized> {
    pub store: &'a mut S,
    pub history: &'a mut History,
    pub config: &'a EngineConfig,
}

/// Owns the current [`DrawSession`] and drives it from pointer input.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    state: DrawSession,
    last_pointer: Point,
    modifiers: Modifiers,
    last_event: Option<Instant>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawSession {
        &self.state
    }

    /// True while any gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        !self.state.is_idle()
    }

    /// Last pointer position seen by the session (canvas space).
    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Points of the stroke being captured.
    pub fn stroke(&self) -> Option<&[Point]> {
        match &self.state {
            DrawSession::Freehand { stroke } => Some(stroke),
            _ => None,
        }
    }

    fn touch(&mut self, pointer: Point, modifiers: Modifiers) {
        self.last_pointer = pointer;
        self.modifiers = modifiers;
        self.last_event = Some(Instant::now());
    }

    /// Start a gesture at `pointer` (canvas space).
    pub fn begin<S: NodeStore + ?Sized>(
        &mut self,
        env: SessionEnv<'_, S>,
        gesture: Gesture,
        pointer: Point,
        modifiers: Modifiers,
    ) -> SessionOutcome {
        if self.is_interacting() {
            log::debug!("Ignoring {:?}: a session is already active", gesture);
            return SessionOutcome::Ignored;
        }

        let state = match &gesture {
            Gesture::Freehand => DrawSession::Freehand { stroke: vec![pointer] },
            &Gesture::Create(tool) => {
                let Some(node) = creation_node(tool, pointer, env.config) else {
                    log::debug!("{:?} does not create by dragging", tool);
                    return SessionOutcome::Ignored;
                };
                env.history.checkpoint(&*env.store);
                let id = node.id();
                env.store.insert_node(node);
                DrawSession::BoxCreate { node: id, anchor: pointer, tool }
            }
            &Gesture::Handle { node, handle } => {
                let Some(start) = env.store.node(node).cloned() else {
                    log::debug!("Handle target {} not found", node);
                    return SessionOutcome::Ignored;
                };
                env.history.stage(&*env.store);
                match handle {
                    HandleKind::Resize(handle) => DrawSession::Resizing { node, handle, anchor: pointer, start },
                    HandleKind::Rotate => DrawSession::Rotating {
                        node,
                        drag: RotationDrag::begin(&start, pointer),
                        start,
                    },
                    HandleKind::Endpoint(end) => DrawSession::LineEndpoint { node, end, start },
                }
            }
            Gesture::Move { node, others } => {
                let Some(start) = env.store.node(*node).cloned() else {
                    log::debug!("Move target {} not found", node);
                    return SessionOutcome::Ignored;
                };
                let others = others
                    .iter()
                    .filter(|&id| id != node)
                    .filter_map(|&id| env.store.node(id).cloned())
                    .collect();
                env.history.stage(&*env.store);
                DrawSession::Moving { node: *node, anchor: pointer, start, others }
            }
        };

        log::debug!("Session started: {:?}", gesture);
        self.state = state;
        self.touch(pointer, modifiers);
        SessionOutcome::Started
    }

    /// Follow a pointer-move (canvas space).
    pub fn update<S: NodeStore + ?Sized>(
        &mut self,
        mut env: SessionEnv<'_, S>,
        pointer: Point,
        modifiers: Modifiers,
    ) -> SessionOutcome {
        if !self.is_interacting() {
            return SessionOutcome::Ignored;
        }
        self.touch(pointer, modifiers);

        if let DrawSession::Freehand { stroke } = &mut self.state {
            stroke.push(pointer);
            return SessionOutcome::Updated;
        }
        match apply_pointer(&self.state, &mut env, pointer, modifiers) {
            Ok(()) => SessionOutcome::Updated,
            Err(err) => self.abort(env.history, err),
        }
    }

    /// Finish the gesture with a pointer-up at `pointer` (canvas space).
    pub fn end<S: NodeStore + ?Sized>(&mut self, mut env: SessionEnv<'_, S>, pointer: Point) -> SessionOutcome {
        let modifiers = self.modifiers;
        let state = std::mem::take(&mut self.state);
        self.last_event = None;

        match state {
            DrawSession::Idle => SessionOutcome::Ignored,
            DrawSession::Freehand { stroke } => finish_stroke(env, stroke),
            DrawSession::BoxCreate { node, anchor, tool } => {
                let result = if pointer == anchor {
                    env.store.update_node(node, click_geometry(tool, anchor, env.config).into())
                } else {
                    apply_pointer(&state, &mut env, pointer, modifiers)
                };
                if let Err(err) = result {
                    return self.abort(env.history, err);
                }
                log::debug!("Created {:?} node {}", tool, node);
                SessionOutcome::Created { node, tool }
            }
            _ => {
                if let Err(err) = apply_pointer(&state, &mut env, pointer, modifiers) {
                    return self.abort(env.history, err);
                }
                let (Some(node), Some(start)) = (state.target(), state.start_node()) else {
                    return SessionOutcome::Ignored;
                };
                let unchanged = env
                    .store
                    .node(node)
                    .is_some_and(|current| current.geometry() == start.geometry());
                if unchanged {
                    // A click without movement leaves both stacks untouched
                    env.history.drop_staged();
                } else {
                    env.history.commit_staged();
                }
                log::debug!("Session committed on {}", node);
                SessionOutcome::Committed(node)
            }
        }
    }

    /// Revert the active gesture and drop its history entry.
    pub fn cancel<S: NodeStore + ?Sized>(&mut self, env: SessionEnv<'_, S>) -> SessionOutcome {
        let state = std::mem::take(&mut self.state);
        self.last_event = None;

        match state {
            DrawSession::Idle => return SessionOutcome::Ignored,
            // No checkpoint is taken until the stroke is committed
            DrawSession::Freehand { .. } => {}
            DrawSession::BoxCreate { node, .. } => {
                env.store.remove_node(node);
                env.history.discard_last();
            }
            DrawSession::Moving { start, others, .. } => {
                for node in std::iter::once(start).chain(others) {
                    restore_geometry(&mut *env.store, node);
                }
                env.history.drop_staged();
            }
            DrawSession::Resizing { start, .. }
            | DrawSession::Rotating { start, .. }
            | DrawSession::LineEndpoint { start, .. } => {
                restore_geometry(&mut *env.store, start);
                env.history.drop_staged();
            }
        }
        log::debug!("Session cancelled");
        SessionOutcome::Cancelled
    }

    /// Commit the gesture at the last known pointer position, as if the
    /// pointer had been released there (pointer left the window, focus lost).
    pub fn release<S: NodeStore + ?Sized>(&mut self, env: SessionEnv<'_, S>) -> SessionOutcome {
        if !self.is_interacting() {
            return SessionOutcome::Ignored;
        }
        let pointer = self.last_pointer;
        self.end(env, pointer)
    }

    /// Commit the gesture if no pointer event arrived for
    /// `gesture_timeout_ms`.
    pub fn expire<S: NodeStore + ?Sized>(&mut self, env: SessionEnv<'_, S>, now: Instant) -> SessionOutcome {
        let Some(last_event) = self.last_event else {
            return SessionOutcome::Ignored;
        };
        let timeout = Duration::from_millis(env.config.gesture_timeout_ms);
        if now.saturating_duration_since(last_event) < timeout {
            return SessionOutcome::Ignored;
        }
        log::debug!("Session timed out after {:?}", timeout);
        self.release(env)
    }

    fn abort(&mut self, history: &mut History, err: EngineError) -> SessionOutcome {
        log::debug!("Session aborted: {}", err);
        history.drop_staged();
        self.state = DrawSession::Idle;
        self.last_event = None;
        SessionOutcome::Aborted
    }
}

/// Minimal node placed at the pointer when a drag-creation starts.
fn creation_node(tool: ToolKind, pointer: Point, config: &EngineConfig) -> Option<Node> {
    if let Some(shape) = tool.shape_kind() {
        let kind = NodeKind::Shape { shape, stroke: StrokeColor::default() };
        return Some(Node::new(kind, pointer, config.min_shape_size));
    }
    if tool.is_line_tool() {
        let geometry = line_between(pointer, pointer, config.line_thickness, config.min_line_length());
        let kind = NodeKind::Line { arrow: tool == ToolKind::Arrow, stroke: StrokeColor::default() };
        let mut node = Node::new(kind, geometry.position, geometry.size);
        node.rotation = geometry.rotation;
        return Some(node);
    }
    None
}

/// Geometry of a node created by a click (pointer-up at the anchor).
fn click_geometry(tool: ToolKind, anchor: Point, config: &EngineConfig) -> Geometry {
    let size = config.default_shape_size;
    if tool.is_line_tool() {
        let end = anchor + Vec2::new(size.width, 0.0);
        line_between(anchor, end, config.line_thickness, config.min_line_length())
    } else {
        Geometry { position: anchor, size, rotation: 0.0 }
    }
}

/// Put a node back the way it was when the gesture started.
fn restore_geometry<S: NodeStore + ?Sized>(store: &mut S, start: Node) {
    let id = start.id();
    if store.update_node(id, start.geometry().into()).is_ok() {
        if let NodeKind::Freehand { points, .. } = start.kind {
            let patch = DataPatch { points: Some(points), ..Default::default() };
            let _ = store.update_node_data(id, patch);
        }
    }
}

/// Write the geometry for `pointer` to the session's target node.
fn apply_pointer<S: NodeStore + ?Sized>(
    state: &DrawSession,
    env: &mut SessionEnv<'_, S>,
    pointer: Point,
    modifiers: Modifiers,
) -> EngineResult<()> {
    let config = env.config;
    let store = &mut *env.store;
    match state {
        DrawSession::Idle | DrawSession::Freehand { .. } => Ok(()),
        DrawSession::BoxCreate { node, anchor, tool } => {
            let geometry = if tool.is_line_tool() {
                line_between(*anchor, pointer, config.line_thickness, config.min_line_length())
            } else {
                let rect = Rect::from_points(*anchor, pointer);
                let size = Size::new(
                    rect.width().max(config.min_shape_size.width),
                    rect.height().max(config.min_shape_size.height),
                );
                Geometry { position: rect.origin(), size, rotation: 0.0 }
            };
            store.update_node(*node, geometry.into())
        }
        DrawSession::Resizing { node, handle, anchor, start } => {
            let options = ResizeOptions {
                min_size: config.min_size_for(&start.kind),
                keep_aspect_ratio: modifiers.shift,
            };
            let geometry = resize_box(start, *handle, pointer - *anchor, options);
            store.update_node(*node, geometry.into())?;
            if let NodeKind::Freehand { points, .. } = &start.kind {
                let patch = DataPatch {
                    points: Some(scale_points(points, start.size, geometry.size)),
                    ..Default::default()
                };
                store.update_node_data(*node, patch)?;
            }
            Ok(())
        }
        DrawSession::Rotating { node, drag, .. } => {
            let snap = modifiers.shift.then_some(config.rotation_snap_degrees);
            let patch = NodePatch { rotation: Some(drag.rotate(pointer, snap)), ..Default::default() };
            store.update_node(*node, patch)
        }
        DrawSession::LineEndpoint { node, end, start } => {
            let geometry = resize_line(start, *end, pointer, config.min_line_length());
            store.update_node(*node, geometry.into())
        }
        DrawSession::Moving { anchor, start, others, .. } => {
            let delta: Vec2 = pointer - *anchor;
            for node in std::iter::once(start).chain(others) {
                let patch = NodePatch { position: Some(node.position + delta), ..Default::default() };
                store.update_node(node.id(), patch)?;
            }
            Ok(())
        }
    }
}

/// Turn a captured stroke into a freehand node, or drop it when too short.
fn finish_stroke<S: NodeStore + ?Sized>(env: SessionEnv<'_, S>, stroke: Vec<Point>) -> SessionOutcome {
    if stroke.len() <= 2 {
        log::debug!("Discarding stroke with {} points", stroke.len());
        return SessionOutcome::Discarded;
    }
    let Some(bounds) = bounding_box(&stroke) else {
        return SessionOutcome::Discarded;
    };
    let origin = bounds.origin();
    let min = env.config.min_shape_size;
    let size = Size::new(bounds.width().max(min.width), bounds.height().max(min.height));
    let points = stroke.iter().map(|p| (*p - origin).to_point()).collect();

    env.history.checkpoint(&*env.store);
    let node = Node::new(
        NodeKind::Freehand { points, stroke: StrokeColor::default(), stroke_width: DEFAULT_STROKE_WIDTH },
        origin,
        size,
    );
    let id = node.id();
    env.store.insert_node(node);
    log::debug!("Created freehand node {} from {} points", id, stroke.len());
    SessionOutcome::Created { node: id, tool: ToolKind::Freehand }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::node::ShapeKind;

    struct Fixture {
        doc: Document,
        history: History,
        config: EngineConfig,
        session: SessionController,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                doc: Document::new(),
                history: History::default(),
                config: EngineConfig::default(),
                session: SessionController::new(),
            }
        }

        fn env(&mut self) -> (&mut SessionController, SessionEnv<'_, Document>) {
            (
                &mut self.session,
                SessionEnv { store: &mut self.doc, history: &mut self.history, config: &self.config },
            )
        }

        fn begin(&mut self, gesture: Gesture, p: Point) -> SessionOutcome {
            let (session, env) = self.env();
            session.begin(env, gesture, p, Modifiers::NONE)
        }

        fn update(&mut self, p: Point) -> SessionOutcome {
            let (session, env) = self.env();
            session.update(env, p, Modifiers::NONE)
        }

        fn end(&mut self, p: Point) -> SessionOutcome {
            let (session, env) = self.env();
            session.end(env, p)
        }

        fn cancel(&mut self) -> SessionOutcome {
            let (session, env) = self.env();
            session.cancel(env)
        }
    }

    #[test]
    fn test_box_create_drag() {
        let mut f = Fixture::new();
        assert_eq!(f.begin(Gesture::Create(ToolKind::Rectangle), Point::new(100.0, 100.0)), SessionOutcome::Started);
        let id = f.session.state().target().unwrap();
        f.update(Point::new(150.0, 180.0));
        // Dragging up and left of the anchor still yields a positive box
        f.update(Point::new(40.0, 60.0));
        let outcome = f.end(Point::new(40.0, 60.0));
        assert_eq!(outcome, SessionOutcome::Created { node: id, tool: ToolKind::Rectangle });
        let node = f.doc.node(id).unwrap();
        assert_eq!(node.position, Point::new(40.0, 60.0));
        assert_eq!(node.size, Size::new(60.0, 40.0));
        assert!(!f.session.is_interacting());
        assert_eq!(f.history.undo_len(), 1);
    }

    #[test]
    fn test_reentrant_begin_is_ignored() {
        let mut f = Fixture::new();
        f.begin(Gesture::Freehand, Point::ZERO);
        assert_eq!(f.begin(Gesture::Create(ToolKind::Circle), Point::ZERO), SessionOutcome::Ignored);
        assert!(matches!(f.session.state(), DrawSession::Freehand { .. }));
        assert!(f.doc.is_empty());
    }

    #[test]
    fn test_short_stroke_discarded() {
        let mut f = Fixture::new();
        f.begin(Gesture::Freehand, Point::ZERO);
        f.update(Point::new(5.0, 5.0));
        assert_eq!(f.end(Point::new(5.0, 5.0)), SessionOutcome::Discarded);
        assert!(f.doc.is_empty());
        assert!(!f.history.can_undo());
    }

    #[test]
    fn test_stroke_points_relative_to_bounds() {
        let mut f = Fixture::new();
        f.begin(Gesture::Freehand, Point::new(10.0, 50.0));
        f.update(Point::new(30.0, 20.0));
        f.update(Point::new(60.0, 40.0));
        let SessionOutcome::Created { node, tool } = f.end(Point::new(60.0, 40.0)) else {
            panic!("stroke was not created");
        };
        assert_eq!(tool, ToolKind::Freehand);
        let node = f.doc.node(node).unwrap();
        assert_eq!(node.position, Point::new(10.0, 20.0));
        assert_eq!(node.size, Size::new(50.0, 30.0));
        let NodeKind::Freehand { points, .. } = &node.kind else {
            panic!("expected a freehand node");
        };
        assert_eq!(points[0], Point::new(0.0, 30.0));
        assert_eq!(points[2], Point::new(50.0, 20.0));
    }

    #[test]
    fn test_cancel_box_create_removes_node() {
        let mut f = Fixture::new();
        f.begin(Gesture::Create(ToolKind::Arrow), Point::ZERO);
        f.update(Point::new(80.0, 0.0));
        assert_eq!(f.cancel(), SessionOutcome::Cancelled);
        assert!(f.doc.is_empty());
        assert!(!f.history.can_undo());
    }

    #[test]
    fn test_cancel_move_restores_geometry() {
        let mut f = Fixture::new();
        let id = f.doc.create_shape_node(ShapeKind::Diamond, Point::new(10.0, 10.0), Size::new(50.0, 50.0));
        f.begin(Gesture::Move { node: id, others: Vec::new() }, Point::new(20.0, 20.0));
        f.update(Point::new(120.0, 70.0));
        assert_eq!(f.doc.node(id).unwrap().position, Point::new(110.0, 60.0));
        f.cancel();
        assert_eq!(f.doc.node(id).unwrap().position, Point::new(10.0, 10.0));
        assert!(!f.history.can_undo());
    }

    #[test]
    fn test_vanished_target_aborts() {
        let mut f = Fixture::new();
        let id = f.doc.create_shape_node(ShapeKind::Rectangle, Point::ZERO, Size::new(50.0, 50.0));
        f.begin(
            Gesture::Handle { node: id, handle: HandleKind::Resize(ResizeHandle::SouthEast) },
            Point::new(50.0, 50.0),
        );
        f.doc.remove_node(id);
        assert_eq!(f.update(Point::new(80.0, 80.0)), SessionOutcome::Aborted);
        assert!(!f.session.is_interacting());
    }

    #[test]
    fn test_click_without_drag_leaves_no_history() {
        let mut f = Fixture::new();
        let id = f.doc.create_shape_node(ShapeKind::Rectangle, Point::ZERO, Size::new(50.0, 50.0));
        f.begin(Gesture::Move { node: id, others: Vec::new() }, Point::new(25.0, 25.0));
        assert_eq!(f.end(Point::new(25.0, 25.0)), SessionOutcome::Committed(id));
        assert!(!f.history.can_undo());
    }

    #[test]
    fn test_click_create_uses_default_size() {
        let mut f = Fixture::new();
        f.begin(Gesture::Create(ToolKind::Rectangle), Point::new(10.0, 10.0));
        let SessionOutcome::Created { node, .. } = f.end(Point::new(10.0, 10.0)) else {
            panic!("rectangle was not created");
        };
        let node = f.doc.node(node).unwrap();
        assert_eq!(node.position, Point::new(10.0, 10.0));
        assert_eq!(node.size, f.config.default_shape_size);

        f.begin(Gesture::Create(ToolKind::Line), Point::new(0.0, 300.0));
        let SessionOutcome::Created { node, .. } = f.end(Point::new(0.0, 300.0)) else {
            panic!("line was not created");
        };
        let (start, end) = f.doc.node(node).unwrap().line_endpoints();
        assert!((start - Point::new(0.0, 300.0)).hypot() < 1e-9);
        assert!((end - Point::new(100.0, 300.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_move_carries_other_nodes() {
        let mut f = Fixture::new();
        let a = f.doc.create_shape_node(ShapeKind::Rectangle, Point::ZERO, Size::new(50.0, 50.0));
        let b = f.doc.create_shape_node(ShapeKind::Circle, Point::new(200.0, 0.0), Size::new(50.0, 50.0));
        f.begin(Gesture::Move { node: a, others: vec![a, b] }, Point::new(25.0, 25.0));
        f.update(Point::new(45.0, 35.0));
        assert_eq!(f.doc.node(b).unwrap().position, Point::new(220.0, 10.0));

        f.cancel();
        assert_eq!(f.doc.node(a).unwrap().position, Point::ZERO);
        assert_eq!(f.doc.node(b).unwrap().position, Point::new(200.0, 0.0));

        f.begin(Gesture::Move { node: a, others: vec![b] }, Point::new(25.0, 25.0));
        f.end(Point::new(25.0, 75.0));
        assert_eq!(f.doc.node(a).unwrap().position, Point::new(0.0, 50.0));
        assert_eq!(f.doc.node(b).unwrap().position, Point::new(200.0, 50.0));
        assert_eq!(f.history.undo_len(), 1);
    }

    #[test]
    fn test_click_keeps_redo_stack() {
        let mut f = Fixture::new();
        let id = f.doc.create_shape_node(ShapeKind::Rectangle, Point::ZERO, Size::new(50.0, 50.0));
        f.begin(Gesture::Move { node: id, others: Vec::new() }, Point::new(10.0, 10.0));
        f.end(Point::new(30.0, 10.0));
        assert!(f.history.undo(&mut f.doc));

        f.begin(Gesture::Move { node: id, others: Vec::new() }, Point::new(10.0, 10.0));
        f.end(Point::new(10.0, 10.0));
        assert!(f.history.can_redo());
        assert!(!f.history.has_staged());
    }

    #[test]
    fn test_expire_commits_at_last_pointer() {
        let mut f = Fixture::new();
        let id = f.doc.create_shape_node(ShapeKind::Rectangle, Point::ZERO, Size::new(50.0, 50.0));
        f.begin(Gesture::Move { node: id, others: Vec::new() }, Point::ZERO);
        f.update(Point::new(30.0, 0.0));

        let (session, env) = f.env();
        assert_eq!(session.expire(env, Instant::now()), SessionOutcome::Ignored);
        let later = Instant::now() + Duration::from_millis(10_001);
        let (session, env) = f.env();
        assert_eq!(session.expire(env, later), SessionOutcome::Committed(id));
        assert_eq!(f.doc.node(id).unwrap().position, Point::new(30.0, 0.0));
        assert!(f.history.can_undo());
    }

    #[test]
    fn test_freehand_resize_scales_points() {
        let mut f = Fixture::new();
        let id = f.doc.create_freehand_node(
            vec![Point::new(0.0, 0.0), Point::new(50.0, 20.0), Point::new(100.0, 40.0)],
            Point::ZERO,
            Size::new(100.0, 40.0),
            2.0,
        );
        f.begin(
            Gesture::Handle { node: id, handle: HandleKind::Resize(ResizeHandle::East) },
            Point::new(100.0, 20.0),
        );
        f.end(Point::new(200.0, 20.0));
        let NodeKind::Freehand { points, .. } = &f.doc.node(id).unwrap().kind else {
            panic!("expected a freehand node");
        };
        assert_eq!(points[2], Point::new(200.0, 40.0));
    }
}
