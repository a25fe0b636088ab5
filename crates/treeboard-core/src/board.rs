//! Board state: document, history, camera, tool and selection.
//!
//! The board routes screen-space pointer events through the camera into the
//! session controller and owns the editing commands (undo, delete, paste).

use crate::camera::{Camera, Viewport};
use crate::config::EngineConfig;
use crate::document::Document;
use crate::error::{EngineError, EngineResult};
use crate::handles::{Handle, hit_test_handles, node_handles};
use crate::history::{History, HistorySnapshot};
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::node::{DataPatch, Edge, EdgeId, NodeId, NodeKind, NodePatch};
use crate::session::{Gesture, SessionController, SessionEnv, SessionOutcome};
use crate::smoothing::smooth;
use crate::store::NodeStore;
use crate::tools::ToolKind;
use kurbo::{BezPath, Point, Size, Vec2};
use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Body hit tolerance in screen pixels.
const BODY_HIT_TOLERANCE: f64 = 5.0;
/// Zoom factor per scroll step.
const SCROLL_ZOOM_STEP: f64 = 1.1;

/// Name given to containers created with the container tool.
const NEW_CONTAINER_NAME: &str = "New Folder";
/// Initial content of text nodes created with the text tool.
const NEW_TEXT: &str = "Text";

/// Interactive board state.
#[derive(Debug, Clone)]
pub struct Board {
    document: Document,
    history: History,
    /// Camera for view transform.
    pub camera: Camera,
    tool: ToolKind,
    session: SessionController,
    /// Selected node ids, in selection order.
    selection: Vec<NodeId>,
    clipboard: Option<HistorySnapshot>,
    config: EngineConfig,
    /// Screen point of an in-progress pan drag.
    pan_anchor: Option<Point>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! session_env {
    ($board:expr) => {
        SessionEnv {
            store: &mut $board.document,
            history: &mut $board.history,
            config: &$board.config,
        }
    };
}

impl Board {
    /// Create a board with an empty document and default config.
    pub fn new() -> Self {
        Self::with_document(Document::new(), EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    /// Create a board around an existing document.
    pub fn with_document(document: Document, config: EngineConfig) -> Self {
        let config = config.sanitized();
        Self {
            document,
            history: History::new(config.history_limit),
            camera: Camera::new(),
            tool: ToolKind::default(),
            session: SessionController::new(),
            selection: Vec::new(),
            clipboard: None,
            config,
            pan_anchor: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// True while a pointer gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        self.session.is_interacting()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. Ignored while a gesture is in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.is_interacting() {
            log::debug!("Ignoring tool switch to {:?} during a gesture", tool);
            return;
        }
        if self.tool != tool {
            log::debug!("Tool: {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    // --- selection ---

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Select a node (clears previous selection).
    pub fn select(&mut self, id: NodeId) {
        self.selection.clear();
        self.add_to_selection(id);
    }

    pub fn add_to_selection(&mut self, id: NodeId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select all nodes.
    pub fn select_all(&mut self) {
        self.selection = self.document.nodes().iter().map(|n| n.id()).collect();
    }

    /// Drop selected ids whose nodes no longer exist.
    fn prune_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|&id| document.node(id).is_some());
    }

    /// Handles of every selected node.
    pub fn selected_handles(&self) -> Vec<Handle> {
        self.selection
            .iter()
            .filter_map(|&id| self.document.node(id))
            .flat_map(|node| node_handles(node, self.config.rotate_handle_offset))
            .collect()
    }

    // --- pointer input ---

    /// Route a screen-space pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> SessionOutcome {
        match event {
            PointerEvent::Down { position, button: MouseButton::Left, modifiers } => {
                self.pointer_down(position, modifiers)
            }
            PointerEvent::Down { .. } => SessionOutcome::Ignored,
            PointerEvent::Move { position, modifiers } => self.pointer_move(position, modifiers),
            PointerEvent::Up { position, button: MouseButton::Left } => self.pointer_up(position),
            PointerEvent::Up { .. } => SessionOutcome::Ignored,
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::Scroll { position, delta } => {
                // Horizontal-only wheel events do not zoom
                if delta.y != 0.0 {
                    let factor = if delta.y < 0.0 { SCROLL_ZOOM_STEP } else { 1.0 / SCROLL_ZOOM_STEP };
                    self.camera.zoom_at(position, factor);
                }
                SessionOutcome::Ignored
            }
        }
    }

    /// Pointer pressed at a screen point.
    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) -> SessionOutcome {
        if self.is_interacting() {
            log::debug!("Pointer down ignored: gesture already active");
            return SessionOutcome::Ignored;
        }
        let canvas = self.camera.screen_to_canvas(screen);

        match self.tool {
            ToolKind::Pan => {
                self.pan_anchor = Some(screen);
                SessionOutcome::Ignored
            }
            ToolKind::Freehand => self.session.begin(session_env!(self), Gesture::Freehand, canvas, modifiers),
            tool if tool.creates_by_drag() => {
                self.clear_selection();
                self.session.begin(session_env!(self), Gesture::Create(tool), canvas, modifiers)
            }
            tool if tool.creates_by_click() => {
                let id = self.create_at(tool, canvas);
                self.select(id);
                self.set_tool(ToolKind::Select);
                SessionOutcome::Created { node: id, tool }
            }
            _ => self.select_press(canvas, modifiers),
        }
    }

    /// Select-tool press: handles of selected nodes, then node bodies.
    fn select_press(&mut self, canvas: Point, modifiers: Modifiers) -> SessionOutcome {
        let zoom = self.camera.zoom;
        let handle_tolerance = self.config.handle_hit_tolerance / zoom;
        let handle_hit = self.selection.iter().rev().find_map(|&id| {
            let node = self.document.node(id)?;
            let kind = hit_test_handles(node, canvas, handle_tolerance, self.config.rotate_handle_offset)?;
            Some((id, kind))
        });
        if let Some((node, handle)) = handle_hit {
            return self.session.begin(session_env!(self), Gesture::Handle { node, handle }, canvas, modifiers);
        }

        let hit = self
            .document
            .nodes_at_point(canvas, BODY_HIT_TOLERANCE / zoom)
            .first()
            .copied();
        match hit {
            Some(node) => {
                if modifiers.shift {
                    self.add_to_selection(node);
                } else if !self.is_selected(node) {
                    self.select(node);
                }
                let gesture = Gesture::Move { node, others: self.selection.clone() };
                self.session.begin(session_env!(self), gesture, canvas, modifiers)
            }
            None => {
                self.clear_selection();
                SessionOutcome::Ignored
            }
        }
    }

    /// Create a default-sized container or text node at a canvas point.
    fn create_at(&mut self, tool: ToolKind, canvas: Point) -> NodeId {
        self.history.checkpoint(&self.document);
        let id = match tool {
            ToolKind::Container => self.document.create_container_node(
                NEW_CONTAINER_NAME,
                canvas,
                self.config.default_container_size,
                None,
            ),
            _ => self.document.create_text_node(NEW_TEXT, canvas, self.config.default_text_size),
        };
        log::debug!("Created {:?} node {} at {:?}", tool, id, canvas);
        id
    }

    /// Pointer moved to a screen point.
    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> SessionOutcome {
        if let Some(anchor) = self.pan_anchor {
            self.camera.pan(screen - anchor);
            self.pan_anchor = Some(screen);
            return SessionOutcome::Ignored;
        }
        let canvas = self.camera.screen_to_canvas(screen);
        let outcome = self.session.update(session_env!(self), canvas, modifiers);
        self.after_session(outcome)
    }

    /// Pointer released at a screen point.
    pub fn pointer_up(&mut self, screen: Point) -> SessionOutcome {
        if self.pan_anchor.take().is_some() {
            return SessionOutcome::Ignored;
        }
        let canvas = self.camera.screen_to_canvas(screen);
        let outcome = self.session.end(session_env!(self), canvas);
        self.after_session(outcome)
    }

    /// Pointer left the window or focus was lost: commit at the last position.
    pub fn pointer_leave(&mut self) -> SessionOutcome {
        self.pan_anchor = None;
        let outcome = self.session.release(session_env!(self));
        self.after_session(outcome)
    }

    /// Revert the active gesture.
    pub fn cancel_gesture(&mut self) -> SessionOutcome {
        self.pan_anchor = None;
        let outcome = self.session.cancel(session_env!(self));
        self.prune_selection();
        outcome
    }

    /// Commit a gesture that has seen no pointer event for the configured
    /// timeout. Call periodically.
    pub fn tick(&mut self, now: Instant) -> SessionOutcome {
        let outcome = self.session.expire(session_env!(self), now);
        self.after_session(outcome)
    }

    fn after_session(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        match outcome {
            SessionOutcome::Created { node, tool } if tool.creates_by_drag() => {
                self.set_tool(ToolKind::Select);
                self.select(node);
            }
            SessionOutcome::Aborted => self.prune_selection(),
            _ => {}
        }
        outcome
    }

    /// Live freehand stroke in screen space, smoothed.
    pub fn freehand_preview(&self) -> Option<BezPath> {
        let stroke = self.session.stroke()?;
        let transform = self.camera.viewport_transform();
        let screen: Vec<Point> = stroke.iter().map(|p| transform.apply(*p)).collect();
        Some(smooth(&screen))
    }

    // --- editing commands ---

    /// Undo the last change. Returns false if nothing was undone.
    pub fn undo(&mut self) -> bool {
        if self.is_interacting() {
            return false;
        }
        let undone = self.history.undo(&mut self.document);
        self.prune_selection();
        undone
    }

    /// Redo the last undone change. Returns false if nothing was redone.
    pub fn redo(&mut self) -> bool {
        if self.is_interacting() {
            return false;
        }
        let redone = self.history.redo(&mut self.document);
        self.prune_selection();
        redone
    }

    /// Delete the selected nodes and their edges. Returns the number removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.is_interacting() || self.selection.is_empty() {
            return 0;
        }
        self.history.checkpoint(&self.document);
        let ids = std::mem::take(&mut self.selection);
        let removed = self.document.remove_nodes(&ids).len();
        log::debug!("Deleted {} nodes", removed);
        removed
    }

    fn ensure_idle(&self) -> EngineResult<()> {
        if self.is_interacting() {
            return Err(EngineError::GestureInProgress);
        }
        Ok(())
    }

    /// Connect two nodes with a parent to child edge.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EngineResult<EdgeId> {
        self.ensure_idle()?;
        self.history.checkpoint(&self.document);
        let result = self.document.connect(source, target);
        if result.is_err() {
            self.history.discard_last();
        }
        result
    }

    /// Update a node's geometry as a single undoable step. A patched size is
    /// raised to the node kind's minimum.
    pub fn update_node(&mut self, id: NodeId, mut patch: NodePatch) -> EngineResult<()> {
        self.ensure_idle()?;
        let node = self.document.node(id).ok_or(EngineError::NodeNotFound(id))?;
        if let Some(size) = patch.size.as_mut() {
            let min = self.config.min_size_for(&node.kind);
            // f64::max also replaces NaN with the minimum
            *size = Size::new(size.width.max(min.width), size.height.max(min.height));
        }
        self.history.checkpoint(&self.document);
        let result = self.document.update_node(id, patch);
        if result.is_err() {
            self.history.discard_last();
        }
        result
    }

    /// Update a node's type data (rename, recolor) as a single undoable step.
    pub fn update_node_data(&mut self, id: NodeId, patch: DataPatch) -> EngineResult<()> {
        self.ensure_idle()?;
        self.history.checkpoint(&self.document);
        let result = self.document.update_node_data(id, patch);
        if result.is_err() {
            self.history.discard_last();
        }
        result
    }

    /// Copy the selected nodes and the edges between them.
    pub fn copy_selection(&mut self) -> usize {
        let nodes: Vec<_> = self
            .selection
            .iter()
            .filter_map(|&id| self.document.node(id).cloned())
            .collect();
        if nodes.is_empty() {
            return 0;
        }
        let edges = self
            .document
            .edges()
            .iter()
            .filter(|e| self.is_selected(e.source) && self.is_selected(e.target))
            .cloned()
            .collect();
        let count = nodes.len();
        self.clipboard = Some(HistorySnapshot { nodes, edges });
        count
    }

    /// Paste the clipboard with fresh ids, offset from the copied position.
    /// The pasted nodes become the selection.
    pub fn paste(&mut self) -> Vec<NodeId> {
        if self.is_interacting() {
            return Vec::new();
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Vec::new();
        };
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        for node in &mut clipboard.nodes {
            node.position += offset;
        }
        let clipboard = clipboard.clone();

        self.history.checkpoint(&self.document);
        let mut ids = HashMap::new();
        let mut pasted = Vec::with_capacity(clipboard.nodes.len());
        let mut nodes = clipboard.nodes;
        for node in &mut nodes {
            let old = node.id();
            node.regenerate_id();
            ids.insert(old, node.id());
        }
        for mut node in nodes {
            if let NodeKind::Container { parent, .. } = &mut node.kind {
                *parent = parent.and_then(|p| ids.get(&p).copied());
            }
            pasted.push(node.id());
            self.document.insert_node(node);
        }
        for edge in clipboard.edges {
            if let (Some(&source), Some(&target)) = (ids.get(&edge.source), ids.get(&edge.target)) {
                if let Err(err) = self.document.insert_edge(Edge::new(source, target)) {
                    log::warn!("Skipping pasted edge: {}", err);
                }
            }
        }
        log::debug!("Pasted {} nodes", pasted.len());
        self.selection = pasted.clone();
        pasted
    }

    /// Handle a key press. Returns true if the key was consumed.
    ///
    /// `key` is a key name (`"Delete"`, `"Escape"`) or a single character.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if key == "Escape" {
            if self.is_interacting() {
                self.cancel_gesture();
            } else {
                self.clear_selection();
            }
            return true;
        }
        if self.is_interacting() {
            return false;
        }

        let lower = key.to_ascii_lowercase();
        if modifiers.command() {
            return match lower.as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "y" => self.redo(),
                "c" => self.copy_selection() > 0,
                "v" => !self.paste().is_empty(),
                "a" => {
                    self.select_all();
                    true
                }
                _ => false,
            };
        }

        match key {
            "Delete" | "Backspace" => self.delete_selected() > 0,
            _ => match ToolKind::from_shortcut(key) {
                Some(tool) => {
                    self.set_tool(tool);
                    true
                }
                None => false,
            },
        }
    }
}
