//! Board document: nodes in z-order plus container edges.

use crate::error::{EngineError, EngineResult};
use crate::history::HistorySnapshot;
use crate::node::{
    DataPatch, Edge, EdgeId, Geometry, Node, NodeId, NodeKind, NodePatch, ShapeKind, StrokeColor,
};
use crate::store::NodeStore;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// In-memory node store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Nodes back to front.
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in z-order (back to front).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node_mut(&mut self, id: NodeId) -> EngineResult<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(EngineError::NodeNotFound(id))
    }

    fn add(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.insert_node(node);
        id
    }

    /// Create a rectangle, circle or diamond.
    pub fn create_shape_node(&mut self, shape: ShapeKind, position: Point, size: Size) -> NodeId {
        self.add(Node::new(
            NodeKind::Shape { shape, stroke: StrokeColor::default() },
            position,
            size,
        ))
    }

    /// Create a line or arrow with the given geometry.
    pub fn create_line_node(&mut self, arrow: bool, geometry: Geometry) -> NodeId {
        let mut node = Node::new(
            NodeKind::Line { arrow, stroke: StrokeColor::default() },
            geometry.position,
            geometry.size,
        );
        node.apply_patch(NodePatch { rotation: Some(geometry.rotation), ..Default::default() });
        self.add(node)
    }

    /// Create a freehand stroke. `points` are relative to `position`.
    pub fn create_freehand_node(
        &mut self,
        points: Vec<Point>,
        position: Point,
        size: Size,
        stroke_width: f64,
    ) -> NodeId {
        self.add(Node::new(
            NodeKind::Freehand { points, stroke: StrokeColor::default(), stroke_width },
            position,
            size,
        ))
    }

    pub fn create_text_node(&mut self, text: impl Into<String>, position: Point, size: Size) -> NodeId {
        self.add(Node::new(NodeKind::Text { text: text.into() }, position, size))
    }

    /// Create a container. With a `parent`, a parent to child edge is added too.
    pub fn create_container_node(
        &mut self,
        name: impl Into<String>,
        position: Point,
        size: Size,
        parent: Option<NodeId>,
    ) -> NodeId {
        let parent = parent.filter(|&p| {
            let exists = self.node(p).is_some();
            if !exists {
                log::warn!("Parent {} not found, creating container without edge", p);
            }
            exists
        });
        let id = self.add(Node::new(
            NodeKind::Container { name: name.into(), description: String::new(), parent },
            position,
            size,
        ));
        if let Some(parent) = parent {
            self.edges.push(Edge::new(parent, id));
        }
        id
    }

    /// Add a parent to child edge between two existing nodes.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EngineResult<EdgeId> {
        if source == target {
            return Err(EngineError::SelfLoop(source));
        }
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(EngineError::NodeNotFound(id));
            }
        }
        let edge = Edge::new(source, target);
        let id = edge.id;
        self.edges.push(edge);
        Ok(id)
    }

    /// Insert an edge whose endpoints already exist.
    pub fn insert_edge(&mut self, edge: Edge) -> EngineResult<()> {
        for id in [edge.source, edge.target] {
            if self.node(id).is_none() {
                return Err(EngineError::NodeNotFound(id));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Remove several nodes and every edge touching them.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Vec<Node> {
        ids.iter().filter_map(|&id| self.remove_node(id)).collect()
    }

    /// Find nodes at a canvas point, front to back.
    pub fn nodes_at_point(&self, point: Point, tolerance: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .rev()
            .filter(|n| n.hit_test(point, tolerance))
            .map(|n| n.id)
            .collect()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON. Edges pointing at missing nodes are
    /// dropped; a node with a non-positive size fails the load.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let mut doc: Self = serde_json::from_str(json)?;
        for node in &mut doc.nodes {
            if !Node::is_valid_size(node.size) {
                return Err(EngineError::InvalidSize { id: node.id, size: node.size });
            }
            node.rotation = crate::geometry::normalize_degrees(node.rotation);
        }
        let before = doc.edges.len();
        let nodes = &doc.nodes;
        doc.edges
            .retain(|e| nodes.iter().any(|n| n.id == e.source) && nodes.iter().any(|n| n.id == e.target));
        if doc.edges.len() != before {
            log::warn!("Dropped {} dangling edges", before - doc.edges.len());
        }
        Ok(doc)
    }
}

impl NodeStore for Document {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn update_node(&mut self, id: NodeId, patch: NodePatch) -> EngineResult<()> {
        let node = self.node_mut(id)?;
        if let Some(size) = patch.size.filter(|&size| !Node::is_valid_size(size)) {
            return Err(EngineError::InvalidSize { id, size });
        }
        node.apply_patch(patch);
        Ok(())
    }

    fn update_node_data(&mut self, id: NodeId, patch: DataPatch) -> EngineResult<()> {
        self.node_mut(id)?.apply_data_patch(patch);
        Ok(())
    }

    fn insert_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(self.nodes.remove(index))
    }

    fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    fn restore(&mut self, snapshot: HistorySnapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
    }
}
