//! Node store abstraction used by the session controller and history.

use crate::error::EngineResult;
use crate::history::HistorySnapshot;
use crate::node::{DataPatch, Node, NodeId, NodePatch};

/// Authoritative holder of the board's nodes and edges.
///
/// The engine only reads nodes through this trait and writes them back
/// through patches, so hosts can back it with their own state.
pub trait NodeStore {
    /// Look up a node by id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Apply a geometry patch. Rotation is normalized on write.
    fn update_node(&mut self, id: NodeId, patch: NodePatch) -> EngineResult<()>;

    /// Apply a patch to the node's type data.
    fn update_node_data(&mut self, id: NodeId, patch: DataPatch) -> EngineResult<()>;

    /// Add a node on top of the z-order.
    fn insert_node(&mut self, node: Node);

    /// Remove a node together with the edges touching it.
    fn remove_node(&mut self, id: NodeId) -> Option<Node>;

    /// Deep copy of all nodes and edges.
    fn snapshot(&self) -> HistorySnapshot;

    /// Replace all nodes and edges with a snapshot.
    fn restore(&mut self, snapshot: HistorySnapshot);
}
