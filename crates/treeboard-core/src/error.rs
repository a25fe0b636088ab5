//! Error types for the engine.

use crate::node::NodeId;
use kurbo::Size;
use thiserror::Error;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("Node {id} cannot have size {size:?}")]
    InvalidSize { id: NodeId, size: Size },
    #[error("Cannot edit the board while a gesture is in progress")]
    GestureInProgress,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
