//! TreeBoard Core Library
//!
//! Pointer-driven geometry engine for the TreeBoard canvas: rotated box
//! resize, rotation, line endpoint editing, freehand capture and smoothing,
//! and snapshot undo/redo over an in-memory node store.

pub mod board;
pub mod camera;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod node;
pub mod session;
pub mod smoothing;
pub mod store;
pub mod tools;
pub mod transform;

pub use board::Board;
pub use camera::{Camera, Viewport, ViewportTransform};
pub use config::EngineConfig;
pub use document::Document;
pub use error::{EngineError, EngineResult};
pub use handles::{Handle, HandleKind, LineEnd, ResizeHandle};
pub use history::{History, HistorySnapshot};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use node::{DataPatch, Edge, EdgeId, Geometry, Node, NodeId, NodeKind, NodePatch, ShapeKind, StrokeColor};
pub use session::{DrawSession, Gesture, SessionController, SessionEnv, SessionOutcome};
pub use smoothing::{path_data, smooth};
pub use store::NodeStore;
pub use tools::ToolKind;
