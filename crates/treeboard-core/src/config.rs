//! Engine configuration.

use crate::error::EngineResult;
use crate::node::NodeKind;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Tunable limits and defaults for the engine.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of undo snapshots kept.
    pub history_limit: usize,
    /// Minimum size of shapes, freehand strokes and line length.
    pub min_shape_size: Size,
    /// Minimum size of container (folder) nodes.
    pub min_container_size: Size,
    /// Minimum size of text nodes.
    pub min_text_size: Size,
    /// Fixed height of line-like nodes.
    pub line_thickness: f64,
    /// Handle hit tolerance in screen pixels.
    pub handle_hit_tolerance: f64,
    /// Distance from the top edge to the rotation handle (canvas units).
    pub rotate_handle_offset: f64,
    /// Rotation snap increment in degrees (Shift held).
    pub rotation_snap_degrees: f64,
    /// A gesture without pointer events for this long is committed.
    pub gesture_timeout_ms: u64,
    /// Size of shapes created without dragging.
    pub default_shape_size: Size,
    /// Size of text nodes created by a click.
    pub default_text_size: Size,
    /// Size of container nodes created by a click.
    pub default_container_size: Size,
    /// Offset applied to pasted nodes.
    pub paste_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            min_shape_size: Size::new(1.0, 1.0),
            min_container_size: Size::new(150.0, 50.0),
            min_text_size: Size::new(50.0, 20.0),
            line_thickness: 20.0,
            handle_hit_tolerance: 12.0,
            rotate_handle_offset: 18.0,
            rotation_snap_degrees: 15.0,
            gesture_timeout_ms: 10_000,
            default_shape_size: Size::new(100.0, 100.0),
            default_text_size: Size::new(100.0, 40.0),
            default_container_size: Size::new(150.0, 80.0),
            paste_offset: 20.0,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace values that would break node invariants with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.history_limit == 0 {
            log::warn!("history_limit must be at least 1, using {}", defaults.history_limit);
            self.history_limit = defaults.history_limit;
        }
        for (name, size, fallback) in [
            ("min_shape_size", &mut self.min_shape_size, defaults.min_shape_size),
            ("min_container_size", &mut self.min_container_size, defaults.min_container_size),
            ("min_text_size", &mut self.min_text_size, defaults.min_text_size),
        ] {
            if !(size.width > 0.0 && size.height > 0.0) {
                log::warn!("{} must be positive, using {:?}", name, fallback);
                *size = fallback;
            }
        }
        if !(self.line_thickness > 0.0) {
            log::warn!("line_thickness must be positive, using {}", defaults.line_thickness);
            self.line_thickness = defaults.line_thickness;
        }
        self
    }

    /// Minimum box size for a node kind.
    pub fn min_size_for(&self, kind: &NodeKind) -> Size {
        match kind {
            NodeKind::Container { .. } => self.min_container_size,
            NodeKind::Text { .. } => self.min_text_size,
            NodeKind::Shape { .. } | NodeKind::Freehand { .. } | NodeKind::Line { .. } => {
                self.min_shape_size
            }
        }
    }

    /// Minimum length of a line-like node.
    pub fn min_line_length(&self) -> f64 {
        self.min_shape_size.width
    }
}
