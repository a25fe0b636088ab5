//! Rotation drag.

use crate::geometry::{angle_deg, normalize_degrees};
use crate::node::Node;
use kurbo::Point;

/// State captured when a rotation drag starts.
///
/// The node center stays fixed for the whole drag; the rotation follows the
/// change in pointer angle around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDrag {
    pub center: Point,
    pub start_mouse_angle: f64,
    pub start_rotation: f64,
}

impl RotationDrag {
    pub fn begin(node: &Node, pointer: Point) -> Self {
        let center = node.center();
        Self {
            center,
            start_mouse_angle: angle_deg(center, pointer),
            start_rotation: node.rotation,
        }
    }

    /// Rotation for the current pointer, normalized to `[0, 360)`.
    ///
    /// With `snap`, the result is rounded to the nearest multiple.
    pub fn rotate(&self, pointer: Point, snap: Option<f64>) -> f64 {
        let current = angle_deg(self.center, pointer);
        let raw = self.start_rotation + (current - self.start_mouse_angle);
        let snapped = match snap {
            Some(step) if step > 0.0 => (raw / step).round() * step,
            _ => raw,
        };
        normalize_degrees(snapped)
    }
}
