//! Manipulation handles for selected nodes.

use crate::node::Node;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Which end of an axis a resize handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left or top.
    Start,
    /// Right or bottom.
    End,
}

/// Compass position of a resize handle on the node's local box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    /// Corners first so they win over edges on small nodes.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::North,
        ResizeHandle::East,
        ResizeHandle::South,
        ResizeHandle::West,
    ];

    /// Horizontal edge moved by this handle, if any.
    pub fn horizontal(self) -> Option<Side> {
        match self {
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest => Some(Side::Start),
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast => Some(Side::End),
            ResizeHandle::North | ResizeHandle::South => None,
        }
    }

    /// Vertical edge moved by this handle, if any.
    pub fn vertical(self) -> Option<Side> {
        match self {
            ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest => Some(Side::Start),
            ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest => Some(Side::End),
            ResizeHandle::East | ResizeHandle::West => None,
        }
    }

    pub fn is_corner(self) -> bool {
        self.horizontal().is_some() && self.vertical().is_some()
    }

    /// Position of the handle as a fraction of the local box (0, 0.5 or 1).
    fn anchor(self) -> (f64, f64) {
        let fraction = |side: Option<Side>| match side {
            Some(Side::Start) => 0.0,
            Some(Side::End) => 1.0,
            None => 0.5,
        };
        (fraction(self.horizontal()), fraction(self.vertical()))
    }
}

/// Endpoint of a line-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineEnd {
    Start,
    End,
}

/// Type of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    /// Rotation handle above the top edge.
    Rotate,
    /// Endpoint handle for lines and arrows.
    Endpoint(LineEnd),
}

/// A handle with its position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    /// `tolerance` should already be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles of a node, rotated with it.
///
/// Lines get their two endpoints; every other node gets the eight resize
/// handles plus a rotation handle `rotate_handle_offset` above its top edge.
pub fn node_handles(node: &Node, rotate_handle_offset: f64) -> Vec<Handle> {
    if node.kind.is_line() {
        let (start, end) = node.line_endpoints();
        return vec![
            Handle::new(start, HandleKind::Endpoint(LineEnd::Start)),
            Handle::new(end, HandleKind::Endpoint(LineEnd::End)),
        ];
    }

    let (w, h) = (node.size.width, node.size.height);
    let mut handles: Vec<Handle> = ResizeHandle::ALL
        .iter()
        .map(|&handle| {
            let (fx, fy) = handle.anchor();
            let position = node.local_to_canvas(Point::new(w * fx, h * fy));
            Handle::new(position, HandleKind::Resize(handle))
        })
        .collect();
    handles.push(Handle::new(
        node.local_to_canvas(Point::new(w / 2.0, -rotate_handle_offset)),
        HandleKind::Rotate,
    ));
    handles
}

/// Find the handle closest to `point` within `tolerance`.
pub fn hit_test_handles(
    node: &Node,
    point: Point,
    tolerance: f64,
    rotate_handle_offset: f64,
) -> Option<HandleKind> {
    node_handles(node, rotate_handle_offset)
        .into_iter()
        .filter(|handle| handle.hit_test(point, tolerance))
        .min_by(|a, b| {
            let da = (point - a.position).hypot2();
            let db = (point - b.position).hypot2();
            da.total_cmp(&db)
        })
        .map(|handle| handle.kind)
}
