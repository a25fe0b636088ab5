//! Node and edge definitions for the board.

use crate::geometry::{self, normalize_degrees, rotate_vector};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;

/// Unique identifier for edges.
pub type EdgeId = Uuid;

/// Serializable stroke color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
                255,
            )),
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Color> for StrokeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Outline drawn by a shape node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
}

/// Variant-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Folder node that can be connected to other containers.
    Container {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        parent: Option<NodeId>,
    },
    Shape {
        shape: ShapeKind,
        #[serde(default)]
        stroke: StrokeColor,
    },
    Text {
        text: String,
    },
    /// Freehand stroke; points are relative to the node position.
    Freehand {
        points: Vec<Point>,
        #[serde(default)]
        stroke: StrokeColor,
        stroke_width: f64,
    },
    /// Line or arrow. Width is the length, rotation the direction.
    Line {
        arrow: bool,
        #[serde(default)]
        stroke: StrokeColor,
    },
}

impl NodeKind {
    pub fn is_line(&self) -> bool {
        matches!(self, NodeKind::Line { .. })
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container { .. })
    }
}

/// Position, size and rotation of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub position: Point,
    pub size: Size,
    pub rotation: f64,
}

/// Partial update of a node's geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodePatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
}

impl From<Geometry> for NodePatch {
    fn from(geometry: Geometry) -> Self {
        Self {
            position: Some(geometry.position),
            size: Some(geometry.size),
            rotation: Some(geometry.rotation),
        }
    }
}

/// Partial update of a node's type data. Fields that do not apply to the
/// node's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
    pub stroke: Option<StrokeColor>,
    pub stroke_width: Option<f64>,
    pub points: Option<Vec<Point>>,
}

/// A node on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Top-left of the unrotated bounding box, in canvas space.
    pub position: Point,
    pub size: Size,
    /// Clockwise rotation about the box center, in degrees.
    #[serde(default)]
    pub rotation: f64,
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with a fresh id.
    pub fn new(kind: NodeKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            rotation: 0.0,
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Replace the id with a new unique one (used when pasting).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            position: self.position,
            size: self.size,
            rotation: self.rotation,
        }
    }

    /// Both sides finite and strictly positive.
    pub fn is_valid_size(size: Size) -> bool {
        size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
    }

    pub fn apply_patch(&mut self, patch: NodePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_degrees(rotation);
        }
    }

    pub fn apply_data_patch(&mut self, patch: DataPatch) {
        match &mut self.kind {
            NodeKind::Container { name, description, .. } => {
                if let Some(v) = patch.name {
                    *name = v;
                }
                if let Some(v) = patch.description {
                    *description = v;
                }
            }
            NodeKind::Shape { stroke, .. } | NodeKind::Line { stroke, .. } => {
                if let Some(v) = patch.stroke {
                    *stroke = v;
                }
            }
            NodeKind::Text { text } => {
                if let Some(v) = patch.text {
                    *text = v;
                }
            }
            NodeKind::Freehand { points, stroke, stroke_width } => {
                if let Some(v) = patch.points {
                    *points = v;
                }
                if let Some(v) = patch.stroke {
                    *stroke = v;
                }
                if let Some(v) = patch.stroke_width {
                    *stroke_width = v;
                }
            }
        }
    }

    /// Center of the box in canvas space (fixed under rotation).
    pub fn center(&self) -> Point {
        self.position + Vec2::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Map a point from the node's local (unrotated) frame to canvas space.
    pub fn local_to_canvas(&self, local: Point) -> Point {
        let half = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        self.center() + rotate_vector(local.to_vec2() - half, self.rotation)
    }

    /// Map a canvas point into the node's local (unrotated) frame.
    pub fn canvas_to_local(&self, canvas: Point) -> Point {
        let half = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        (rotate_vector(canvas - self.center(), -self.rotation) + half).to_point()
    }

    /// Start and end of a line-like node, in canvas space.
    pub fn line_endpoints(&self) -> (Point, Point) {
        let half = rotate_vector(Vec2::new(self.size.width / 2.0, 0.0), self.rotation);
        let center = self.center();
        (center - half, center + half)
    }

    /// Axis-aligned bounds of the rotated box.
    pub fn bounds(&self) -> Rect {
        let (w, h) = (self.size.width, self.size.height);
        let corners = [
            self.local_to_canvas(Point::new(0.0, 0.0)),
            self.local_to_canvas(Point::new(w, 0.0)),
            self.local_to_canvas(Point::new(w, h)),
            self.local_to_canvas(Point::new(0.0, h)),
        ];
        geometry::bounding_box(&corners).unwrap_or(Rect::ZERO)
    }

    /// Check if a canvas point hits this node.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.kind.is_line() {
            let (start, end) = self.line_endpoints();
            let reach = tolerance + self.size.height / 2.0;
            return geometry::point_to_segment_dist(point, start, end) <= reach;
        }
        let local = self.canvas_to_local(point);
        Rect::from_origin_size(Point::ZERO, self.size)
            .inflate(tolerance, tolerance)
            .contains(local)
    }
}

/// A directed parent/child relation between container nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
        }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}
