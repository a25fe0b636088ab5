//! Geometry primitives shared by the transform engine.
//!
//! Angles are in degrees. The canvas is y-down, so a positive angle turns
//! clockwise on screen.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing computed coordinates.
pub const EPSILON: f64 = 1e-9;

/// Rotate a vector by `angle_deg` degrees.
pub fn rotate_vector(v: Vec2, angle_deg: f64) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Express a canvas-space delta in the local frame of a node rotated by
/// `rotation_deg`.
pub fn project_delta(global_delta: Vec2, rotation_deg: f64) -> Vec2 {
    rotate_vector(global_delta, -rotation_deg)
}

/// Edges of a box in a node's local (unrotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl LocalBounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

/// Order each axis so that `left <= right` and `top <= bottom`.
///
/// A handle dragged past the opposite edge therefore flips the box instead
/// of producing a negative extent.
pub fn normalize_bounds(left: f64, top: f64, right: f64, bottom: f64) -> LocalBounds {
    LocalBounds {
        left: left.min(right),
        top: top.min(bottom),
        right: left.max(right),
        bottom: top.max(bottom),
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angle of the vector `from -> to`, in degrees.
pub fn angle_deg(from: Point, to: Point) -> f64 {
    (to - from).atan2().to_degrees()
}

/// Difference between two angles wrapped into `(-180, 180]`.
pub fn angle_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = normalize_degrees(a_deg - b_deg);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Axis-aligned bounding box of a set of points, or `None` when empty.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect::from_points(*first, *first);
    Some(points.iter().skip(1).fold(init, |acc, p| acc.union_pt(*p)))
}

/// Distance from a point to the segment `a -> b`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}
