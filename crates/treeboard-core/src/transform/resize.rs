//! Box resize with rotation support.

use crate::geometry::{normalize_bounds, project_delta, rotate_vector};
use crate::handles::{ResizeHandle, Side};
use crate::node::{Geometry, Node};
use kurbo::{Point, Size, Vec2};

/// Options for a box resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    /// Smallest allowed width and height.
    pub min_size: Size,
    /// Keep the original aspect ratio (corner handles only).
    pub keep_aspect_ratio: bool,
}

impl ResizeOptions {
    pub fn new(min_size: Size) -> Self {
        Self {
            min_size,
            keep_aspect_ratio: false,
        }
    }
}

/// Resize `node` by dragging `handle` by `delta` (canvas space).
///
/// The math runs in the node's local frame, so a rotated node grows along
/// its own axes. The edge or corner opposite the handle stays fixed in canvas
/// space, and dragging past it flips the box. Rotation is left unchanged.
pub fn resize_box(node: &Node, handle: ResizeHandle, delta: Vec2, options: ResizeOptions) -> Geometry {
    let (width, height) = (node.size.width, node.size.height);
    let local = project_delta(delta, node.rotation);

    let (mut left, mut top, mut right, mut bottom) = (0.0, 0.0, width, height);
    match handle.horizontal() {
        Some(Side::Start) => left = clamp_span(right, left + local.x, options.min_size.width, -1.0),
        Some(Side::End) => right = clamp_span(left, right + local.x, options.min_size.width, 1.0),
        None => {}
    }
    match handle.vertical() {
        Some(Side::Start) => top = clamp_span(bottom, top + local.y, options.min_size.height, -1.0),
        Some(Side::End) => bottom = clamp_span(top, bottom + local.y, options.min_size.height, 1.0),
        None => {}
    }

    if options.keep_aspect_ratio && handle.is_corner() && width > 0.0 && height > 0.0 {
        let span_x = right - left;
        let span_y = bottom - top;
        let scale = (span_x.abs() / width).max(span_y.abs() / height);
        let new_x = span_x.signum() * width * scale;
        let new_y = span_y.signum() * height * scale;
        match handle.horizontal() {
            Some(Side::Start) => left = right - new_x,
            _ => right = left + new_x,
        }
        match handle.vertical() {
            Some(Side::Start) => top = bottom - new_y,
            _ => bottom = top + new_y,
        }
    }

    let bounds = normalize_bounds(left, top, right, bottom);
    // Untouched axes may still be below the minimum (e.g. a loaded document)
    let size = Size::new(
        bounds.width().max(options.min_size.width),
        bounds.height().max(options.min_size.height),
    );

    let old_center = Point::new(width / 2.0, height / 2.0);
    let new_local_center = Point::new(bounds.left + size.width / 2.0, bounds.top + size.height / 2.0);
    let center = node.center() + rotate_vector(new_local_center - old_center, node.rotation);

    Geometry {
        position: center - Vec2::new(size.width / 2.0, size.height / 2.0),
        size,
        rotation: node.rotation,
    }
}

/// Keep `moved` at least `min` away from `fixed`, preserving which side of
/// `fixed` it is on. `orientation` decides the side when they coincide.
fn clamp_span(fixed: f64, moved: f64, min: f64, orientation: f64) -> f64 {
    let span = moved - fixed;
    if span.abs() >= min {
        return moved;
    }
    let sign = if span == 0.0 { orientation } else { span.signum() };
    fixed + sign * min
}

/// Rescale stroke points (relative to the box origin) from one box size to
/// another.
pub fn scale_points(points: &[Point], from: Size, to: Size) -> Vec<Point> {
    let sx = if from.width > 0.0 { to.width / from.width } else { 1.0 };
    let sy = if from.height > 0.0 { to.height / from.height } else { 1.0 };
    points.iter().map(|p| Point::new(p.x * sx, p.y * sy)).collect()
}
