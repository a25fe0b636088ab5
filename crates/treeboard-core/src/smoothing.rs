//! Freehand stroke smoothing.

use kurbo::{BezPath, PathEl, Point};
use std::fmt::Write;

/// Build a smooth path through captured stroke points.
///
/// Each interior point becomes the control point of a quadratic segment that
/// ends halfway to the next point; the path closes with a straight segment
/// into the last point. A single point yields a zero-length segment so that
/// a click still renders as a dot.
pub fn smooth(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return path,
    };

    path.move_to(first);
    if points.len() > 2 {
        for pair in points[1..].windows(2) {
            path.quad_to(pair[0], pair[0].midpoint(pair[1]));
        }
    }
    path.line_to(last);
    path
}

/// Render a path as SVG path data (`M x y Q cx cy x y L x y`).
pub fn path_data(path: &BezPath) -> String {
    let mut out = String::new();
    for el in path.elements() {
        if !out.is_empty() {
            out.push(' ');
        }
        // Writing into a String cannot fail
        let _ = match *el {
            PathEl::MoveTo(p) => write!(out, "M {} {}", p.x, p.y),
            PathEl::LineTo(p) => write!(out, "L {} {}", p.x, p.y),
            PathEl::QuadTo(c, p) => write!(out, "Q {} {} {} {}", c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => write!(
                out,
                "C {} {} {} {} {} {}",
                c1.x, c1.y, c2.x, c2.y, p.x, p.y
            ),
            PathEl::ClosePath => write!(out, "Z"),
        };
    }
    out
}
