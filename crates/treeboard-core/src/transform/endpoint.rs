//! Endpoint resize for line-like nodes.

use crate::geometry::{EPSILON, normalize_degrees, rotate_vector};
use crate::handles::LineEnd;
use crate::node::{Geometry, Node};
use kurbo::{Point, Size, Vec2};

/// Move one endpoint of a line to `pointer`, keeping the other one fixed.
///
/// The line's length becomes the distance between the endpoints (at least
/// `min_length`) and its rotation the direction from start to end.
pub fn resize_line(node: &Node, end: LineEnd, pointer: Point, min_length: f64) -> Geometry {
    let (start, finish) = node.line_endpoints();
    let (fixed, direction) = match end {
        LineEnd::End => (start, pointer - start),
        LineEnd::Start => (finish, finish - pointer),
    };

    let rotation = if direction.hypot() < EPSILON {
        node.rotation
    } else {
        normalize_degrees(direction.atan2().to_degrees())
    };
    let length = direction.hypot().max(min_length);

    // Direction from start to end at the new rotation
    let unit = rotate_vector(Vec2::new(1.0, 0.0), rotation);
    let center = match end {
        LineEnd::End => fixed + unit * (length / 2.0),
        LineEnd::Start => fixed - unit * (length / 2.0),
    };
    place_line(center, length, node.size.height, rotation)
}

/// Geometry of a line running from `start` to `end`.
pub fn line_between(start: Point, end: Point, thickness: f64, min_length: f64) -> Geometry {
    let direction = end - start;
    let rotation = if direction.hypot() < EPSILON {
        0.0
    } else {
        normalize_degrees(direction.atan2().to_degrees())
    };
    let length = direction.hypot().max(min_length);
    let unit = rotate_vector(Vec2::new(1.0, 0.0), rotation);
    place_line(start + unit * (length / 2.0), length, thickness, rotation)
}

fn place_line(center: Point, length: f64, thickness: f64, rotation: f64) -> Geometry {
    Geometry {
        position: center - Vec2::new(length / 2.0, thickness / 2.0),
        size: Size::new(length, thickness),
        rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, StrokeColor};

    fn line_from(start: Point, end: Point) -> Node {
        let g = line_between(start, end, 20.0, 1.0);
        let mut node = Node::new(
            NodeKind::Line { arrow: false, stroke: StrokeColor::white() },
            g.position,
            g.size,
        );
        node.rotation = g.rotation;
        node
    }

    fn apply(node: &Node, g: Geometry) -> Node {
        let mut out = node.clone();
        out.position = g.position;
        out.size = g.size;
        out.rotation = g.rotation;
        out
    }

    fn assert_point(actual: Point, expected: Point) {
        assert!(
            (actual - expected).hypot() < 1e-6,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_line_between() {
        let g = line_between(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0, 1.0);
        assert_point(g.position, Point::new(0.0, -10.0));
        assert!((g.size.width - 100.0).abs() < 1e-9);
        assert!(g.rotation.abs() < 1e-9);
    }

    #[test]
    fn test_drag_end_diagonal() {
        let node = line_from(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let g = resize_line(&node, LineEnd::End, Point::new(100.0, 100.0), 1.0);
        assert!((g.size.width - 141.421356).abs() < 1e-4);
        assert!((g.rotation - 45.0).abs() < 1e-9);
        let (start, end) = apply(&node, g).line_endpoints();
        assert_point(start, Point::new(0.0, 0.0));
        assert_point(end, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_start_keeps_end() {
        let node = line_from(Point::new(10.0, 10.0), Point::new(60.0, 40.0));
        for pointer in [
            Point::new(-30.0, 5.0),
            Point::new(200.0, 200.0),
            Point::new(60.0, -80.0),
        ] {
            let g = resize_line(&node, LineEnd::Start, pointer, 1.0);
            let (start, end) = apply(&node, g).line_endpoints();
            assert_point(end, Point::new(60.0, 40.0));
            assert_point(start, pointer);
        }
    }

    #[test]
    fn test_drag_end_past_start_reverses() {
        let node = line_from(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let g = resize_line(&node, LineEnd::End, Point::new(-50.0, 0.0), 1.0);
        assert!((g.rotation - 180.0).abs() < 1e-9);
        let (start, _) = apply(&node, g).line_endpoints();
        assert_point(start, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_zero_length_keeps_direction() {
        let node = line_from(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        let g = resize_line(&node, LineEnd::End, Point::new(0.0, 0.0), 5.0);
        assert!((g.rotation - 90.0).abs() < 1e-9);
        assert!((g.size.width - 5.0).abs() < 1e-9);
        let (start, end) = apply(&node, g).line_endpoints();
        assert_point(start, Point::new(0.0, 0.0));
        assert_point(end, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_thickness_unchanged() {
        let node = line_from(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let g = resize_line(&node, LineEnd::End, Point::new(30.0, -70.0), 1.0);
        assert!((g.size.height - 20.0).abs() < 1e-9);
    }
}
