//! Screen/canvas mapping for the board view.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom range reachable through [`Camera::zoom_at`].
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Pan and zoom of the visible canvas area, as `screen = canvas * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl ViewportTransform {
    /// Project a canvas point into screen space.
    pub fn apply(&self, canvas_point: Point) -> Point {
        Point::new(canvas_point.x * self.zoom + self.x, canvas_point.y * self.zoom + self.y)
    }
}

/// Mapping between screen and canvas coordinates.
pub trait Viewport {
    fn screen_to_canvas(&self, screen_point: Point) -> Point;
    fn viewport_transform(&self) -> ViewportTransform;
}

/// Board view: a screen-space offset plus a uniform zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the canvas origin.
    pub offset: Vec2,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, zoom: 1.0 }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.viewport_transform().apply(canvas_point)
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply the zoom by `factor` around a screen point, which keeps the
    /// same canvas point under it. The result is clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return;
        }
        let anchor = self.screen_to_canvas(screen_point);
        self.zoom = zoom;
        self.offset = screen_point.to_vec2() - anchor.to_vec2() * zoom;
    }
}

impl Viewport for Camera {
    fn screen_to_canvas(&self, screen_point: Point) -> Point {
        ((screen_point.to_vec2() - self.offset) / self.zoom).to_point()
    }

    fn viewport_transform(&self) -> ViewportTransform {
        ViewportTransform {
            x: self.offset.x,
            y: self.offset.y,
            zoom: self.zoom,
        }
    }
}
