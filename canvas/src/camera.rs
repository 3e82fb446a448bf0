#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{HOME_PAN_X, HOME_PAN_Y, MAX_SCALE, MIN_SCALE, ZOOM_SENSITIVITY};
use crate::geom::{Point, Rect};

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are the screen-space position of the world origin, in
/// pixels. `zoom` is a scale factor (1.0 = no zoom) kept within
/// [`MIN_SCALE`]..=[`MAX_SCALE`] by every mutating method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// The view a board opens with.
    #[must_use]
    pub fn home() -> Self {
        Self { pan_x: HOME_PAN_X, pan_y: HOME_PAN_Y, zoom: 1.0 }
    }

    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Map a world rectangle onto the screen.
    #[must_use]
    pub fn world_rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.world_to_screen(rect.origin());
        Rect::new(origin.x, origin.y, rect.width * self.zoom, rect.height * self.zoom)
    }

    /// Zoom by `delta` (positive zooms in), pivoting on `screen`.
    ///
    /// The world point under `screen` stays under `screen` afterwards.
    pub fn zoom_at(&mut self, screen: Point, delta: f64) {
        let pivot = self.screen_to_world(screen);
        let zoom = (self.zoom * (1.0 + delta * ZOOM_SENSITIVITY)).clamp(MIN_SCALE, MAX_SCALE);
        self.zoom = zoom;
        self.pan_x = screen.x - pivot.x * zoom;
        self.pan_y = screen.y - pivot.y * zoom;
    }

    /// Translate the view by a screen-space delta. Zoom is unchanged.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Pan so that `world` lands on `screen_center`.
    pub fn center_on(&mut self, world: Point, screen_center: Point) {
        self.pan_x = screen_center.x - world.x * self.zoom;
        self.pan_y = screen_center.y - world.y * self.zoom;
    }

    /// World-space rectangle covered by a viewport of the given pixel size.
    #[must_use]
    pub fn visible_world_rect(&self, viewport_width: f64, viewport_height: f64) -> Rect {
        let origin = self.screen_to_world(Point::new(0.0, 0.0));
        Rect::new(origin.x, origin.y, viewport_width / self.zoom, viewport_height / self.zoom)
    }
}
