//! Minimap projection: a fit-to-box view of every note plus the visible area.
//!
//! The projection is derived from scratch each frame from the notes, the
//! camera, and the viewport size; nothing here is persisted. Forward mapping
//! draws notes and the viewport indicator, inverse mapping turns a click on
//! the minimap back into the world point to recentre on.

#[cfg(test)]
#[path = "minimap_test.rs"]
mod minimap_test;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::consts::{MINIMAP_HEIGHT, MINIMAP_PADDING, MINIMAP_WIDTH};
use crate::doc::Note;
use crate::geom::{Point, Rect};

/// Uniform world-to-minimap transform for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Minimap {
    /// Padded world bounds shown in the minimap.
    pub bounds: Rect,
    /// World area currently visible in the main viewport.
    pub visible: Rect,
    /// Minimap pixels per world unit.
    pub scale: f64,
    /// Centering offset of the scaled content inside the box, in pixels.
    pub offset: Point,
    /// Minimap box size in pixels.
    pub width: f64,
    pub height: f64,
}

impl Minimap {
    /// Fit the notes and the visible area into the default minimap box.
    #[must_use]
    pub fn compute<'a>(
        notes: impl IntoIterator<Item = &'a Note>,
        camera: &Camera,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        Self::compute_in_box(notes, camera, viewport_width, viewport_height, MINIMAP_WIDTH, MINIMAP_HEIGHT)
    }

    /// Fit the notes and the visible area into a `box_width`×`box_height` box.
    #[must_use]
    pub fn compute_in_box<'a>(
        notes: impl IntoIterator<Item = &'a Note>,
        camera: &Camera,
        viewport_width: f64,
        viewport_height: f64,
        box_width: f64,
        box_height: f64,
    ) -> Self {
        let visible = camera.visible_world_rect(viewport_width, viewport_height);
        let bounds = notes
            .into_iter()
            .fold(visible, |acc, note| acc.union(&note.rect()))
            .inflate(MINIMAP_PADDING);

        let scale = (box_width / bounds.width).min(box_height / bounds.height);
        let offset = Point::new(
            (box_width - bounds.width * scale) * 0.5,
            (box_height - bounds.height * scale) * 0.5,
        );

        Self { bounds, visible, scale, offset, width: box_width, height: box_height }
    }

    /// World point to minimap pixel.
    #[must_use]
    pub fn project(&self, world: Point) -> Point {
        Point::new(
            (world.x - self.bounds.x) * self.scale + self.offset.x,
            (world.y - self.bounds.y) * self.scale + self.offset.y,
        )
    }

    /// Minimap pixel to world point.
    #[must_use]
    pub fn unproject(&self, pixel: Point) -> Point {
        Point::new(
            (pixel.x - self.offset.x) / self.scale + self.bounds.x,
            (pixel.y - self.offset.y) / self.scale + self.bounds.y,
        )
    }

    /// World rectangle to minimap pixels.
    #[must_use]
    pub fn project_rect(&self, rect: &Rect) -> Rect {
        let origin = self.project(rect.origin());
        Rect::new(origin.x, origin.y, rect.width * self.scale, rect.height * self.scale)
    }

    /// The viewport indicator, in minimap pixels.
    #[must_use]
    pub fn viewport_indicator(&self) -> Rect {
        self.project_rect(&self.visible)
    }
}
