//! Pointer hit testing: what a press on the board landed on.
//!
//! Notes are scanned top-most first. The bottom-right resize handle is a
//! fixed-size square in screen pixels, so it stays grabbable at any zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::consts::RESIZE_HANDLE_PX;
use crate::doc::{DocStore, Note, NoteId};
use crate::geom::{Point, Rect};

/// What a pointer-down landed on.
///
/// Hosts with their own hit-testing (e.g. DOM elements per note) report this
/// directly; otherwise [`hit_test`] derives it from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Empty canvas background.
    Canvas,
    /// A note's body.
    Body(NoteId),
    /// A note's bottom-right resize handle.
    ResizeHandle(NoteId),
}

/// Screen-space rectangle of a note's resize handle.
#[must_use]
pub fn handle_rect(note: &Note, camera: &Camera) -> Rect {
    let screen = camera.world_rect_to_screen(&note.rect());
    Rect::new(
        screen.right() - RESIZE_HANDLE_PX,
        screen.bottom() - RESIZE_HANDLE_PX,
        RESIZE_HANDLE_PX,
        RESIZE_HANDLE_PX,
    )
}

/// Classify `screen_pt` against the document, top-most note first.
///
/// A note's handle wins over its own body; a higher note's body wins over a
/// lower note's handle.
#[must_use]
pub fn hit_test(screen_pt: Point, doc: &DocStore, camera: &Camera) -> Target {
    for note in doc.sorted_notes().into_iter().rev() {
        if handle_rect(note, camera).contains(screen_pt) {
            return Target::ResizeHandle(note.id);
        }
        if camera.world_rect_to_screen(&note.rect()).contains(screen_pt) {
            return Target::Body(note.id);
        }
    }
    Target::Canvas
}
