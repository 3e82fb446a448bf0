//! Rendering: a read-only snapshot of what the surface should draw.
//!
//! The engine never touches pixels. [`scene`] reads document, camera, and UI
//! state and produces a [`Scene`]: notes in paint order with both world and
//! screen rectangles, the rubber band, and the minimap overlay. Hosts draw
//! it however they like, and the replay tool prints it as JSON.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::doc::{Note, NoteColor, NoteId};
use crate::engine::EngineCore;
use crate::geom::Rect;
use crate::hit;
use crate::minimap::Minimap;

/// One note as it should be painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteView {
    pub id: NoteId,
    pub content: String,
    pub color: NoteColor,
    pub z_index: i64,
    pub world: Rect,
    pub screen: Rect,
    /// Resize handle in screen pixels.
    pub handle: Rect,
    pub selected: bool,
}

/// The rubber band, if one is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandView {
    pub world: Rect,
    pub screen: Rect,
}

/// Minimap overlay in minimap pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimapView {
    pub width: f64,
    pub height: f64,
    pub notes: Vec<(NoteId, Rect)>,
    pub viewport: Rect,
}

/// Full frame description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub camera: Camera,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Back to front.
    pub notes: Vec<NoteView>,
    pub band: Option<BandView>,
    pub minimap: MinimapView,
}

/// Build the scene for the engine's current state.
#[must_use]
pub fn scene(core: &EngineCore) -> Scene {
    let camera = core.camera;
    let ordered = core.doc.sorted_notes();

    let notes = ordered
        .iter()
        .map(|note| note_view(note, &camera, core.ui.selected.contains(&note.id)))
        .collect();

    let band = core.gesture.band().map(|world| BandView { world, screen: camera.world_rect_to_screen(&world) });

    let map = core.minimap();
    let minimap = minimap_view(&map, &ordered);

    Scene {
        camera,
        viewport_width: core.viewport_width,
        viewport_height: core.viewport_height,
        notes,
        band,
        minimap,
    }
}

fn note_view(note: &Note, camera: &Camera, selected: bool) -> NoteView {
    let world = note.rect();
    NoteView {
        id: note.id,
        content: note.content.clone(),
        color: note.color,
        z_index: note.z_index,
        world,
        screen: camera.world_rect_to_screen(&world),
        handle: hit::handle_rect(note, camera),
        selected,
    }
}

fn minimap_view(map: &Minimap, ordered: &[&Note]) -> MinimapView {
    MinimapView {
        width: map.width,
        height: map.height,
        notes: ordered.iter().map(|n| (n.id, map.project_rect(&n.rect()))).collect(),
        viewport: map.viewport_indicator(),
    }
}
