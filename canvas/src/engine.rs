//! Engine core: routes input events through the gesture state machine.
//!
//! DESIGN
//! ======
//! Every handler is a transition over `(GestureState, UiState, DocStore,
//! Camera)`. Pointer-down classifies the press once, by priority
//! Resize > Drag > Pan > Select, and only ever starts a gesture from `Idle`.
//! Moves mutate the in-memory notes or the camera immediately; releases
//! return to `Idle` and emit the [`Action`]s the host must persist. Wheel
//! input, keys, and minimap navigation bypass the gesture machine entirely.
//!
//! Nothing here fails. Events that reference vanished notes are ignored, and
//! a gesture whose target vanished is dropped back to `Idle`.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrange;
use crate::camera::Camera;
use crate::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH};
use crate::doc::{BoardId, DocStore, Note, NoteColor, NoteId};
use crate::geom::{Point, Rect};
use crate::hit::{self, Target};
use crate::input::{Button, GestureState, Key, Modifiers, UiState, WheelDelta};
use crate::minimap::Minimap;
use crate::render::{self, Scene};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Persist a note's position and draw order.
    PositionChanged { id: NoteId, x: f64, y: f64, z_index: i64 },
    /// Persist a note's position and size.
    GeometryChanged { id: NoteId, x: f64, y: f64, width: f64, height: f64 },
    /// Persist a note's text. Hosts should coalesce these per note.
    ContentChanged { id: NoteId, text: String },
    /// Ask the collaborator to create a note at a world position.
    CreateRequested { x: f64, y: f64, color: NoteColor },
    /// A note was removed from the working set.
    NoteDeleted { id: NoteId },
    /// Every note on the board was removed from the working set.
    BoardCleared { board_id: BoardId },
    /// Visible state changed.
    RenderNeeded,
}

/// Core engine state: everything except the host surface.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
    pub gesture: GestureState,
    pub board_id: Option<BoardId>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the working set with a freshly loaded board.
    ///
    /// The view, selection, and any in-flight gesture are reset.
    pub fn load_board(&mut self, board_id: BoardId, notes: Vec<Note>) {
        self.doc.load_snapshot(notes);
        self.board_id = Some(board_id);
        self.camera = Camera::home();
        self.ui.selected.clear();
        self.ui.minimap_navigating = false;
        self.gesture = GestureState::Idle;
    }

    /// Insert a note the collaborator just created.
    pub fn apply_create(&mut self, note: Note) -> Vec<Action> {
        self.doc.insert(note);
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
    }

    /// Record whether a text-input surface has keyboard focus.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.ui.text_focus = focused;
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> &HashSet<NoteId> {
        &self.ui.selected
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.doc.get(id)
    }

    /// Classify a screen point against the current document.
    #[must_use]
    pub fn hit_test(&self, screen_pt: Point) -> Target {
        hit::hit_test(screen_pt, &self.doc, &self.camera)
    }

    /// Screen-space center of the viewport.
    #[must_use]
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    /// Minimap projection for the current frame.
    #[must_use]
    pub fn minimap(&self) -> Minimap {
        Minimap::compute(self.doc.iter(), &self.camera, self.viewport_width, self.viewport_height)
    }

    /// Everything the surface needs to draw the current frame.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::scene(self)
    }

    // --- Pointer ---

    /// Start a gesture. Ignored unless the engine is idle.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers, target: Target) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }

        match target {
            Target::ResizeHandle(id) => self.begin_resize(id, screen_pt),
            Target::Body(id) => self.begin_drag(id, screen_pt, modifiers),
            Target::Canvas if self.ui.pan_key_held || button != Button::Primary => {
                self.gesture = GestureState::Panning { last_screen: screen_pt };
                Vec::new()
            }
            Target::Canvas => self.begin_select(screen_pt, modifiers),
        }
    }

    /// Advance the active gesture.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !self.target_alive() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);

        match &mut self.gesture {
            GestureState::Idle => return Vec::new(),
            GestureState::Panning { last_screen } => {
                let delta = screen_pt - *last_screen;
                *last_screen = screen_pt;
                self.camera.pan_by(delta.x, delta.y);
            }
            GestureState::Dragging { anchor, grab } => {
                let target = world - *grab;
                drag_selection(&mut self.doc, &self.ui.selected, anchor, target);
            }
            GestureState::Resizing { id, start_world, start_width, start_height } => {
                let width = (*start_width + (world.x - start_world.x)).max(MIN_NOTE_WIDTH);
                let height = (*start_height + (world.y - start_world.y)).max(MIN_NOTE_HEIGHT);
                if let Some(note) = self.doc.get_mut(id) {
                    note.width = width;
                    note.height = height;
                }
            }
            GestureState::Selecting { origin_world, band, base } => {
                *band = Rect::from_corners(*origin_world, world);
                base.retain(|id| self.doc.contains(id));
                let hits = self.doc.iter().filter(|n| band.touches(&n.rect())).map(|n| n.id);
                self.ui.selected = base.iter().copied().chain(hits).collect();
            }
        }

        vec![Action::RenderNeeded]
    }

    /// Finish the active gesture and report what needs persisting.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let mut actions = Vec::new();

        match gesture {
            GestureState::Idle => return actions,
            GestureState::Dragging { .. } => {
                let mut ids: Vec<NoteId> = self.ui.selected.iter().copied().collect();
                ids.sort_unstable();
                actions.extend(ids.iter().filter_map(|id| self.doc.get(id)).map(position_action));
            }
            GestureState::Resizing { id, .. } => {
                if let Some(note) = self.doc.get(&id) {
                    actions.push(Action::GeometryChanged {
                        id,
                        x: note.x,
                        y: note.y,
                        width: note.width,
                        height: note.height,
                    });
                }
            }
            GestureState::Panning { .. } | GestureState::Selecting { .. } => {}
        }

        actions.push(Action::RenderNeeded);
        actions
    }

    /// Create a note where the user double-clicked empty canvas.
    pub fn on_double_click(&mut self, screen_pt: Point, target: Target) -> Vec<Action> {
        if target != Target::Canvas || !self.gesture.is_idle() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        vec![spawn_request(world, NoteColor::default())]
    }

    // --- Wheel / keys ---

    /// Zoom about the pointer with the zoom modifier held, otherwise scroll the view.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zooms() {
            self.camera.zoom_at(screen_pt, -delta.dy);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_pan() {
            self.ui.pan_key_held = true;
            return Vec::new();
        }
        if key.is_delete() && !self.ui.text_focus && !self.ui.selected.is_empty() {
            return self.delete_selected();
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_pan() {
            self.ui.pan_key_held = false;
        }
        Vec::new()
    }

    // --- Minimap ---

    /// Press on the minimap: recentre on the clicked point and keep following.
    pub fn on_minimap_down(&mut self, minimap_pt: Point) -> Vec<Action> {
        self.ui.minimap_navigating = true;
        self.navigate_minimap(minimap_pt)
    }

    pub fn on_minimap_move(&mut self, minimap_pt: Point) -> Vec<Action> {
        if !self.ui.minimap_navigating {
            return Vec::new();
        }
        self.navigate_minimap(minimap_pt)
    }

    pub fn on_minimap_up(&mut self) -> Vec<Action> {
        self.ui.minimap_navigating = false;
        Vec::new()
    }

    /// Recentre the view on the world point under `minimap_pt`.
    pub fn navigate_minimap(&mut self, minimap_pt: Point) -> Vec<Action> {
        let world = self.minimap().unproject(minimap_pt);
        self.camera.center_on(world, self.viewport_center());
        vec![Action::RenderNeeded]
    }

    // --- Board actions ---

    /// Request a new note near the viewport center, offset by `jitter`.
    #[must_use]
    pub fn add_note(&self, color: NoteColor, jitter: Point) -> Action {
        let center = self.camera.screen_to_world(self.viewport_center());
        spawn_request(center + jitter, color)
    }

    /// Replace a note's text in memory and ask for it to be persisted.
    pub fn set_text(&mut self, id: &NoteId, text: String) -> Vec<Action> {
        let Some(note) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        note.content.clone_from(&text);
        vec![Action::ContentChanged { id: *id, text }, Action::RenderNeeded]
    }

    /// Remove every selected note.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let mut ids: Vec<NoteId> = self.ui.selected.drain().collect();
        ids.sort_unstable();
        let mut actions: Vec<Action> = ids
            .into_iter()
            .filter(|id| self.doc.remove(id).is_some())
            .map(|id| Action::NoteDeleted { id })
            .collect();
        self.forget_deleted();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove a single note (e.g. from its own delete button).
    pub fn delete_note(&mut self, id: &NoteId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        self.ui.selected.remove(id);
        self.forget_deleted();
        vec![Action::NoteDeleted { id: *id }, Action::RenderNeeded]
    }

    /// Remove every note on the open board.
    pub fn clear_all(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected.clear();
        self.gesture = GestureState::Idle;
        let mut actions = Vec::new();
        if let Some(board_id) = self.board_id {
            actions.push(Action::BoardCleared { board_id });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pack every note without overlap and report the new positions.
    pub fn auto_arrange(&mut self) -> Vec<Action> {
        let notes: Vec<Note> = self.doc.sorted_notes().into_iter().cloned().collect();
        let arranged = arrange::auto_arrange(&notes);
        let mut actions: Vec<Action> = arranged.iter().map(position_action).collect();
        for note in arranged {
            self.doc.insert(note);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Gesture entry ---

    fn begin_resize(&mut self, id: NoteId, screen_pt: Point) -> Vec<Action> {
        let Some(note) = self.doc.get(&id) else {
            return Vec::new();
        };
        self.gesture = GestureState::Resizing {
            id,
            start_world: self.camera.screen_to_world(screen_pt),
            start_width: note.width,
            start_height: note.height,
        };
        Vec::new()
    }

    fn begin_drag(&mut self, id: NoteId, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.doc.contains(&id) {
            return Vec::new();
        }

        if modifiers.toggles_selection() {
            if !self.ui.selected.remove(&id) {
                self.ui.selected.insert(id);
            }
        } else if !self.ui.selected.contains(&id) {
            self.ui.selected.clear();
            self.ui.selected.insert(id);
        }

        let top = self.doc.max_z_index() + 1;
        let world = self.camera.screen_to_world(screen_pt);
        let Some(note) = self.doc.get_mut(&id) else {
            return Vec::new();
        };
        note.z_index = top;

        // Shift-clicking a selected note only deselects it; nothing to drag.
        if !self.ui.selected.contains(&id) {
            return vec![position_action(note), Action::RenderNeeded];
        }

        self.gesture = GestureState::Dragging { anchor: id, grab: world - note.position() };
        vec![Action::RenderNeeded]
    }

    fn begin_select(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let base = if modifiers.toggles_selection() {
            self.ui.selected.clone()
        } else {
            self.ui.selected.clear();
            HashSet::new()
        };
        let origin_world = self.camera.screen_to_world(screen_pt);
        self.gesture = GestureState::Selecting {
            origin_world,
            band: Rect::new(origin_world.x, origin_world.y, 0.0, 0.0),
            base,
        };
        vec![Action::RenderNeeded]
    }

    // --- Helpers ---

    /// Drop references to notes that left the working set from the active gesture.
    fn forget_deleted(&mut self) {
        if let GestureState::Selecting { base, .. } = &mut self.gesture {
            base.retain(|id| self.doc.contains(id));
        }
        self.target_alive();
    }

    /// Drop back to `Idle` if the active gesture's note is gone.
    fn target_alive(&mut self) -> bool {
        let Some(id) = self.gesture.target_note() else {
            return true;
        };
        if self.doc.contains(&id) {
            return true;
        }
        debug!(note_id = %id, "gesture target vanished; returning to idle");
        self.gesture = GestureState::Idle;
        false
    }
}

/// Move every selected note by the anchor's displacement to `target`.
fn drag_selection(doc: &mut DocStore, selected: &HashSet<NoteId>, anchor: &NoteId, target: Point) {
    let Some(current) = doc.get(anchor).map(Note::position) else {
        return;
    };
    let delta = target - current;
    for id in selected {
        if let Some(note) = doc.get_mut(id) {
            note.x += delta.x;
            note.y += delta.y;
        }
    }
}

fn position_action(note: &Note) -> Action {
    Action::PositionChanged { id: note.id, x: note.x, y: note.y, z_index: note.z_index }
}

/// Creation request that centres a default-sized note on `world`.
fn spawn_request(world: Point, color: NoteColor) -> Action {
    Action::CreateRequested {
        x: world.x - DEFAULT_NOTE_WIDTH * 0.5,
        y: world.y - DEFAULT_NOTE_HEIGHT * 0.5,
        color,
    }
}
