//! Document model: notes and the in-memory store.
//!
//! This module defines what lives on the board (`Note`, `NoteColor`) and the
//! runtime store that owns the working set of notes for the open board
//! (`DocStore`).
//!
//! Notes enter this layer from the persistence collaborator (a full board
//! load or a freshly created note) and are mutated in place by the input
//! engine. The renderer reads from `DocStore` via `sorted_notes` to determine
//! draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Point, Rect};

/// Unique identifier for a note.
pub type NoteId = Uuid;

/// Unique identifier for a board.
pub type BoardId = Uuid;

/// Color tag of a note. Opaque to the engine; carried for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Red,
    Purple,
    Gray,
}

/// A note as stored in the document and handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note.
    pub id: NoteId,
    /// The board this note belongs to.
    pub board_id: BoardId,
    /// Free-form text body. Never interpreted by the engine.
    pub content: String,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units, at least [`crate::consts::MIN_NOTE_WIDTH`].
    pub width: f64,
    /// Height in world units, at least [`crate::consts::MIN_NOTE_HEIGHT`].
    pub height: f64,
    pub color: NoteColor,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last update time, milliseconds since the Unix epoch.
    pub updated_at: i64,
}

impl Note {
    /// World-space bounding rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Top-left corner in world coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// In-memory working set of notes for the open board.
#[derive(Debug, Default)]
pub struct DocStore {
    notes: HashMap<NoteId, Note>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { notes: HashMap::new() }
    }

    /// Insert or replace a note. An existing note with the same `id` is overwritten.
    pub fn insert(&mut self, note: Note) {
        self.notes.insert(note.id, note);
    }

    /// Remove a note by id, returning it if it was present.
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        self.notes.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn get_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.contains_key(id)
    }

    /// Replace all notes with a full board load.
    pub fn load_snapshot(&mut self, notes: Vec<Note>) {
        self.notes.clear();
        for note in notes {
            self.notes.insert(note.id, note);
        }
    }

    /// Remove every note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Highest `z_index` in the store, or 0 when empty.
    #[must_use]
    pub fn max_z_index(&self) -> i64 {
        self.notes.values().map(|n| n.z_index).max().unwrap_or(0)
    }

    /// Iterate notes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// Return all notes sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn sorted_notes(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        notes
    }

    /// Number of notes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns `true` if the store contains no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
