//! Input model: modifier keys, buttons, keys, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Modifiers`,
//! `Button`, and `Key` capture what the user held and pressed at the time of
//! an event. `GestureState` is the active gesture tracked between pointer-down
//! and pointer-up, carrying the context needed to compute incremental updates
//! and emit final persistence actions on release. Exactly one variant is live
//! at a time; `Idle` is the only state a new gesture may start from.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::doc::NoteId;
use crate::geom::{Point, Rect};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held. Toggles selection membership.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the selection modifier is held.
    #[must_use]
    pub fn toggles_selection(self) -> bool {
        self.shift
    }

    /// Whether wheel input should zoom instead of pan.
    #[must_use]
    pub fn zooms(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    /// Delete and Backspace both remove the selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    /// Holding Space turns primary-button drags into pans.
    #[must_use]
    pub fn is_pan(&self) -> bool {
        matches!(self.0.as_str(), " " | "Space" | "Spacebar")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Ids of the currently selected notes.
    pub selected: HashSet<NoteId>,
    /// The pan key (Space) is held down.
    pub pan_key_held: bool,
    /// A text-input surface owns keyboard focus; delete keys go to it.
    pub text_focus: bool,
    /// A pointer is pressed on the minimap.
    pub minimap_navigating: bool,
}

/// The active pointer gesture.
///
/// Each active variant carries the context needed to compute updates on move
/// and emit final actions on release.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The view is following the pointer.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// The selection is being moved, anchored on the pressed note.
    Dragging {
        /// The note that was pressed; its position drives the group delta.
        anchor: NoteId,
        /// Pointer world position minus the anchor's top-left at press time.
        grab: Point,
    },
    /// A single note is being resized from its bottom-right handle.
    Resizing {
        id: NoteId,
        /// World-space pointer position at the start of the resize.
        start_world: Point,
        start_width: f64,
        start_height: f64,
    },
    /// A rubber-band box is being dragged out over the canvas.
    Selecting {
        /// World-space point where the press happened.
        origin_world: Point,
        /// Current normalized box in world coordinates.
        band: Rect,
        /// Selection kept underneath the band (non-empty only when the
        /// selection modifier was held at press time).
        base: HashSet<NoteId>,
    },
}

impl GestureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The note this gesture manipulates, if any.
    #[must_use]
    pub fn target_note(&self) -> Option<NoteId> {
        match self {
            Self::Dragging { anchor, .. } => Some(*anchor),
            Self::Resizing { id, .. } => Some(*id),
            Self::Idle | Self::Panning { .. } | Self::Selecting { .. } => None,
        }
    }

    /// The live rubber-band box, if selecting.
    #[must_use]
    pub fn band(&self) -> Option<Rect> {
        match self {
            Self::Selecting { band, .. } => Some(*band),
            _ => None,
        }
    }
}
