//! Input scripts: JSON-lines event streams replayed against a session.
//!
//! Each non-blank line is one [`InputEvent`], tagged by `"event"`. Lines
//! starting with `#` are comments. Pointer events may omit `target`, in
//! which case the engine hit-tests the point itself.
//!
//! ```text
//! {"event":"pointer_down","x":320,"y":40}
//! {"event":"pointer_move","x":420,"y":90}
//! {"event":"pointer_up","x":420,"y":90}
//! {"event":"wheel","x":640,"y":400,"dy":-120,"modifiers":{"ctrl":true}}
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::path::Path;
use std::time::Duration;

use canvas::doc::{BoardId, Note, NoteColor, NoteId};
use canvas::geom::Point;
use canvas::hit::Target;
use canvas::input::{Button, Key, Modifiers, WheelDelta};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::session::BoardSession;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),
    #[error("failed to encode scene: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        target: Option<Target>,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        target: Option<Target>,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    TextFocus {
        focused: bool,
    },
    SetText {
        id: NoteId,
        text: String,
    },
    AddNote {
        #[serde(default)]
        color: NoteColor,
    },
    DeleteNote {
        id: NoteId,
    },
    DeleteSelected,
    ClearAll,
    AutoArrange,
    MinimapDown {
        x: f64,
        y: f64,
    },
    MinimapMove {
        x: f64,
        y: f64,
    },
    MinimapUp,
    Viewport {
        width: f64,
        height: f64,
    },
    SwitchBoard {
        board_id: BoardId,
    },
    /// Let time pass, e.g. for debounced writes to fire.
    Wait {
        ms: u64,
    },
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] with the 1-based `line` on malformed JSON.
pub fn parse_line(line: usize, text: &str) -> Result<Option<InputEvent>, ScriptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some).map_err(|source| ScriptError::Parse { line, source })
}

/// Feed one event to the session and execute the resulting actions.
///
/// # Errors
///
/// Only board switches can fail, when the collaborator cannot list notes.
pub async fn apply(session: &mut BoardSession, event: InputEvent) -> Result<(), ScriptError> {
    let engine = session.engine_mut();
    let actions = match event {
        InputEvent::PointerDown { x, y, button, modifiers, target } => {
            let pt = Point::new(x, y);
            let target = target.unwrap_or_else(|| engine.hit_test(pt));
            engine.on_pointer_down(pt, button, modifiers, target)
        }
        InputEvent::PointerMove { x, y, modifiers } => engine.on_pointer_move(Point::new(x, y), modifiers),
        InputEvent::PointerUp { x, y, modifiers } => engine.on_pointer_up(Point::new(x, y), modifiers),
        InputEvent::DoubleClick { x, y, target } => {
            let pt = Point::new(x, y);
            let target = target.unwrap_or_else(|| engine.hit_test(pt));
            engine.on_double_click(pt, target)
        }
        InputEvent::Wheel { x, y, dx, dy, modifiers } => {
            engine.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers)
        }
        InputEvent::KeyDown { key, modifiers } => engine.on_key_down(&Key(key), modifiers),
        InputEvent::KeyUp { key, modifiers } => engine.on_key_up(&Key(key), modifiers),
        InputEvent::TextFocus { focused } => {
            engine.set_text_focus(focused);
            Vec::new()
        }
        InputEvent::SetText { id, text } => engine.set_text(&id, text),
        InputEvent::AddNote { color } => {
            session.add_note(color).await;
            return Ok(());
        }
        InputEvent::DeleteNote { id } => engine.delete_note(&id),
        InputEvent::DeleteSelected => engine.delete_selected(),
        InputEvent::ClearAll => engine.clear_all(),
        InputEvent::AutoArrange => engine.auto_arrange(),
        InputEvent::MinimapDown { x, y } => engine.on_minimap_down(Point::new(x, y)),
        InputEvent::MinimapMove { x, y } => engine.on_minimap_move(Point::new(x, y)),
        InputEvent::MinimapUp => engine.on_minimap_up(),
        InputEvent::Viewport { width, height } => {
            engine.set_viewport(width, height);
            Vec::new()
        }
        InputEvent::SwitchBoard { board_id } => {
            session.open_board(board_id).await?;
            return Ok(());
        }
        InputEvent::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            return Ok(());
        }
    };
    session.dispatch(actions).await;
    Ok(())
}

/// Replay every event from `reader`. Returns the number of events applied.
///
/// # Errors
///
/// Stops at the first unreadable or malformed line, or failed board switch.
pub async fn replay<R>(session: &mut BoardSession, reader: R) -> Result<usize, ScriptError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    let mut applied = 0;

    while let Some(text) = lines.next_line().await? {
        line_no += 1;
        let Some(event) = parse_line(line_no, &text)? else {
            continue;
        };
        debug!(line = line_no, ?event, "replaying event");
        apply(session, event).await?;
        applied += 1;
    }

    info!(events = applied, lines = line_no, "script replayed");
    Ok(applied)
}

/// Read a JSON array of notes.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] if the file cannot be read and
/// [`ScriptError::Snapshot`] if it is not a note array.
pub async fn load_snapshot(path: &Path) -> Result<Vec<Note>, ScriptError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let notes: Vec<Note> = serde_json::from_str(&raw).map_err(ScriptError::Snapshot)?;
    info!(path = %path.display(), count = notes.len(), "snapshot loaded");
    Ok(notes)
}
