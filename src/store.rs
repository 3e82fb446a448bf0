//! Note persistence collaborator.
//!
//! DESIGN
//! ======
//! [`NoteStore`] is the async boundary the session writes through. The engine
//! never waits on it: every write is fire-and-forget from the engine's point
//! of view, and failures are logged by the caller, never rolled back.
//! [`MemoryStore`] is the in-process implementation used by the replay
//! binary and by tests.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use canvas::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH};
use canvas::doc::{BoardId, Note, NoteColor, NoteId};
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Async persistence for notes. Enables mocking in tests.
#[async_trait::async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes on a board, in no particular order.
    async fn list_notes(&self, board_id: BoardId) -> Result<Vec<Note>, StoreError>;

    /// Create a default-sized note on top of everything else on the board.
    async fn create_note(&self, board_id: BoardId, x: f64, y: f64, color: NoteColor) -> Result<Note, StoreError>;

    async fn update_geometry(&self, id: NoteId, x: f64, y: f64, width: f64, height: f64) -> Result<(), StoreError>;

    async fn update_position(&self, id: NoteId, x: f64, y: f64, z_index: i64) -> Result<(), StoreError>;

    async fn update_content(&self, id: NoteId, text: String) -> Result<(), StoreError>;

    async fn delete_note(&self, id: NoteId) -> Result<(), StoreError>;

    /// Delete every note on a board.
    async fn delete_all(&self, board_id: BoardId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    boards: HashSet<BoardId>,
    notes: HashMap<NoteId, Note>,
}

/// In-memory [`NoteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Store pre-populated with `boards` and `notes`. Every note's board is
    /// registered as well.
    #[must_use]
    pub fn seeded(boards: impl IntoIterator<Item = BoardId>, notes: Vec<Note>) -> Self {
        let mut inner = Inner { boards: boards.into_iter().collect(), notes: HashMap::new() };
        for note in notes {
            inner.boards.insert(note.board_id);
            inner.notes.insert(note.id, note);
        }
        Self { inner: RwLock::new(inner) }
    }

    pub async fn add_board(&self, board_id: BoardId) {
        self.inner.write().await.boards.insert(board_id);
    }

    async fn modify(&self, id: NoteId, apply: impl FnOnce(&mut Note) + Send) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let note = inner.notes.get_mut(&id).ok_or(StoreError::NoteNotFound(id))?;
        apply(note);
        note.updated_at = now_millis();
        Ok(())
    }
}

#[async_trait::async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self, board_id: BoardId) -> Result<Vec<Note>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.boards.contains(&board_id) {
            return Err(StoreError::BoardNotFound(board_id));
        }
        Ok(inner.notes.values().filter(|n| n.board_id == board_id).cloned().collect())
    }

    async fn create_note(&self, board_id: BoardId, x: f64, y: f64, color: NoteColor) -> Result<Note, StoreError> {
        require_finite(&[x, y])?;
        let mut inner = self.inner.write().await;
        if !inner.boards.contains(&board_id) {
            return Err(StoreError::BoardNotFound(board_id));
        }
        let z_index = inner
            .notes
            .values()
            .filter(|n| n.board_id == board_id)
            .map(|n| n.z_index)
            .max()
            .unwrap_or(0)
            + 1;
        let now = now_millis();
        let note = Note {
            id: uuid::Uuid::new_v4(),
            board_id,
            content: String::new(),
            x,
            y,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            color,
            z_index,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_geometry(&self, id: NoteId, x: f64, y: f64, width: f64, height: f64) -> Result<(), StoreError> {
        require_finite(&[x, y, width, height])?;
        self.modify(id, |note| {
            note.x = x;
            note.y = y;
            note.width = width;
            note.height = height;
        })
        .await
    }

    async fn update_position(&self, id: NoteId, x: f64, y: f64, z_index: i64) -> Result<(), StoreError> {
        require_finite(&[x, y])?;
        self.modify(id, |note| {
            note.x = x;
            note.y = y;
            note.z_index = z_index;
        })
        .await
    }

    async fn update_content(&self, id: NoteId, text: String) -> Result<(), StoreError> {
        self.modify(id, |note| note.content = text).await
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.notes.remove(&id).map(|_| ()).ok_or(StoreError::NoteNotFound(id))
    }

    async fn delete_all(&self, board_id: BoardId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.boards.contains(&board_id) {
            return Err(StoreError::BoardNotFound(board_id));
        }
        inner.notes.retain(|_, n| n.board_id != board_id);
        Ok(())
    }
}

fn require_finite(values: &[f64]) -> Result<(), StoreError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(StoreError::Rejected("non-finite geometry".into()))
    }
}

/// Wall-clock milliseconds since the Unix epoch.
fn now_millis() -> i64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}

// =============================================================================
// TEST HELPERS
// =============================================================================
