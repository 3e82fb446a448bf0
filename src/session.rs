//! Board session: the engine plus the collaborators its actions talk to.
//!
//! DESIGN
//! ======
//! The engine mutates its in-memory notes first and returns [`Action`]s.
//! [`BoardSession::dispatch`] turns those into collaborator calls:
//! position/geometry/delete writes go through the ordered [`WriteQueue`] and
//! are never awaited inline, content edits go through the debounced
//! [`ContentQueue`], and note creation is awaited because the engine needs
//! the stored note back.
//!
//! ERROR HANDLING
//! ==============
//! Write failures are logged with `warn!` and otherwise ignored. In-memory
//! state is never rolled back; the next write for that note wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use canvas::consts::SPAWN_JITTER;
use canvas::doc::{BoardId, NoteColor, NoteId};
use canvas::engine::{Action, EngineCore};
use canvas::geom::Point;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::queue::ContentQueue;
use crate::store::{NoteStore, StoreError};
use crate::writes::{Write, WriteQueue};

pub struct BoardSession {
    engine: EngineCore,
    store: Arc<dyn NoteStore>,
    content: ContentQueue,
    writes: WriteQueue,
}

impl BoardSession {
    /// Create a session with no board open.
    #[must_use]
    pub fn new(store: Arc<dyn NoteStore>, config: &Config) -> Self {
        let mut engine = EngineCore::new();
        engine.set_viewport(config.viewport_width, config.viewport_height);
        let content = ContentQueue::spawn(Arc::clone(&store), config.content_debounce);
        let writes = WriteQueue::spawn(Arc::clone(&store));
        Self { engine, store, content, writes }
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    /// Direct access for feeding input events. Pass whatever the handler
    /// returns to [`Self::dispatch`].
    pub fn engine_mut(&mut self) -> &mut EngineCore {
        &mut self.engine
    }

    /// Load a board's notes and reset the view.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if the notes cannot be listed; the
    /// previously open board stays loaded.
    pub async fn open_board(&mut self, board_id: BoardId) -> Result<(), StoreError> {
        let notes = self.store.list_notes(board_id).await?;
        info!(%board_id, count = notes.len(), "board opened");
        self.engine.load_board(board_id, notes);
        Ok(())
    }

    /// Request a note near the viewport center with a little random jitter.
    pub async fn add_note(&mut self, color: NoteColor) -> Option<NoteId> {
        let mut rng = rand::rng();
        let jitter = Point::new(
            rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER),
            rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER),
        );
        let action = self.engine.add_note(color, jitter);
        self.run(action).await
    }

    /// Execute engine actions against the collaborators.
    pub async fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.run(action).await;
        }
    }

    /// Wait for every in-flight write, including pending content edits.
    pub async fn settle(&mut self) {
        self.content.flush().await;
        self.writes.flush().await;
    }

    /// Settle and stop background work.
    pub async fn close(mut self) {
        self.settle().await;
        self.content.close().await;
        self.writes.close().await;
    }

    /// Returns the id of a newly created note, if any.
    async fn run(&mut self, action: Action) -> Option<NoteId> {
        match action {
            Action::PositionChanged { id, x, y, z_index } => {
                self.writes.submit(Write::Position { id, x, y, z_index });
            }
            Action::GeometryChanged { id, x, y, width, height } => {
                self.writes.submit(Write::Geometry { id, x, y, width, height });
            }
            Action::ContentChanged { id, text } => self.content.enqueue(id, text),
            Action::NoteDeleted { id } => {
                self.content.discard(id);
                self.writes.submit(Write::Delete(id));
            }
            Action::BoardCleared { board_id } => {
                self.content.discard_all();
                self.writes.submit(Write::Clear(board_id));
            }
            Action::CreateRequested { x, y, color } => return self.create(x, y, color).await,
            Action::RenderNeeded => {}
        }
        None
    }

    async fn create(&mut self, x: f64, y: f64, color: NoteColor) -> Option<NoteId> {
        let Some(board_id) = self.engine.board_id else {
            warn!("note creation requested with no board open");
            return None;
        };
        match self.store.create_note(board_id, x, y, color).await {
            Ok(note) => {
                let id = note.id;
                debug!(note_id = %id, x, y, "note created");
                self.engine.apply_create(note);
                Some(id)
            }
            Err(e) => {
                warn!(%board_id, error = %e, "note creation failed");
                None
            }
        }
    }
}
