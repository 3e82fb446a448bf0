//! Ordered note write queue.
//!
//! DESIGN
//! ======
//! Position, geometry and delete writes go through one background task and
//! reach the store in the order they were submitted. A slow call holds back
//! the writes behind it instead of letting them overtake it, so the last
//! write for a note is always the one the store keeps.
//!
//! ERROR HANDLING
//! ==============
//! A failed write is logged and dropped. In-memory state is never rolled
//! back; the next write for that note wins.

#[cfg(test)]
#[path = "writes_test.rs"]
mod writes_test;

use std::sync::Arc;

use canvas::doc::{BoardId, NoteId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::{NoteStore, StoreError};

/// One store mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Write {
    Position { id: NoteId, x: f64, y: f64, z_index: i64 },
    Geometry { id: NoteId, x: f64, y: f64, width: f64, height: f64 },
    Delete(NoteId),
    Clear(BoardId),
}

enum Command {
    Write(Write),
    Flush(oneshot::Sender<()>),
}

/// Handle to the write task.
pub struct WriteQueue {
    tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl WriteQueue {
    #[must_use]
    pub fn spawn(store: Arc<dyn NoteStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(store, rx));
        Self { tx, worker }
    }

    /// Queue a write behind everything already submitted.
    pub fn submit(&self, write: Write) {
        self.send(Command::Write(write));
    }

    /// Wait until every write submitted so far has been attempted.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Command::Flush(ack_tx));
        if ack_rx.await.is_err() {
            warn!("note write queue stopped before flush completed");
        }
    }

    /// Drain queued writes and stop the task.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "note write queue task failed");
        }
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("note write queue closed; dropping command");
        }
    }
}

async fn run(store: Arc<dyn NoteStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Write(write) => apply(store.as_ref(), write).await,
            Command::Flush(ack) => {
                if ack.send(()).is_err() {
                    debug!("flush requester went away");
                }
            }
        }
    }
}

async fn apply(store: &dyn NoteStore, write: Write) {
    let result: Result<(), StoreError> = match write {
        Write::Position { id, x, y, z_index } => store.update_position(id, x, y, z_index).await,
        Write::Geometry { id, x, y, width, height } => store.update_geometry(id, x, y, width, height).await,
        Write::Delete(id) => store.delete_note(id).await,
        Write::Clear(board_id) => store.delete_all(board_id).await,
    };
    match result {
        Ok(()) => debug!(?write, "note write persisted"),
        Err(e) => warn!(?write, error = %e, "note write failed; keeping in-memory state"),
    }
}
