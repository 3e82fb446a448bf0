//! Content write queue: coalesces rapid text edits per note.
//!
//! DESIGN
//! ======
//! A background task owns a map of `note id -> (latest text, deadline)`.
//! Every edit replaces the pending text and pushes the deadline out by the
//! debounce window, so a burst of keystrokes produces one `update_content`
//! call carrying the final text. Writes for different notes are independent.
//!
//! ERROR HANDLING
//! ==============
//! A failed write is logged and dropped. The in-memory note already shows
//! the new text; the next edit to that note will try again.

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use canvas::doc::NoteId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::store::NoteStore;

enum Command {
    Edit { id: NoteId, text: String },
    Discard(NoteId),
    DiscardAll,
    Flush(oneshot::Sender<()>),
}

/// Handle to the content writer task.
pub struct ContentQueue {
    tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl ContentQueue {
    /// Spawn the writer task.
    #[must_use]
    pub fn spawn(store: Arc<dyn NoteStore>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        info!(debounce = ?debounce, "content write queue configured");
        let worker = tokio::spawn(run(store, debounce, rx));
        Self { tx, worker }
    }

    /// Record the latest text for a note and restart its quiet period.
    pub fn enqueue(&self, id: NoteId, text: String) {
        self.send(Command::Edit { id, text });
    }

    /// Drop any pending write for a deleted note.
    pub fn discard(&self, id: NoteId) {
        self.send(Command::Discard(id));
    }

    /// Drop every pending write.
    pub fn discard_all(&self) {
        self.send(Command::DiscardAll);
    }

    /// Write everything pending now, without waiting for quiet periods.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Command::Flush(ack_tx));
        if ack_rx.await.is_err() {
            warn!("content write queue stopped before flush completed");
        }
    }

    /// Flush pending writes and stop the task.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "content write queue task failed");
        }
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("content write queue closed; dropping command");
        }
    }
}

async fn run(store: Arc<dyn NoteStore>, debounce: Duration, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending: HashMap<NoteId, (String, Instant)> = HashMap::new();

    loop {
        let next_due = pending.values().map(|(_, due)| *due).min();

        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Edit { id, text }) => {
                    pending.insert(id, (text, Instant::now() + debounce));
                }
                Some(Command::Discard(id)) => {
                    pending.remove(&id);
                }
                Some(Command::DiscardAll) => pending.clear(),
                Some(Command::Flush(ack)) => {
                    write_due(store.as_ref(), &mut pending, None).await;
                    if ack.send(()).is_err() {
                        debug!("flush requester went away");
                    }
                }
                None => {
                    write_due(store.as_ref(), &mut pending, None).await;
                    break;
                }
            },
            () = tokio::time::sleep_until(next_due.unwrap_or_else(Instant::now)), if next_due.is_some() => {
                write_due(store.as_ref(), &mut pending, Some(Instant::now())).await;
            }
        }
    }
}

/// Write entries whose deadline has passed, or all of them when `now` is `None`.
async fn write_due(store: &dyn NoteStore, pending: &mut HashMap<NoteId, (String, Instant)>, now: Option<Instant>) {
    let due: Vec<NoteId> = pending
        .iter()
        .filter(|(_, (_, deadline))| now.is_none_or(|now| *deadline <= now))
        .map(|(id, _)| *id)
        .collect();

    for id in due {
        let Some((text, _)) = pending.remove(&id) else {
            continue;
        };
        match store.update_content(id, text).await {
            Ok(()) => debug!(note_id = %id, "content persisted"),
            Err(e) => warn!(note_id = %id, error = %e, "content write failed; keeping in-memory text"),
        }
    }
}
