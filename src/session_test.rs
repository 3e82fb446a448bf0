#![allow(clippy::float_cmp)]

use std::time::Duration;

use canvas::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, HOME_PAN_X, HOME_PAN_Y};
use canvas::hit::Target;
use canvas::input::{Button, Key, Modifiers};
use uuid::Uuid;

use super::*;
use crate::store::test_helpers::{Call, RecordingStore, note_at};

// =============================================================================
// Helpers
// =============================================================================

struct Fixture {
    store: Arc<RecordingStore>,
    session: BoardSession,
    board: BoardId,
}

async fn fixture(notes: Vec<canvas::doc::Note>, board: BoardId) -> Fixture {
    let store = Arc::new(RecordingStore::seeded(board, notes));
    let mut session = BoardSession::new(store.clone(), &Config::default());
    session.open_board(board).await.unwrap();
    Fixture { store, session, board }
}

fn none() -> Modifiers {
    Modifiers::default()
}

/// Screen point for a world point under the home camera.
fn screen(x: f64, y: f64) -> Point {
    Point::new(x + HOME_PAN_X, y + HOME_PAN_Y)
}

async fn drag(session: &mut BoardSession, id: NoteId, from: Point, to: Point) {
    let engine = session.engine_mut();
    let mut actions = engine.on_pointer_down(from, Button::Primary, none(), Target::Body(id));
    actions.extend(engine.on_pointer_move(to, none()));
    actions.extend(engine.on_pointer_up(to, none()));
    session.dispatch(actions).await;
}

// =============================================================================
// open_board
// =============================================================================

#[tokio::test]
async fn open_board_loads_notes_and_resets_view() {
    let board = Uuid::new_v4();
    let mut f = fixture(vec![note_at(board, 0.0, 0.0), note_at(board, 500.0, 0.0)], board).await;
    assert_eq!(f.session.engine().doc.len(), 2);
    assert_eq!(f.session.engine().board_id, Some(board));

    let other = Uuid::new_v4();
    f.store.inner.add_board(other).await;
    f.session.engine_mut().camera.zoom = 3.0;
    f.session.open_board(other).await.unwrap();
    assert!(f.session.engine().doc.is_empty());
    let cam = f.session.engine().camera();
    assert_eq!((cam.pan_x, cam.pan_y, cam.zoom), (HOME_PAN_X, HOME_PAN_Y, 1.0));
}

#[tokio::test]
async fn open_unknown_board_keeps_current() {
    let board = Uuid::new_v4();
    let mut f = fixture(vec![note_at(board, 0.0, 0.0)], board).await;
    let result = f.session.open_board(Uuid::new_v4()).await;
    assert!(matches!(result, Err(StoreError::BoardNotFound(_))));
    assert_eq!(f.session.engine().board_id, Some(f.board));
    assert_eq!(f.session.engine().doc.len(), 1);
}

// =============================================================================
// gesture persistence
// =============================================================================

#[tokio::test]
async fn drag_persists_final_position() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;

    drag(&mut f.session, note.id, screen(10.0, 10.0), screen(60.0, 30.0)).await;
    f.session.settle().await;

    assert_eq!(f.store.calls(), vec![Call::Position { id: note.id, x: 50.0, y: 20.0, z_index: 1 }]);
    let stored = f.store.inner.get(&note.id).await.unwrap();
    assert_eq!((stored.x, stored.y, stored.z_index), (50.0, 20.0, 1));
}

#[tokio::test]
async fn resize_persists_geometry() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;

    let engine = f.session.engine_mut();
    let corner = screen(DEFAULT_NOTE_WIDTH - 2.0, DEFAULT_NOTE_HEIGHT - 2.0);
    let mut actions = engine.on_pointer_down(corner, Button::Primary, none(), Target::ResizeHandle(note.id));
    let target = screen(DEFAULT_NOTE_WIDTH + 58.0, DEFAULT_NOTE_HEIGHT + 18.0);
    actions.extend(engine.on_pointer_move(target, none()));
    actions.extend(engine.on_pointer_up(target, none()));
    f.session.dispatch(actions).await;
    f.session.settle().await;

    assert_eq!(
        f.store.calls(),
        vec![Call::Geometry { id: note.id, x: 0.0, y: 0.0, width: 300.0, height: 200.0 }]
    );
}

#[tokio::test]
async fn slow_position_write_does_not_override_newer_drag() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;
    f.store.stall_next_position(Duration::from_millis(50));

    drag(&mut f.session, note.id, screen(10.0, 10.0), screen(110.0, 10.0)).await;
    drag(&mut f.session, note.id, screen(110.0, 10.0), screen(410.0, 10.0)).await;
    f.session.settle().await;

    assert_eq!(f.session.engine().note(&note.id).unwrap().x, 400.0);
    assert_eq!(f.store.inner.get(&note.id).await.unwrap().x, 400.0);
}

#[tokio::test]
async fn failed_write_keeps_in_memory_state() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;
    f.store.set_fail_writes(true);

    drag(&mut f.session, note.id, screen(10.0, 10.0), screen(110.0, 10.0)).await;
    f.session.settle().await;

    let local = f.session.engine().note(&note.id).unwrap();
    assert_eq!((local.x, local.y), (100.0, 0.0));
    let stored = f.store.inner.get(&note.id).await.unwrap();
    assert_eq!((stored.x, stored.y), (0.0, 0.0));
}

// =============================================================================
// creation
// =============================================================================

#[tokio::test]
async fn add_note_spawns_near_viewport_center() {
    let board = Uuid::new_v4();
    let mut f = fixture(Vec::new(), board).await;
    let id = f.session.add_note(NoteColor::Green).await.unwrap();

    // Default viewport 1280x800 under the home camera centers on world (340, 390).
    let note = f.session.engine().note(&id).unwrap();
    assert!((note.x - 220.0).abs() <= SPAWN_JITTER);
    assert!((note.y - 300.0).abs() <= SPAWN_JITTER);
    assert_eq!(note.color, NoteColor::Green);
    assert_eq!(note.z_index, 1);
    assert!(f.store.inner.get(&id).await.is_some());
}

#[tokio::test]
async fn failed_create_adds_nothing() {
    let board = Uuid::new_v4();
    let mut f = fixture(Vec::new(), board).await;
    f.store.set_fail_writes(true);
    assert!(f.session.add_note(NoteColor::Yellow).await.is_none());
    assert!(f.session.engine().doc.is_empty());
}

#[tokio::test]
async fn double_click_creates_note_under_pointer() {
    let board = Uuid::new_v4();
    let mut f = fixture(Vec::new(), board).await;
    let actions = f.session.engine_mut().on_double_click(screen(500.0, 400.0), Target::Canvas);
    f.session.dispatch(actions).await;

    let notes: Vec<_> = f.session.engine().doc.iter().cloned().collect();
    assert_eq!(notes.len(), 1);
    assert_eq!((notes[0].x, notes[0].y), (380.0, 310.0));
}

#[tokio::test]
async fn create_without_board_is_skipped() {
    let store = Arc::new(RecordingStore::default());
    let mut session = BoardSession::new(store.clone(), &Config::default());
    assert!(session.add_note(NoteColor::Yellow).await.is_none());
    assert!(store.calls().is_empty());
}

// =============================================================================
// content
// =============================================================================

#[tokio::test(start_paused = true)]
async fn typing_is_coalesced_into_one_write() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;

    for text in ["s", "sh", "shi", "ship"] {
        let actions = f.session.engine_mut().set_text(&note.id, text.into());
        f.session.dispatch(actions).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(f.session.engine().note(&note.id).unwrap().content, "ship");
    assert!(f.store.content_calls().is_empty());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(f.store.content_calls(), vec![(note.id, "ship".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn deleting_note_cancels_pending_text() {
    let board = Uuid::new_v4();
    let note = note_at(board, 0.0, 0.0);
    let mut f = fixture(vec![note.clone()], board).await;

    let actions = f.session.engine_mut().set_text(&note.id, "draft".into());
    f.session.dispatch(actions).await;
    let actions = f.session.engine_mut().delete_note(&note.id);
    f.session.dispatch(actions).await;
    f.session.settle().await;

    assert!(f.store.content_calls().is_empty());
    assert!(f.store.calls().contains(&Call::Delete(note.id)));
}

// =============================================================================
// board actions
// =============================================================================

#[tokio::test]
async fn delete_key_deletes_selection_in_store() {
    let board = Uuid::new_v4();
    let (a, b) = (note_at(board, 0.0, 0.0), note_at(board, 400.0, 0.0));
    let mut f = fixture(vec![a.clone(), b.clone()], board).await;

    let engine = f.session.engine_mut();
    let mut actions = engine.on_pointer_down(screen(10.0, 10.0), Button::Primary, none(), Target::Body(a.id));
    actions.extend(engine.on_pointer_up(screen(10.0, 10.0), none()));
    actions.extend(engine.on_key_down(&Key("Delete".into()), none()));
    f.session.dispatch(actions).await;
    f.session.settle().await;

    assert!(f.store.inner.get(&a.id).await.is_none());
    assert!(f.store.inner.get(&b.id).await.is_some());
}

#[tokio::test]
async fn clear_all_deletes_board_in_store() {
    let board = Uuid::new_v4();
    let mut f = fixture(vec![note_at(board, 0.0, 0.0), note_at(board, 400.0, 0.0)], board).await;
    let actions = f.session.engine_mut().clear_all();
    f.session.dispatch(actions).await;
    f.session.settle().await;

    assert_eq!(f.store.calls(), vec![Call::DeleteAll(board)]);
    assert!(f.store.list_notes(board).await.unwrap().is_empty());
}

#[tokio::test]
async fn auto_arrange_persists_every_position() {
    let board = Uuid::new_v4();
    let notes: Vec<_> = (0..4).map(|i| note_at(board, f64::from(i) * 5.0, 0.0)).collect();
    let mut f = fixture(notes, board).await;
    let actions = f.session.engine_mut().auto_arrange();
    f.session.dispatch(actions).await;
    f.session.settle().await;

    let positions = f.store.calls().iter().filter(|c| matches!(c, Call::Position { .. })).count();
    assert_eq!(positions, 4);
    for note in f.session.engine().doc.iter() {
        let stored = f.store.inner.get(&note.id).await.unwrap();
        assert_eq!((stored.x, stored.y), (note.x, note.y));
    }
}
