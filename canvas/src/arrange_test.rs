#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use super::*;
use crate::doc::NoteColor;

fn make_note(x: f64, y: f64, w: f64, h: f64) -> Note {
    Note {
        id: Uuid::new_v4(),
        board_id: Uuid::nil(),
        content: String::new(),
        x,
        y,
        width: w,
        height: h,
        color: NoteColor::Yellow,
        z_index: 0,
        created_at: 0,
        updated_at: 0,
    }
}

fn assert_no_gap_overlap(notes: &[Note]) {
    for (i, a) in notes.iter().enumerate() {
        for b in &notes[i + 1..] {
            // Shrink by a hair so notes exactly GAP apart don't trip on rounding.
            let ra = a.rect().inflate(ARRANGE_GAP * 0.5 - 1e-6);
            let rb = b.rect().inflate(ARRANGE_GAP * 0.5 - 1e-6);
            assert!(!ra.intersects(&rb), "overlap between {:?} and {:?}", a.rect(), b.rect());
        }
    }
}

/// Sorted placement positions, for congruence checks.
fn shape(notes: &[Note]) -> Vec<(i64, i64)> {
    let mut pts: Vec<(i64, i64)> = notes.iter().map(|n| (n.x.round() as i64, n.y.round() as i64)).collect();
    pts.sort_unstable();
    pts
}

// =============================================================
// Basics
// =============================================================

#[test]
fn empty_input_returns_empty() {
    assert!(auto_arrange(&[]).is_empty());
}

#[test]
fn single_note_goes_to_origin() {
    let out = auto_arrange(&[make_note(500.0, -300.0, 240.0, 180.0)]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].x, 0.0);
    assert_eq!(out[0].y, 0.0);
}

#[test]
fn preserves_non_position_fields() {
    let mut note = make_note(10.0, 10.0, 300.0, 200.0);
    note.content = "keep me".into();
    note.color = NoteColor::Purple;
    note.z_index = 42;
    let out = auto_arrange(std::slice::from_ref(&note));
    assert_eq!(out[0].id, note.id);
    assert_eq!(out[0].content, "keep me");
    assert_eq!(out[0].color, NoteColor::Purple);
    assert_eq!(out[0].z_index, 42);
    assert_eq!(out[0].width, 300.0);
    assert_eq!(out[0].height, 200.0);
}

#[test]
fn second_note_goes_right_of_first() {
    let a = make_note(0.0, 0.0, 240.0, 180.0);
    let b = make_note(900.0, 0.0, 240.0, 180.0);
    let out = auto_arrange(&[a, b]);
    assert_eq!((out[1].x, out[1].y), (240.0 + ARRANGE_GAP, 0.0));
}

#[test]
fn row_wraps_when_target_width_exceeded() {
    // Target width is 1000 at a 260 pitch: a fourth note would end at 1020.
    let notes: Vec<Note> = (0..5).map(|i| make_note(f64::from(i) * 300.0, 0.0, 240.0, 180.0)).collect();
    let out = auto_arrange(&notes);
    let first_row: Vec<&Note> = out.iter().filter(|n| n.y == 0.0).collect();
    assert!(first_row.iter().all(|n| n.rect().right() <= 1000.0));
    assert_eq!(first_row.len(), 3);
    assert!(out.iter().any(|n| n.y == 180.0 + ARRANGE_GAP && n.x == 0.0));
}

#[test]
fn tall_note_lets_short_notes_stack_beside_it() {
    let tall = make_note(0.0, 0.0, 400.0, 400.0);
    let short_a = make_note(500.0, 0.0, 400.0, 180.0);
    let short_b = make_note(0.0, 500.0, 400.0, 180.0);
    let out = auto_arrange(&[tall, short_a, short_b]);
    assert_no_gap_overlap(&out);
    // Right of short_a overflows; (0, 200) is blocked by tall; below short_a fits.
    let b = out.iter().find(|n| n.y > 0.0).unwrap();
    assert_eq!((b.x, b.y), (420.0, 200.0));
}

#[test]
fn oversized_note_uses_fallback_below_flow() {
    let small = make_note(0.0, 0.0, 200.0, 150.0);
    let huge = make_note(0.0, 400.0, 5000.0, 150.0);
    let out = auto_arrange(&[small, huge]);
    let placed_huge = out.iter().find(|n| n.width == 5000.0).unwrap();
    assert_eq!(placed_huge.x, 0.0);
    assert_eq!(placed_huge.y, 150.0 + ARRANGE_GAP);
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn notes_within_row_tolerance_ordered_by_x() {
    // b sits 8 units above a but further right: same row, so a is placed first.
    let a = make_note(0.0, 108.0, 240.0, 180.0);
    let b = make_note(500.0, 100.0, 240.0, 180.0);
    let out = auto_arrange(&[b.clone(), a.clone()]);
    assert_eq!(out[0].id, a.id);
    assert_eq!(out[1].id, b.id);
}

#[test]
fn notes_outside_row_tolerance_ordered_by_y() {
    let a = make_note(0.0, 120.0, 240.0, 180.0);
    let b = make_note(500.0, 100.0, 240.0, 180.0);
    let out = auto_arrange(&[a.clone(), b.clone()]);
    assert_eq!(out[0].id, b.id);
}

// =============================================================
// Properties
// =============================================================

#[test]
fn random_inputs_never_overlap_with_gap() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..40 {
        let count = 1 + round % 17;
        let notes: Vec<Note> = (0..count)
            .map(|_| {
                make_note(
                    rng.random_range(-2000.0..2000.0),
                    rng.random_range(-2000.0..2000.0),
                    rng.random_range(150.0..550.0),
                    rng.random_range(120.0..420.0),
                )
            })
            .collect();
        let out = auto_arrange(&notes);
        assert_eq!(out.len(), notes.len());
        assert_no_gap_overlap(&out);
        assert!(out.iter().all(|n| n.x >= 0.0 && n.y >= 0.0));
    }
}

#[test]
fn equal_sized_notes_layout_independent_of_input_positions() {
    let mut rng = StdRng::seed_from_u64(99);
    let a: Vec<Note> = (0..9)
        .map(|_| make_note(rng.random_range(0.0..3000.0), rng.random_range(0.0..3000.0), 240.0, 180.0))
        .collect();
    let mut b: Vec<Note> = (0..9)
        .map(|_| make_note(rng.random_range(-3000.0..0.0), rng.random_range(0.0..500.0), 240.0, 180.0))
        .collect();
    b.reverse();
    assert_eq!(shape(&auto_arrange(&a)), shape(&auto_arrange(&b)));
}

#[test]
fn rerun_is_deterministic() {
    let notes = vec![
        make_note(0.0, 0.0, 300.0, 200.0),
        make_note(10.0, 400.0, 150.0, 120.0),
        make_note(800.0, 5.0, 260.0, 300.0),
    ];
    let first = auto_arrange(&notes);
    let second = auto_arrange(&notes);
    assert_eq!(first, second);
}

#[test]
fn target_row_width_has_floor() {
    assert_eq!(target_row_width(&[make_note(0.0, 0.0, 150.0, 120.0)]), ARRANGE_MIN_ROW_WIDTH);
}

#[test]
fn target_row_width_grows_with_area() {
    let notes: Vec<Note> = (0..100).map(|_| make_note(0.0, 0.0, 240.0, 180.0)).collect();
    let expected = (100.0 * 240.0 * 180.0 * ARRANGE_ASPECT * ARRANGE_SLACK).sqrt();
    assert!((target_row_width(&notes) - expected).abs() < 1e-9);
}
