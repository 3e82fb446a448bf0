//! Auto-arrange: greedy shelf packing of notes into a roughly 3:2 block.
//!
//! DESIGN
//! ======
//! Notes are visited in reading order (top-to-bottom, then left-to-right for
//! notes sitting on nearly the same row). Each note tries a small set of
//! anchor points derived from the notes already placed: the origin, the spot
//! right of each placed note, the spot below it, and the start of a new row
//! below it. Anchors that would overflow the target row width are dropped,
//! the rest are tried top-most then left-most, and the first anchor that keeps
//! an `ARRANGE_GAP` margin to every placed note wins. Nothing is revisited once
//! placed, so the result is deterministic for a given input order but not
//! globally optimal.

#[cfg(test)]
#[path = "arrange_test.rs"]
mod arrange_test;

use std::cmp::Ordering;

use crate::consts::{ARRANGE_ASPECT, ARRANGE_GAP, ARRANGE_MIN_ROW_WIDTH, ARRANGE_ROW_TOLERANCE, ARRANGE_SLACK};
use crate::doc::Note;
use crate::geom::{Point, Rect};

/// Reading-order comparison with a row tolerance band.
///
/// Notes whose tops are within [`ARRANGE_ROW_TOLERANCE`] of each other are
/// treated as the same row and ordered by `x`.
fn reading_order(a: &Note, b: &Note) -> Ordering {
    if (a.y - b.y).abs() > ARRANGE_ROW_TOLERANCE {
        a.y.total_cmp(&b.y)
    } else {
        a.x.total_cmp(&b.x)
    }
}

/// Stable insertion sort by [`reading_order`].
///
/// The tolerance band makes the comparison non-transitive, which the slice
/// sorts are allowed to reject.
fn sort_reading_order(notes: &mut [&Note]) {
    for i in 1..notes.len() {
        let mut j = i;
        while j > 0 && reading_order(notes[j - 1], notes[j]) == Ordering::Greater {
            notes.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Maximum row width for a set of notes.
#[must_use]
pub fn target_row_width(notes: &[Note]) -> f64 {
    let total_area: f64 = notes.iter().map(|n| n.width * n.height).sum();
    (total_area * ARRANGE_ASPECT * ARRANGE_SLACK).sqrt().max(ARRANGE_MIN_ROW_WIDTH)
}

/// Candidate anchors for the next note, before width filtering.
fn candidate_anchors(placed: &[Rect]) -> Vec<Point> {
    let mut anchors = Vec::with_capacity(1 + placed.len() * 3);
    anchors.push(Point::new(0.0, 0.0));
    for p in placed {
        anchors.push(Point::new(p.right() + ARRANGE_GAP, p.y));
        anchors.push(Point::new(p.x, p.bottom() + ARRANGE_GAP));
        anchors.push(Point::new(0.0, p.bottom() + ARRANGE_GAP));
    }
    anchors
}

/// Whether `rect` keeps an `ARRANGE_GAP` clearance from every placed rectangle.
///
/// Equivalent to both rectangles inflated by half a gap not intersecting.
/// Written against `right() + GAP` so anchors built from the same expression
/// compare exactly.
fn is_clear(rect: &Rect, placed: &[Rect]) -> bool {
    placed.iter().all(|p| {
        let overlap_x = rect.x < p.right() + ARRANGE_GAP && rect.right() + ARRANGE_GAP > p.x;
        let overlap_y = rect.y < p.bottom() + ARRANGE_GAP && rect.bottom() + ARRANGE_GAP > p.y;
        !(overlap_x && overlap_y)
    })
}

/// Pick the placement for a `width`×`height` note given what is already placed.
fn place(width: f64, height: f64, placed: &[Rect], row_width: f64) -> Point {
    let mut anchors: Vec<Point> = candidate_anchors(placed)
        .into_iter()
        .filter(|a| a.x + width <= row_width)
        .collect();
    anchors.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));

    let fit = anchors
        .into_iter()
        .find(|a| is_clear(&Rect::new(a.x, a.y, width, height), placed));

    fit.unwrap_or_else(|| {
        let bottom = placed.iter().map(|p| p.bottom() + ARRANGE_GAP).fold(0.0, f64::max);
        Point::new(0.0, bottom)
    })
}

/// Lay out `notes` without overlap, returning them with new positions.
///
/// Only `x` and `y` change; every other field is carried over. The output is
/// in placement order (reading order of the input).
#[must_use]
pub fn auto_arrange(notes: &[Note]) -> Vec<Note> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Note> = notes.iter().collect();
    sort_reading_order(&mut ordered);

    let row_width = target_row_width(notes);
    let mut placed: Vec<Rect> = Vec::with_capacity(notes.len());
    let mut out = Vec::with_capacity(notes.len());

    for note in ordered {
        let at = place(note.width, note.height, &placed, row_width);
        placed.push(Rect::new(at.x, at.y, note.width, note.height));
        out.push(Note { x: at.x, y: at.y, ..note.clone() });
    }

    out
}
