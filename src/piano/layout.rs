//! Physical key layout.
//!
//! Places white keys at even spacing and black keys centered between their
//! neighbours, then centers the whole keyboard on x = 0. Each key's offset
//! is expressed at its rotation pivot, so tilting a key swings it around
//! its hinge edge instead of its middle.

use super::note::{KeyClass, Note};
use super::{BLACK_KEY_DEPTH, BLACK_KEY_HEIGHT, WHITE_KEY_DEPTH, WHITE_KEY_HEIGHT, WHITE_KEY_SPACE};
use crate::scene::Vec3;

/// Where one key sits relative to the keyboard root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPlacement {
    /// The note this key plays.
    pub note: Note,
    /// White or black.
    pub class: KeyClass,
    /// Horizontal offset from the lowest key, before centering.
    pub raw_x: f64,
    /// Pivot position relative to the keyboard root, centering and pivot
    /// adjustment included.
    pub offset: Vec3,
}

/// Horizontal advance, in white-key slots, when stepping from `current`
/// to `next`.
///
/// Two adjacent white keys (E-F, B-C) are a full slot apart; any step
/// involving a black key is half a slot. Assumes black keys are never
/// adjacent to each other, which holds for the 12-tone layout.
fn slot_step(current: Note, next: Note) -> f64 {
    if current.is_white_key() && next.is_white_key() {
        1.0
    } else {
        0.5
    }
}

/// Raw (uncentered) horizontal offset of `note` within the run `notes`.
///
/// `notes` must be the contiguous ascending run starting at the lowest note.
/// Returns None when `note` is not part of the run.
pub fn x_offset_for(notes: &[Note], note: Note) -> Option<f64> {
    let lowest = *notes.first()?;
    let relative = note.chromatic_index().checked_sub(lowest.chromatic_index())?;
    let relative = usize::try_from(relative).ok()?;
    if relative >= notes.len() {
        return None;
    }

    let slots: f64 = notes[..=relative]
        .windows(2)
        .map(|pair| slot_step(pair[0], pair[1]))
        .sum();
    Some(slots * WHITE_KEY_SPACE)
}

/// Computes the placement of every key for a contiguous run of notes.
///
/// The run must be non-empty for the result to be meaningful; an empty
/// run yields an empty layout. The result depends only on `notes`, so
/// repeated calls return identical offsets.
pub fn layout_keys(notes: &[Note]) -> Vec<KeyPlacement> {
    let mut raw_offsets = Vec::with_capacity(notes.len());
    let mut slots = 0.0;
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            slots += slot_step(notes[i - 1], *note);
        }
        raw_offsets.push(slots * WHITE_KEY_SPACE);
    }

    let width = raw_offsets.last().copied().unwrap_or(0.0);
    let x_center_offset = -width / 2.0;

    notes
        .iter()
        .zip(raw_offsets)
        .map(|(&note, raw_x)| {
            let class = note.key_class();
            let raised = match class {
                KeyClass::White => Vec3::ZERO,
                KeyClass::Black => Vec3::new(
                    0.0,
                    (WHITE_KEY_HEIGHT + BLACK_KEY_HEIGHT) / 2.0,
                    -(WHITE_KEY_DEPTH - BLACK_KEY_DEPTH) / 2.0,
                ),
            };
            let offset = Vec3::new(raw_x + x_center_offset, 0.0, 0.0) + raised + class.pivot();
            KeyPlacement {
                note,
                class,
                raw_x,
                offset,
            }
        })
        .collect()
}
