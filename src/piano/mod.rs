//! Keyboard data model.
//!
//! This module provides notes and their frequencies, the physical key
//! layout algorithm, the keyboard container, and the press/release state
//! machine that drives sound and key animation.

mod keyboard;
mod layout;
mod note;
mod press;

pub use keyboard::{Key, Keyboard, PressState};
pub use layout::{layout_keys, x_offset_for, KeyPlacement};
pub use note::{frequency_of, KeyClass, Note};
pub use press::{AudioSink, PressController, PressOutcome, TiltAnimator};

#[cfg(test)]
pub(crate) use press::tests::RecordingAudio;

use crate::scene::Vec3;
use std::time::Duration;

/// Pitch-class names in chromatic order, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch classes played on white keys.
pub const WHITE_KEY_NOTES: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

/// Pitch classes played on black keys.
pub const BLACK_KEY_NOTES: [&str; 5] = ["C#", "D#", "F#", "G#", "A#"];

pub const NOTES_PER_OCTAVE: i32 = 12;

/// Tuning reference: A4 at 440 Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// Chromatic index of A4 (index 0 is C0).
pub const A4_NOTE_INDEX: i32 = 57;

/// Horizontal distance between adjacent white keys, in meters.
pub const WHITE_KEY_SPACE: f64 = 0.025;

pub const WHITE_KEY_WIDTH: f64 = 0.023;
pub const BLACK_KEY_WIDTH: f64 = 0.015;
pub const WHITE_KEY_HEIGHT: f64 = 0.010;
pub const BLACK_KEY_HEIGHT: f64 = 0.008;
pub const WHITE_KEY_DEPTH: f64 = 0.120;
pub const BLACK_KEY_DEPTH: f64 = 0.080;

/// Rotation pivot of a white key, relative to its geometric center.
/// Sits near the far (hinge) edge so a press tilts the near edge down.
pub const WHITE_PIVOT: Vec3 = Vec3::new(0.0, 0.01, -0.07);

/// Rotation pivot of a black key, relative to its geometric center.
pub const BLACK_PIVOT: Vec3 = Vec3::new(0.0, 0.01, -0.05);

/// Rotation about the x axis of a fully pressed key, in radians.
pub const KEY_PRESS_ROTATION: f64 = 0.085;

/// How long a key takes to tilt down or back up.
pub const KEY_TILT_DURATION: Duration = Duration::from_millis(100);

impl KeyClass {
    /// Box dimensions `(width, height, depth)` of a key of this class.
    pub const fn dimensions(self) -> Vec3 {
        match self {
            KeyClass::White => Vec3::new(WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT, WHITE_KEY_DEPTH),
            KeyClass::Black => Vec3::new(BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT, BLACK_KEY_DEPTH),
        }
    }

    /// Rotation pivot of this key class.
    pub const fn pivot(self) -> Vec3 {
        match self {
            KeyClass::White => WHITE_PIVOT,
            KeyClass::Black => BLACK_PIVOT,
        }
    }
}
