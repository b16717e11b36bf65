//! Pitch representation.
//!
//! A note is a single pitch identified by its chromatic index. Index 0 is C
//! in octave 0, so A4 (the tuning reference) sits at index 57.

use super::{A4_FREQUENCY, A4_NOTE_INDEX, BLACK_KEY_NOTES, NOTES_PER_OCTAVE, NOTE_NAMES, WHITE_KEY_NOTES};
use std::fmt;

/// The two physical key classes of a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Long, low key on the main playing surface.
    White,
    /// Short, raised key resting between two white keys.
    Black,
}

/// An immutable pitch, identified by chromatic index.
///
/// # Examples
///
/// ```
/// use chordano::piano::Note;
///
/// let a4 = Note::new(57);
/// assert_eq!(a4.name_within_octave(), "A");
/// assert!(a4.is_white_key());
/// assert_eq!(a4.to_string(), "A4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    chromatic_index: i32,
}

impl Note {
    /// Creates a note from its chromatic index.
    pub const fn new(chromatic_index: i32) -> Self {
        Self { chromatic_index }
    }

    /// Returns the chromatic index of this note.
    pub const fn chromatic_index(&self) -> i32 {
        self.chromatic_index
    }

    /// Position within the octave, always in `0..12`.
    ///
    /// Uses the Euclidean remainder so that negative indices still map onto
    /// a valid pitch class.
    pub const fn index_within_octave(&self) -> usize {
        self.chromatic_index.rem_euclid(NOTES_PER_OCTAVE) as usize
    }

    /// Octave number, where index 0 is the first note of octave 0.
    pub const fn octave(&self) -> i32 {
        self.chromatic_index.div_euclid(NOTES_PER_OCTAVE)
    }

    /// Pitch-class name, e.g. `"C#"`.
    pub fn name_within_octave(&self) -> &'static str {
        NOTE_NAMES[self.index_within_octave()]
    }

    pub fn is_white_key(&self) -> bool {
        WHITE_KEY_NOTES.contains(&self.name_within_octave())
    }

    pub fn is_black_key(&self) -> bool {
        BLACK_KEY_NOTES.contains(&self.name_within_octave())
    }

    /// Physical key class this note is played on.
    pub fn key_class(&self) -> KeyClass {
        if self.is_black_key() {
            KeyClass::Black
        } else {
            KeyClass::White
        }
    }

    /// Returns the note `semitones` above (or below, if negative) this one.
    ///
    /// Returns None if the result leaves the `i32` range.
    pub fn offset_by(&self, semitones: i32) -> Option<Note> {
        self.chromatic_index.checked_add(semitones).map(Note::new)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name_within_octave(), self.octave())
    }
}

/// Equal-tempered frequency of a note, in Hz.
///
/// Scales the A4 reference by a power of the twelfth root of two for each
/// semitone of distance. Total over all indices; the reference note itself
/// maps to exactly 440.0.
///
/// # Examples
///
/// ```
/// use chordano::piano::{frequency_of, Note};
///
/// assert_eq!(frequency_of(Note::new(57)), 440.0);
/// assert!((frequency_of(Note::new(69)) - 880.0).abs() < 1e-9);
/// ```
pub fn frequency_of(note: Note) -> f64 {
    let relative = (note.chromatic_index as i64 - A4_NOTE_INDEX as i64) as f64;
    A4_FREQUENCY * 2f64.powf(relative / NOTES_PER_OCTAVE as f64)
}
