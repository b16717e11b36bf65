//! Keyboard container.
//!
//! A keyboard is a contiguous run of notes, each with exactly one key. The
//! structure is fixed at construction; only per-key press state changes
//! afterwards.

use super::layout::layout_keys;
use super::note::{KeyClass, Note};
use crate::error::{ChordanoError, Result};
use crate::scene::Vec3;

/// Whether a key is currently held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Released,
    Pressed,
}

/// One physical key.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    note: Note,
    class: KeyClass,
    raw_x: f64,
    offset: Vec3,
    state: PressState,
}

impl Key {
    pub fn note(&self) -> Note {
        self.note
    }

    pub fn class(&self) -> KeyClass {
        self.class
    }

    /// Pivot position relative to the keyboard root.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Box dimensions `(width, height, depth)`.
    pub fn dimensions(&self) -> Vec3 {
        self.class.dimensions()
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == PressState::Pressed
    }

    pub(crate) fn set_state(&mut self, state: PressState) {
        self.state = state;
    }
}

/// An ordered run of keys, lowest note first (left to right).
#[derive(Debug, Clone)]
pub struct Keyboard {
    lowest_note: Note,
    notes: Vec<Note>,
    keys: Vec<Key>,
}

impl Keyboard {
    /// Builds a keyboard of `key_count` keys starting at `lowest_note`.
    ///
    /// The note run is materialized first, then laid out as a whole, since
    /// each key's offset depends on every note below it.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `key_count` is zero
    /// - the highest note's chromatic index would overflow
    ///
    /// # Examples
    ///
    /// ```
    /// use chordano::piano::{Keyboard, Note};
    ///
    /// let piano = Keyboard::new(88, Note::new(21)).unwrap();
    /// assert_eq!(piano.note_at(87).unwrap().chromatic_index(), 108);
    /// assert!(piano.key_for_note(20).is_none());
    /// ```
    pub fn new(key_count: usize, lowest_note: Note) -> Result<Self> {
        if key_count == 0 {
            return Err(ChordanoError::InvalidKeyCount(key_count));
        }
        let overflow = || ChordanoError::IndexOverflow {
            lowest: lowest_note.chromatic_index(),
            key_count,
        };
        let span = i32::try_from(key_count - 1).map_err(|_| overflow())?;
        lowest_note.offset_by(span).ok_or_else(overflow)?;

        let notes: Vec<Note> = (0..=span)
            .map(|i| Note::new(lowest_note.chromatic_index() + i))
            .collect();

        let keys = layout_keys(&notes)
            .into_iter()
            .map(|placement| Key {
                note: placement.note,
                class: placement.class,
                raw_x: placement.raw_x,
                offset: placement.offset,
                state: PressState::Released,
            })
            .collect();

        Ok(Self {
            lowest_note,
            notes,
            keys,
        })
    }

    pub fn lowest_note(&self) -> Note {
        self.lowest_note
    }

    pub fn highest_note(&self) -> Note {
        // Never empty: construction rejects a zero key count.
        self.notes[self.notes.len() - 1]
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Note at sequence position `key_index`.
    ///
    /// # Errors
    ///
    /// Returns `KeyIndexOutOfRange` if `key_index >= key_count()`.
    pub fn note_at(&self, key_index: usize) -> Result<Note> {
        self.notes
            .get(key_index)
            .copied()
            .ok_or(ChordanoError::KeyIndexOutOfRange {
                index: key_index,
                key_count: self.key_count(),
            })
    }

    pub fn key_at(&self, key_index: usize) -> Option<&Key> {
        self.keys.get(key_index)
    }

    pub fn key_at_mut(&mut self, key_index: usize) -> Option<&mut Key> {
        self.keys.get_mut(key_index)
    }

    /// Sequence position of the key playing `chromatic_index`, if any.
    pub fn index_of(&self, chromatic_index: i32) -> Option<usize> {
        let relative = chromatic_index.checked_sub(self.lowest_note.chromatic_index())?;
        let relative = usize::try_from(relative).ok()?;
        (relative < self.key_count()).then_some(relative)
    }

    /// Key playing `chromatic_index`.
    ///
    /// Returns None for notes outside this keyboard; callers routinely ask
    /// with notes belonging to other keyboards.
    pub fn key_for_note(&self, chromatic_index: i32) -> Option<&Key> {
        self.index_of(chromatic_index).map(|i| &self.keys[i])
    }

    pub fn key_for_note_mut(&mut self, chromatic_index: i32) -> Option<&mut Key> {
        self.index_of(chromatic_index).map(|i| &mut self.keys[i])
    }

    /// Raw horizontal offset of `note` from the lowest key, before centering.
    ///
    /// # Errors
    ///
    /// Returns `NoteOutOfRange` if `note` is not on this keyboard.
    pub fn x_offset_of(&self, note: Note) -> Result<f64> {
        self.index_of(note.chromatic_index())
            .map(|i| self.keys[i].raw_x)
            .ok_or(ChordanoError::NoteOutOfRange {
                note: note.chromatic_index(),
                lowest: self.lowest_note.chromatic_index(),
                key_count: self.key_count(),
            })
    }

    /// Indices of all keys currently pressed.
    pub fn pressed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_pressed())
            .map(|(i, _)| i)
    }
}
