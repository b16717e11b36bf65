//! Error types for keyboard construction, queries, and configuration.

use thiserror::Error;

/// Errors produced by the chordano library.
///
/// Construction and lookup errors are configuration mistakes: they are
/// returned to the caller rather than papered over with a default key.
#[derive(Debug, Error)]
pub enum ChordanoError {
    /// A keyboard must have at least one key.
    #[error("keyboard must have at least one key (got {0})")]
    InvalidKeyCount(usize),

    /// A note was passed that does not belong to the keyboard.
    #[error("note {note} is outside the keyboard range [{lowest}, {lowest} + {key_count})")]
    NoteOutOfRange {
        note: i32,
        lowest: i32,
        key_count: usize,
    },

    /// A key index past the end of the keyboard.
    #[error("key index {index} is out of range for a keyboard of {key_count} keys")]
    KeyIndexOutOfRange { index: usize, key_count: usize },

    /// The keyboard's highest chromatic index does not fit in an `i32`.
    #[error("keyboard of {key_count} keys starting at {lowest} overflows the chromatic range")]
    IndexOverflow { lowest: i32, key_count: usize },

    /// The stage configuration is structurally invalid.
    #[error("invalid stage configuration: {0}")]
    InvalidConfig(String),

    /// File could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON could not be parsed or produced.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The audio output could not be opened.
    #[error("audio output unavailable: {0}")]
    Audio(String),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ChordanoError>;
