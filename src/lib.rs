//! chordano - An interactive virtual piano keyboard.
//!
//! This library provides the keyboard model, the key layout algorithm,
//! ray hit testing against tilted keys, and the press/release logic that
//! plays tones and animates keys.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod input;
pub mod piano;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use audio::ToneEngine;
pub use config::{KeyboardConfig, StageConfig};
pub use error::{ChordanoError, Result};
pub use piano::{frequency_of, Keyboard, Note};
pub use scene::{KeyRef, Stage};
