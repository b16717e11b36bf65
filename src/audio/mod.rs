//! Audio output for key presses.
//!
//! This module turns a key's frequency into a short decaying sine tone,
//! played through rodio. The keyboard only ever hands it a frequency.

pub mod engine;

pub use engine::{DecayingSine, ToneEngine};
