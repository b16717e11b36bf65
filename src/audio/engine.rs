//! Tone output for key presses.
//!
//! Each press starts an independent sine voice that fades out on its own
//! with an exponential decay, played through rodio. Voices are never
//! stopped early.

use crate::error::{ChordanoError, Result};
use crate::piano::AudioSink;
use rodio::{OutputStream, OutputStreamHandle, Source};
use std::f64::consts::TAU;
use std::time::Duration;

/// Sample rate for tone synthesis (44.1 kHz standard).
pub const SAMPLE_RATE: u32 = 44100;

/// Gain at the start of a tone.
const INITIAL_GAIN: f64 = 0.2;

/// Gain the decay ramps down to by the end of the tone.
const FINAL_GAIN: f64 = 1e-7;

/// How long a tone takes to fade out.
pub const TONE_DURATION: Duration = Duration::from_secs(2);

/// A sine wave with an exponential fade, as a finite rodio source.
#[derive(Debug, Clone)]
pub struct DecayingSine {
    frequency: f64,
    /// Index of the next sample.
    position: u64,
    /// Total number of samples in the tone.
    length: u64,
}

impl DecayingSine {
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            position: 0,
            length: (TONE_DURATION.as_secs_f64() * SAMPLE_RATE as f64) as u64,
        }
    }

    /// Envelope gain at `seconds` after the tone starts.
    ///
    /// Falls geometrically from `INITIAL_GAIN` to `FINAL_GAIN` over the tone.
    pub fn gain_at(seconds: f64) -> f64 {
        let progress = (seconds / TONE_DURATION.as_secs_f64()).clamp(0.0, 1.0);
        INITIAL_GAIN * (FINAL_GAIN / INITIAL_GAIN).powf(progress)
    }
}

impl Iterator for DecayingSine {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.position >= self.length {
            return None;
        }
        let t = self.position as f64 / SAMPLE_RATE as f64;
        self.position += 1;
        Some(((TAU * self.frequency * t).sin() * Self::gain_at(t)) as f32)
    }
}

impl Source for DecayingSine {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(TONE_DURATION)
    }
}

/// Plays key tones on the default audio output.
///
/// A muted engine accepts triggers and drops them, for machines with no
/// output device or when sound is switched off.
pub struct ToneEngine {
    /// Audio output stream and its handle (stream must be kept alive).
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl ToneEngine {
    /// Opens the default audio output.
    ///
    /// # Errors
    ///
    /// Returns error if no output device can be opened.
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| ChordanoError::Audio(e.to_string()))?;
        Ok(Self {
            output: Some((stream, handle)),
        })
    }

    /// An engine with no output.
    pub fn muted() -> Self {
        Self { output: None }
    }

    pub fn is_muted(&self) -> bool {
        self.output.is_none()
    }
}

impl AudioSink for ToneEngine {
    fn trigger(&mut self, frequency: f64) -> Result<()> {
        let Some((_, handle)) = &self.output else {
            tracing::debug!("Muted: dropping {:.2} Hz tone", frequency);
            return Ok(());
        };
        handle
            .play_raw(DecayingSine::new(frequency))
            .map_err(|e| ChordanoError::Audio(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_length() {
        let tone = DecayingSine::new(440.0);
        assert_eq!(tone.count(), 2 * SAMPLE_RATE as usize);
    }

    #[test]
    fn test_tone_starts_at_zero_crossing() {
        let mut tone = DecayingSine::new(440.0);
        assert_eq!(tone.next(), Some(0.0));
    }

    #[test]
    fn test_tone_amplitude_bounded() {
        let peak = DecayingSine::new(261.63)
            .map(f32::abs)
            .fold(0.0f32, f32::max);
        assert!(peak <= INITIAL_GAIN as f32 + 1e-6);
        assert!(peak > 0.1);
    }

    #[test]
    fn test_envelope() {
        assert!((DecayingSine::gain_at(0.0) - INITIAL_GAIN).abs() < 1e-12);
        assert!((DecayingSine::gain_at(2.0) - FINAL_GAIN).abs() < 1e-15);
        assert!(DecayingSine::gain_at(1.0) < DecayingSine::gain_at(0.5));
        assert_eq!(DecayingSine::gain_at(10.0), DecayingSine::gain_at(2.0));
    }

    #[test]
    fn test_source_format() {
        let tone = DecayingSine::new(440.0);
        assert_eq!(tone.channels(), 1);
        assert_eq!(tone.sample_rate(), SAMPLE_RATE);
        assert_eq!(tone.total_duration(), Some(TONE_DURATION));
    }

    #[test]
    fn test_muted_engine_accepts_triggers() {
        let mut engine = ToneEngine::muted();
        assert!(engine.is_muted());
        assert!(engine.trigger(440.0).is_ok());
    }
}
