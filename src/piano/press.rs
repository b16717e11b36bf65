//! Press/release state machine.
//!
//! Each key cycles `Released -> Pressed -> Released` for its whole life.
//! A press plays the key's pitch and tilts the key down; a release tilts it
//! back. Sound and animation are handed to injected collaborators so the
//! state machine owns no global audio or scene handles.

use super::keyboard::{Key, PressState};
use super::note::frequency_of;
use super::{KEY_PRESS_ROTATION, KEY_TILT_DURATION};
use crate::error::Result;
use crate::scene::KeyRef;
use std::time::Duration;

/// Receives a frequency and starts a self-decaying tone.
pub trait AudioSink {
    /// Starts a tone at `frequency` Hz. The sink owns the envelope; the
    /// caller never stops it.
    fn trigger(&mut self, frequency: f64) -> Result<()>;
}

/// Animates a key's tilt about its pivot.
pub trait TiltAnimator {
    /// Requests a rotation of `target` towards `rotation` radians over
    /// `duration`. A later request for the same key supersedes this one.
    fn animate(&mut self, target: KeyRef, rotation: f64, duration: Duration);
}

/// What a press or release signal did to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The key went from released to pressed.
    Pressed,
    /// The key went from pressed to released.
    Released,
    /// The key was already in the requested state; nothing fired.
    Ignored,
}

/// Drives key state transitions and their side effects.
///
/// A press on a key that is already down is ignored: it neither retriggers
/// the tone nor restarts the tilt.
pub struct PressController<A, T> {
    audio: A,
    animator: T,
}

impl<A: AudioSink, T: TiltAnimator> PressController<A, T> {
    pub fn new(audio: A, animator: T) -> Self {
        Self { audio, animator }
    }

    /// Handles a press-start signal for `key`.
    ///
    /// # Arguments
    ///
    /// * `target` - Stage address of the key, used to aim the tilt animation
    /// * `key` - The key being pressed
    ///
    /// # Returns
    ///
    /// `Pressed` on a transition, `Ignored` if the key was already down
    pub fn press(&mut self, target: KeyRef, key: &mut Key) -> PressOutcome {
        if key.state() == PressState::Pressed {
            tracing::debug!("Key {} already pressed, ignoring", key.note());
            return PressOutcome::Ignored;
        }

        key.set_state(PressState::Pressed);
        let frequency = frequency_of(key.note());
        tracing::debug!("Pressing {} ({:.2} Hz)", key.note(), frequency);

        if let Err(e) = self.audio.trigger(frequency) {
            // A lost note must not take down the update loop.
            tracing::warn!("Failed to play {}: {}", key.note(), e);
        }
        self.animator
            .animate(target, KEY_PRESS_ROTATION, KEY_TILT_DURATION);

        PressOutcome::Pressed
    }

    /// Handles a release signal for `key`.
    ///
    /// Returns `Released` on a transition, `Ignored` if the key was already up.
    pub fn release(&mut self, target: KeyRef, key: &mut Key) -> PressOutcome {
        if key.state() == PressState::Released {
            return PressOutcome::Ignored;
        }

        key.set_state(PressState::Released);
        tracing::debug!("Releasing {}", key.note());
        self.animator.animate(target, 0.0, KEY_TILT_DURATION);

        PressOutcome::Released
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn animator(&self) -> &T {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut T {
        &mut self.animator
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ChordanoError;
    use crate::piano::{Keyboard, Note};

    /// Audio sink that records every frequency it is asked to play.
    #[derive(Default)]
    pub(crate) struct RecordingAudio {
        pub triggers: Vec<f64>,
        pub fail: bool,
    }

    impl AudioSink for RecordingAudio {
        fn trigger(&mut self, frequency: f64) -> Result<()> {
            if self.fail {
                return Err(ChordanoError::Audio("no device".into()));
            }
            self.triggers.push(frequency);
            Ok(())
        }
    }

    /// Animator that records every tilt request.
    #[derive(Default)]
    pub(crate) struct RecordingAnimator {
        pub requests: Vec<(KeyRef, f64, Duration)>,
    }

    impl TiltAnimator for RecordingAnimator {
        fn animate(&mut self, target: KeyRef, rotation: f64, duration: Duration) {
            self.requests.push((target, rotation, duration));
        }
    }

    fn controller() -> PressController<RecordingAudio, RecordingAnimator> {
        PressController::new(RecordingAudio::default(), RecordingAnimator::default())
    }

    #[test]
    fn test_press_release_cycle() {
        let mut piano = Keyboard::new(88, Note::new(21)).unwrap();
        let mut presses = controller();
        let target = KeyRef::new(0, 36);
        let key = piano.key_at_mut(36).unwrap();
        assert_eq!(key.note(), Note::new(57));

        assert_eq!(presses.press(target, key), PressOutcome::Pressed);
        assert_eq!(key.state(), PressState::Pressed);
        assert_eq!(presses.audio().triggers, vec![440.0]);
        assert_eq!(
            presses.animator().requests,
            vec![(target, KEY_PRESS_ROTATION, KEY_TILT_DURATION)]
        );

        // Redundant press: no new sound, no new tilt.
        assert_eq!(presses.press(target, key), PressOutcome::Ignored);
        assert_eq!(presses.audio().triggers.len(), 1);
        assert_eq!(presses.animator().requests.len(), 1);

        assert_eq!(presses.release(target, key), PressOutcome::Released);
        assert_eq!(key.state(), PressState::Released);
        assert_eq!(presses.audio().triggers.len(), 1);
        assert_eq!(presses.animator().requests.len(), 2);
        assert_eq!(presses.animator().requests[1], (target, 0.0, KEY_TILT_DURATION));
    }

    #[test]
    fn test_release_when_released_is_ignored() {
        let mut piano = Keyboard::new(12, Note::new(48)).unwrap();
        let mut presses = controller();
        let key = piano.key_at_mut(0).unwrap();
        assert_eq!(presses.release(KeyRef::new(0, 0), key), PressOutcome::Ignored);
        assert!(presses.animator().requests.is_empty());
    }

    #[test]
    fn test_repress_after_release_plays_again() {
        let mut piano = Keyboard::new(12, Note::new(48)).unwrap();
        let mut presses = controller();
        let target = KeyRef::new(0, 4);
        let key = piano.key_at_mut(4).unwrap();
        presses.press(target, key);
        presses.release(target, key);
        presses.press(target, key);
        assert_eq!(presses.audio().triggers.len(), 2);
        assert_eq!(presses.animator().requests.len(), 3);
    }

    #[test]
    fn test_audio_failure_still_presses() {
        let mut piano = Keyboard::new(12, Note::new(48)).unwrap();
        let mut presses = PressController::new(
            RecordingAudio {
                fail: true,
                ..Default::default()
            },
            RecordingAnimator::default(),
        );
        let key = piano.key_at_mut(0).unwrap();
        assert_eq!(presses.press(KeyRef::new(0, 0), key), PressOutcome::Pressed);
        assert!(key.is_pressed());
        assert_eq!(presses.animator().requests.len(), 1);
    }
}
