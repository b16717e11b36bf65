//! Key tilt animation.
//!
//! Every key rotates about the x axis of its pivot. A tween moves that
//! rotation linearly to a target over a fixed duration and is advanced once
//! per tick. Requests are fire-and-forget: a new request for a key simply
//! replaces the one in flight, starting from wherever the key is now.

use super::KeyRef;
use crate::piano::TiltAnimator;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Rotation state for every key on the stage.
#[derive(Debug, Default)]
pub struct TweenBank {
    /// Resting rotation of keys with no tween in flight.
    settled: HashMap<KeyRef, f64>,
    active: HashMap<KeyRef, Tween>,
}

impl TweenBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rotation of a key, in radians. Keys never animated rest at 0.
    pub fn rotation_of(&self, target: KeyRef) -> f64 {
        match self.active.get(&target) {
            Some(tween) => tween.value(),
            None => self.settled.get(&target).copied().unwrap_or(0.0),
        }
    }

    /// Steps every in-flight tween forward by `dt`.
    ///
    /// Finished tweens snap to their target and are retired.
    pub fn advance(&mut self, dt: Duration) {
        let mut finished = Vec::new();
        for (target, tween) in self.active.iter_mut() {
            tween.elapsed = tween.elapsed.saturating_add(dt);
            if tween.is_finished() {
                finished.push(*target);
            }
        }
        for target in finished {
            if let Some(tween) = self.active.remove(&target) {
                if tween.to == 0.0 {
                    self.settled.remove(&target);
                } else {
                    self.settled.insert(target, tween.to);
                }
            }
        }
    }

    /// Number of tweens still running.
    pub fn in_flight(&self) -> usize {
        self.active.len()
    }

    pub fn is_animating(&self, target: KeyRef) -> bool {
        self.active.contains_key(&target)
    }
}

impl TiltAnimator for TweenBank {
    fn animate(&mut self, target: KeyRef, rotation: f64, duration: Duration) {
        let from = self.rotation_of(target);
        self.settled.remove(&target);
        self.active.insert(
            target,
            Tween {
                from,
                to: rotation,
                duration,
                elapsed: Duration::ZERO,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: KeyRef = KeyRef::new(0, 3);

    #[test]
    fn test_tween_reaches_target() {
        let mut bank = TweenBank::new();
        bank.animate(KEY, 0.1, Duration::from_millis(100));
        assert_eq!(bank.rotation_of(KEY), 0.0);

        bank.advance(Duration::from_millis(50));
        assert!((bank.rotation_of(KEY) - 0.05).abs() < 1e-12);

        bank.advance(Duration::from_millis(60));
        assert_eq!(bank.rotation_of(KEY), 0.1);
        assert_eq!(bank.in_flight(), 0);
    }

    #[test]
    fn test_new_request_supersedes() {
        let mut bank = TweenBank::new();
        bank.animate(KEY, 0.1, Duration::from_millis(100));
        bank.advance(Duration::from_millis(50));

        // Reverse halfway: starts from the current value, not from 0.1.
        bank.animate(KEY, 0.0, Duration::from_millis(100));
        assert!((bank.rotation_of(KEY) - 0.05).abs() < 1e-12);
        assert_eq!(bank.in_flight(), 1);

        bank.advance(Duration::from_millis(100));
        assert_eq!(bank.rotation_of(KEY), 0.0);
        assert!(!bank.is_animating(KEY));
    }

    #[test]
    fn test_keys_animate_independently() {
        let other = KeyRef::new(1, 3);
        let mut bank = TweenBank::new();
        bank.animate(KEY, 0.1, Duration::from_millis(100));
        bank.advance(Duration::from_millis(50));
        bank.animate(other, 0.1, Duration::from_millis(100));
        bank.advance(Duration::from_millis(50));

        assert_eq!(bank.rotation_of(KEY), 0.1);
        assert!((bank.rotation_of(other) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_duration() {
        let mut bank = TweenBank::new();
        bank.animate(KEY, 0.2, Duration::ZERO);
        assert_eq!(bank.rotation_of(KEY), 0.2);
        bank.advance(Duration::ZERO);
        assert_eq!(bank.rotation_of(KEY), 0.2);
        assert_eq!(bank.in_flight(), 0);
    }
}
