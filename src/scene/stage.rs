//! Keyboards placed in world space.

use super::hit_test::Surface;
use super::tween::TweenBank;
use super::Vec3;
use crate::config::StageConfig;
use crate::error::Result;
use crate::piano::{Key, Keyboard, Note};

/// Address of one key on the stage: which keyboard, which key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyRef {
    pub keyboard: usize,
    pub key: usize,
}

impl KeyRef {
    pub const fn new(keyboard: usize, key: usize) -> Self {
        Self { keyboard, key }
    }
}

/// A keyboard and where its root sits in the world.
#[derive(Debug, Clone)]
pub struct PlacedKeyboard {
    pub root: Vec3,
    pub keyboard: Keyboard,
}

/// Every keyboard in the scene.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    keyboards: Vec<PlacedKeyboard>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every keyboard described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or any keyboard fails
    /// to build. Nothing is placed unless every keyboard builds.
    pub fn from_config(config: &StageConfig) -> Result<Self> {
        config.validate()?;
        let mut stage = Self::new();
        for entry in &config.keyboards {
            let keyboard = Keyboard::new(entry.key_count, Note::new(entry.lowest_note))?;
            stage.add(Vec3::from(entry.root), keyboard);
        }
        Ok(stage)
    }

    /// Places a keyboard with its root at `root` and returns its index.
    pub fn add(&mut self, root: Vec3, keyboard: Keyboard) -> usize {
        tracing::info!(
            "Placing {}-key keyboard from {} to {}",
            keyboard.key_count(),
            keyboard.lowest_note(),
            keyboard.highest_note()
        );
        self.keyboards.push(PlacedKeyboard { root, keyboard });
        self.keyboards.len() - 1
    }

    pub fn keyboards(&self) -> &[PlacedKeyboard] {
        &self.keyboards
    }

    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }

    pub fn key(&self, target: KeyRef) -> Option<&Key> {
        self.keyboards
            .get(target.keyboard)?
            .keyboard
            .key_at(target.key)
    }

    pub fn key_mut(&mut self, target: KeyRef) -> Option<&mut Key> {
        self.keyboards
            .get_mut(target.keyboard)?
            .keyboard
            .key_at_mut(target.key)
    }

    /// World position of a key's pivot.
    pub fn pivot_of(&self, target: KeyRef) -> Option<Vec3> {
        let placed = self.keyboards.get(target.keyboard)?;
        let key = placed.keyboard.key_at(target.key)?;
        Some(placed.root + key.offset())
    }

    /// Every key on the stage with its address.
    pub fn iter_keys(&self) -> impl Iterator<Item = (KeyRef, &Key)> + '_ {
        self.keyboards.iter().enumerate().flat_map(|(k, placed)| {
            placed
                .keyboard
                .keys()
                .iter()
                .enumerate()
                .map(move |(i, key)| (KeyRef::new(k, i), key))
        })
    }

    /// One tagged hit-test surface per key, posed at its current tilt.
    pub fn surfaces(&self, tweens: &TweenBank) -> Vec<Surface> {
        self.keyboards
            .iter()
            .enumerate()
            .flat_map(|(k, placed)| {
                placed.keyboard.keys().iter().enumerate().map(move |(i, key)| {
                    let target = KeyRef::new(k, i);
                    Surface {
                        pivot: placed.root + key.offset(),
                        rotation_x: tweens.rotation_of(target),
                        // The mesh hangs off its pivot by the negated pivot
                        // vector, which puts it back on its layout position.
                        center: -key.class().pivot(),
                        half_extents: key.dimensions() * 0.5,
                        owner: Some(target),
                    }
                })
            })
            .collect()
    }

    /// Axis-aligned world bounds `(min, max)` of all resting keys.
    ///
    /// Returns None for an empty stage.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for placed in &self.keyboards {
            for key in placed.keyboard.keys() {
                let center = placed.root + key.offset() - key.class().pivot();
                let half = key.dimensions() * 0.5;
                let (lo, hi) = (center - half, center + half);
                bounds = Some(match bounds {
                    None => (lo, hi),
                    Some((min, max)) => (
                        Vec3::new(min.x.min(lo.x), min.y.min(lo.y), min.z.min(lo.z)),
                        Vec3::new(max.x.max(hi.x), max.y.max(hi.y), max.z.max(hi.z)),
                    ),
                });
            }
        }
        bounds
    }
}
