//! Stage configuration.
//!
//! Describes which keyboards exist and where they sit. The only per-keyboard
//! settings are its key count and lowest note; tuning and naming are fixed.

use crate::error::{ChordanoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One keyboard on the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Number of keys. Must be at least 1.
    pub key_count: usize,

    /// Chromatic index of the leftmost key (0 = C0, 21 = A0).
    pub lowest_note: i32,

    /// World position of the keyboard root, in meters.
    #[serde(default)]
    pub root: [f64; 3],
}

/// All keyboards in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub keyboards: Vec<KeyboardConfig>,
}

impl Default for StageConfig {
    /// A full 88-key piano with a 52-key upper manual raised behind it.
    fn default() -> Self {
        Self {
            keyboards: vec![
                KeyboardConfig {
                    key_count: 88,
                    lowest_note: 21,
                    root: [0.0, 0.0, 0.0],
                },
                KeyboardConfig {
                    key_count: 52,
                    lowest_note: 45,
                    root: [0.0, 0.040, -0.150],
                },
            ],
        }
    }
}

impl StageConfig {
    /// Checks the configuration before anything is built.
    ///
    /// # Errors
    ///
    /// Returns error if there are no keyboards or any keyboard has no keys.
    pub fn validate(&self) -> Result<()> {
        if self.keyboards.is_empty() {
            return Err(ChordanoError::InvalidConfig(
                "at least one keyboard is required".into(),
            ));
        }
        for (i, keyboard) in self.keyboards.iter().enumerate() {
            if keyboard.key_count == 0 {
                return Err(ChordanoError::InvalidConfig(format!(
                    "keyboard {} has a key count of 0",
                    i
                )));
            }
            if keyboard.root.iter().any(|c| !c.is_finite()) {
                return Err(ChordanoError::InvalidConfig(format!(
                    "keyboard {} has a non-finite root position",
                    i
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the configuration to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, cannot be parsed, or
    /// describes an invalid stage
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        Ok(config)
    }
}
