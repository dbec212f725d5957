//! Session-start configuration.
//!
//! Everything here is fixed for the lifetime of a session. The browser runtime
//! accepts an optional JSON override at `start_game`; any field left out keeps
//! its default.

use serde::{Deserialize, Serialize};

use crate::brush::BrushSettings;
use crate::error::{Error, Result};
use crate::levels::{FALLBACK_TARGET, Level, LevelTarget, levels};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    /// Coverage targets for levels 1..=3.
    pub targets: [LevelTarget; 3],
    /// A confirmation passes when the score is strictly above this.
    pub pass_threshold: u8,
    /// Bad attempts that force the jumpscare ending on level 3.
    pub jumpscare_bad_attempts: u32,
    /// Alpha values at or below this are treated as unpainted noise.
    pub alpha_threshold: u8,
    pub mood_cadence_ms: u32,
    /// Scores above this read as happy.
    pub happy_above: u8,
    /// Scores below this read as sad.
    pub sad_below: u8,
    pub default_brush: BrushSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        let [l1, l2, l3] = levels();
        Self {
            surface_width: 450,
            surface_height: 600,
            targets: [l1.target, l2.target, l3.target],
            pass_threshold: 50,
            jumpscare_bad_attempts: 2,
            alpha_threshold: 10,
            mood_cadence_ms: 500,
            happy_above: 70,
            sad_below: 30,
            default_brush: BrushSettings::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.surface_width == 0 || self.surface_height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.surface_width,
                height: self.surface_height,
            });
        }
        for (i, t) in self.targets.iter().enumerate() {
            if !(0.0..=1.0).contains(&t.target_ratio) {
                return Err(Error::Config(format!(
                    "level {} target ratio {} outside [0, 1]",
                    i + 1,
                    t.target_ratio
                )));
            }
            if !(t.tolerance >= 0.0) {
                return Err(Error::Config(format!(
                    "level {} tolerance {} is negative",
                    i + 1,
                    t.tolerance
                )));
            }
        }
        if self.pass_threshold > 100 {
            return Err(Error::Config(format!(
                "pass threshold {} above 100",
                self.pass_threshold
            )));
        }
        if self.sad_below > self.happy_above {
            return Err(Error::Config(format!(
                "sad_below {} above happy_above {}",
                self.sad_below, self.happy_above
            )));
        }
        if self.default_brush.size == 0 {
            return Err(Error::Config("default brush size is zero".to_string()));
        }
        if self.mood_cadence_ms == 0 {
            return Err(Error::Config("mood cadence is zero".to_string()));
        }
        Ok(())
    }

    pub fn target_for(&self, level: Level) -> LevelTarget {
        level
            .index()
            .map(|i| self.targets[i])
            .unwrap_or(FALLBACK_TARGET)
    }
}
