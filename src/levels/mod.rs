//! Salon level definitions.
//!
//! Each playable level is a haircut the player has to reproduce: a coverage
//! target (fraction of the canvas that should end up painted), a tolerance band
//! around it, the copy shown on the intro card and the SVG outline used for the
//! dashed guide. Definitions live in one file per level.

use serde::{Deserialize, Serialize};

mod level1;
mod level2;
mod level3;

pub use level1::LEVEL1;
pub use level2::LEVEL2;
pub use level3::LEVEL3;

/// Where the session currently is. `Jumpscare` and `Success` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[serde(rename = "LEVEL_3")]
    Level3,
    #[serde(rename = "JUMPSCARE")]
    Jumpscare,
    #[serde(rename = "SUCCESS")]
    Success,
}

impl Level {
    pub fn is_terminal(self) -> bool {
        matches!(self, Level::Jumpscare | Level::Success)
    }

    /// 0-based index into the playable level table.
    pub fn index(self) -> Option<usize> {
        match self {
            Level::Level1 => Some(0),
            Level::Level2 => Some(1),
            Level::Level3 => Some(2),
            Level::Jumpscare | Level::Success => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Level1 => "LEVEL_1",
            Level::Level2 => "LEVEL_2",
            Level::Level3 => "LEVEL_3",
            Level::Jumpscare => "JUMPSCARE",
            Level::Success => "SUCCESS",
        }
    }

    /// Static definition for a playable level.
    pub fn desc(self) -> Option<&'static LevelDesc> {
        self.index().map(|i| levels()[i])
    }
}

/// Coverage goal for one level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelTarget {
    pub target_ratio: f64,
    pub tolerance: f64,
}

impl LevelTarget {
    pub const fn new(target_ratio: f64, tolerance: f64) -> Self {
        Self {
            target_ratio,
            tolerance,
        }
    }
}

/// Used when asked to score a level that has no haircut (the endings).
pub const FALLBACK_TARGET: LevelTarget = LevelTarget::new(0.20, 0.08);

/// Intro card copy; corrupted runs get a darker variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelBrief {
    pub name: &'static str,
    pub description: &'static str,
}

/// Level descriptor (immutable).
#[derive(Debug)]
pub struct LevelDesc {
    pub level: Level,
    pub target: LevelTarget,
    pub brief: LevelBrief,
    pub corrupted_brief: LevelBrief,
    /// Outline in a 220x300 viewbox.
    pub guide_path: &'static str,
}

impl LevelDesc {
    pub fn brief(&self, corrupted: bool) -> LevelBrief {
        if corrupted {
            self.corrupted_brief
        } else {
            self.brief
        }
    }
}

pub fn levels() -> [&'static LevelDesc; 3] {
    [&LEVEL1, &LEVEL2, &LEVEL3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_levels() {
        for (i, desc) in levels().iter().enumerate() {
            assert_eq!(desc.level.index(), Some(i));
            assert!(desc.target.tolerance > 0.0);
            assert!(desc.guide_path.starts_with('M') && desc.guide_path.ends_with('Z'));
        }
        assert_eq!(LEVEL2.target, LevelTarget::new(0.12, 0.05));
        assert!(Level::Success.desc().is_none());
    }

    #[test]
    fn test_json_name_matches_display_name() {
        for level in [
            Level::Level1,
            Level::Level2,
            Level::Level3,
            Level::Jumpscare,
            Level::Success,
        ] {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.name()));
            assert_eq!(serde_json::from_str::<Level>(&json).unwrap(), level);
        }
    }

    #[test]
    fn test_briefs_switch_on_corruption() {
        assert_eq!(LEVEL3.brief(false).name, "Avant-Garde Spike");
        assert_eq!(LEVEL3.brief(true).name, "FINAL CHANCE");
    }
}
