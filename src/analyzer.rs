//! Coverage scoring.
//!
//! The score is a deliberately crude proxy: it only looks at *how much* of the
//! canvas is painted, never *where*. A fill ratio anywhere inside the level's
//! tolerance band earns full marks; outside it the score falls off linearly,
//! 50 points per 0.1 of excess deviation.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::levels::LevelTarget;
use crate::surface::RasterSurface;

// Absorbs f64 rounding at exact band edges (0.12 + 0.05 != 0.17).
const SCORE_EPSILON: f64 = 1e-9;
const FALLOFF_PER_UNIT: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreResult {
    pub fill_ratio: f64,
    pub score: u8,
}

impl ScoreResult {
    /// "Cannot score yet". Not the same as a definite fail.
    pub const UNAVAILABLE: ScoreResult = ScoreResult {
        fill_ratio: 0.0,
        score: 0,
    };
}

/// Face the character pulls while the player works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Happy,
    Neutral,
    Sad,
    /// Reserved for the presentation; no score maps to it.
    Scared,
}

/// Score for a fill ratio against a level target.
pub fn score_for_ratio(fill_ratio: f64, target: LevelTarget) -> u8 {
    let diff = (fill_ratio - target.target_ratio).abs();
    if diff <= target.tolerance + SCORE_EPSILON {
        return 100;
    }
    let error = diff - target.tolerance;
    let raw = (100.0 - error * FALLOFF_PER_UNIT).max(0.0);
    (raw + SCORE_EPSILON).floor().min(100.0) as u8
}

#[derive(Clone, Copy, Debug)]
pub struct CoverageAnalyzer {
    alpha_threshold: u8,
    happy_above: u8,
    sad_below: u8,
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl CoverageAnalyzer {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            alpha_threshold: config.alpha_threshold,
            happy_above: config.happy_above,
            sad_below: config.sad_below,
        }
    }

    /// Scan the whole surface and score it. A missing or unreadable surface
    /// yields [`ScoreResult::UNAVAILABLE`] instead of an error.
    pub fn score(&self, surface: Option<&RasterSurface>, target: LevelTarget) -> ScoreResult {
        let Some(surface) = surface else {
            log::debug!("score requested before the surface exists");
            return ScoreResult::UNAVAILABLE;
        };
        let covered = match surface.covered_pixels(self.alpha_threshold) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("analysis failed: {e}");
                return ScoreResult::UNAVAILABLE;
            }
        };
        let fill_ratio = covered as f64 / surface.pixel_count() as f64;
        ScoreResult {
            fill_ratio,
            score: score_for_ratio(fill_ratio, target),
        }
    }

    pub fn sentiment(&self, score: u8) -> Sentiment {
        if score > self.happy_above {
            Sentiment::Happy
        } else if score < self.sad_below {
            Sentiment::Sad
        } else {
            Sentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{LEVEL1, LEVEL2, LEVEL3};

    // Surface of `total` pixels in one row with the first `covered` opaque.
    fn row_surface(total: u32, covered: usize) -> RasterSurface {
        let mut px = vec![0u8; total as usize * 4];
        for i in 0..covered {
            px[i * 4 + 3] = 255;
        }
        RasterSurface::from_rgba(total, 1, px).unwrap()
    }

    #[test]
    fn test_band_edges_score_full() {
        let a = CoverageAnalyzer::default();
        // 0.12 +/- 0.05 on a 1000 pixel surface.
        assert_eq!(a.score(Some(&row_surface(1000, 170)), LEVEL2.target).score, 100);
        assert_eq!(a.score(Some(&row_surface(1000, 70)), LEVEL2.target).score, 100);
        assert_eq!(score_for_ratio(0.30, LEVEL1.target), 100);
        assert_eq!(score_for_ratio(0.14, LEVEL1.target), 100);
        assert_eq!(score_for_ratio(0.47, LEVEL3.target), 100);
    }

    #[test]
    fn test_just_outside_band() {
        let a = CoverageAnalyzer::default();
        let r = a.score(Some(&row_surface(1000, 171)), LEVEL2.target);
        assert!((r.fill_ratio - 0.171).abs() < 1e-12);
        assert_eq!(r.score, 99);
    }

    #[test]
    fn test_falloff_is_monotonic_and_floored_at_zero() {
        let mut last = 100;
        for step in 0..=100 {
            let fill = LEVEL1.target.target_ratio + step as f64 * 0.01;
            let s = score_for_ratio(fill.min(1.0), LEVEL1.target);
            assert!(s <= last, "score rose at fill {fill}");
            last = s;
        }
        assert_eq!(score_for_ratio(1.0, LEVEL1.target), 0);
    }

    #[test]
    fn test_empty_surface_scores() {
        let a = CoverageAnalyzer::default();
        let empty = RasterSurface::new(30, 20).unwrap();
        assert_eq!(a.score(Some(&empty), LEVEL1.target).score, 30);
        assert_eq!(a.score(Some(&empty), LEVEL2.target).score, 65);
        assert_eq!(a.score(Some(&empty), LEVEL3.target).score, 0);
        assert_eq!(a.score(Some(&empty), LEVEL3.target).fill_ratio, 0.0);
    }

    #[test]
    fn test_missing_surface_is_unavailable() {
        let a = CoverageAnalyzer::default();
        assert_eq!(a.score(None, LEVEL1.target), ScoreResult::UNAVAILABLE);
    }

    #[test]
    fn test_unreadable_surface_is_unavailable() {
        let a = CoverageAnalyzer::default();
        let broken = RasterSurface::from_raw_parts(30, 20, vec![255; 16]);
        assert_eq!(a.score(Some(&broken), LEVEL1.target), ScoreResult::UNAVAILABLE);
    }

    #[test]
    fn test_sentiment_mapping() {
        let a = CoverageAnalyzer::default();
        assert_eq!(a.sentiment(100), Sentiment::Happy);
        assert_eq!(a.sentiment(71), Sentiment::Happy);
        assert_eq!(a.sentiment(70), Sentiment::Neutral);
        assert_eq!(a.sentiment(30), Sentiment::Neutral);
        assert_eq!(a.sentiment(29), Sentiment::Sad);
        assert_eq!(a.sentiment(0), Sentiment::Sad);
    }
}
