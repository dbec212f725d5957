//! Level progression.
//!
//! Three haircuts, then one of two endings. Levels 1 and 2 always move on; a
//! failed cut only marks the run as corrupted and counts a bad attempt. The
//! ending is decided when level 3 is confirmed:
//!
//! - two or more bad attempts anywhere, or a failed final cut → `Jumpscare`
//! - otherwise → `Success`, even if an earlier level corrupted the run
//!
//! [`advance`] is a pure function over [`LevelProgress`]; the session applies
//! the result and fires the side effects (clear, notifications).

use serde::Serialize;

use crate::config::GameConfig;
use crate::levels::{Level, LevelBrief};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: Level,
    /// Sticky once set; only a full reset clears it.
    pub corrupted: bool,
    pub bad_attempts: u32,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            level: Level::Level1,
            corrupted: false,
            bad_attempts: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressionRules {
    pub pass_threshold: u8,
    pub jumpscare_bad_attempts: u32,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl ProgressionRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            pass_threshold: config.pass_threshold,
            jumpscare_bad_attempts: config.jumpscare_bad_attempts,
        }
    }

    pub fn passes(&self, score: u8) -> bool {
        score > self.pass_threshold
    }
}

/// Outcome of one "done" confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Level,
    pub passed: bool,
    pub progress: LevelProgress,
}

impl Transition {
    /// False when the confirmation arrived in a terminal state and nothing moved.
    pub fn changed(&self) -> bool {
        self.from != self.progress.level
    }

    pub fn to(&self) -> Level {
        self.progress.level
    }
}

pub fn advance(progress: LevelProgress, score: u8, rules: &ProgressionRules) -> Transition {
    let from = progress.level;
    let passed = rules.passes(score);
    if from.is_terminal() {
        return Transition {
            from,
            passed,
            progress,
        };
    }

    let mut next = progress;
    if !passed {
        next.corrupted = true;
        next.bad_attempts += 1;
    }
    next.level = match from {
        Level::Level1 => Level::Level2,
        Level::Level2 => Level::Level3,
        Level::Level3 => {
            if next.bad_attempts >= rules.jumpscare_bad_attempts || (next.corrupted && !passed) {
                Level::Jumpscare
            } else {
                Level::Success
            }
        }
        Level::Jumpscare | Level::Success => unreachable!("terminal levels return early"),
    };
    Transition {
        from,
        passed,
        progress: next,
    }
}

/// Read-only projection handed to the presentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelView {
    pub level: Level,
    pub corrupted: bool,
    pub bad_attempts: u32,
    /// `None` on the endings.
    pub brief: Option<LevelBrief>,
    pub guide_path: Option<&'static str>,
}

impl From<LevelProgress> for LevelView {
    fn from(p: LevelProgress) -> Self {
        let desc = p.level.desc();
        Self {
            level: p.level,
            corrupted: p.corrupted,
            bad_attempts: p.bad_attempts,
            brief: desc.map(|d| d.brief(p.corrupted)),
            guide_path: desc.map(|d| d.guide_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scores: &[u8]) -> LevelProgress {
        let rules = ProgressionRules::default();
        scores
            .iter()
            .fold(LevelProgress::default(), |p, s| advance(p, *s, &rules).progress)
    }

    #[test]
    fn test_pass_threshold_is_strict() {
        let rules = ProgressionRules::default();
        let start = LevelProgress::default();
        assert!(!advance(start, 50, &rules).passed);
        assert!(advance(start, 51, &rules).passed);
    }

    #[test]
    fn test_early_levels_never_gate() {
        let p = run(&[0]);
        assert_eq!(p.level, Level::Level2);
        assert!(p.corrupted);
        assert_eq!(p.bad_attempts, 1);
        let p = run(&[0, 0]);
        assert_eq!(p.level, Level::Level3);
        assert_eq!(p.bad_attempts, 2);
    }

    #[test]
    fn test_corruption_is_sticky() {
        let p = run(&[0, 100]);
        assert!(p.corrupted);
        assert_eq!(p.bad_attempts, 1);
    }

    #[test]
    fn test_two_failures_anywhere_are_fatal() {
        assert_eq!(run(&[0, 100, 0]).level, Level::Jumpscare);
        assert_eq!(run(&[100, 0, 0]).level, Level::Jumpscare);
        assert_eq!(run(&[0, 0, 100]).level, Level::Jumpscare);
    }

    #[test]
    fn test_terminal_is_inert() {
        let rules = ProgressionRules::default();
        let end = run(&[100, 100, 100]);
        assert_eq!(end.level, Level::Success);
        let t = advance(end, 0, &rules);
        assert!(!t.changed());
        assert_eq!(t.progress, end);
    }

    #[test]
    fn test_view_projection() {
        let v = LevelView::from(run(&[0]));
        assert_eq!(v.level, Level::Level2);
        assert_eq!(v.brief.map(|b| b.name), Some("Correction"));
        assert!(v.guide_path.is_some());
        let v = LevelView::from(run(&[100, 100, 100]));
        assert!(v.brief.is_none());
    }
}
