// Invariants over the static game data: level table, palette and presets.
// Native-friendly; no wasm or browser APIs.

use std::collections::HashSet;

use lovely_cuts::levels::levels;
use lovely_cuts::{
    BRUSH_SIZES, GameConfig, Level, LevelProgress, ProgressionRules, Rgb, SALON_COLORS, advance,
};

#[test]
fn level_table_is_ordered_and_sane() {
    let table = levels();
    let order = [Level::Level1, Level::Level2, Level::Level3];
    let mut names = HashSet::new();
    for (desc, level) in table.iter().zip(order) {
        assert_eq!(desc.level, level);
        assert_eq!(level.desc().map(|d| d.level), Some(level));
        let t = desc.target;
        assert!(
            t.tolerance > 0.0 && t.tolerance < t.target_ratio,
            "tolerance {} for {:?} should be positive and below the target",
            t.tolerance,
            level
        );
        assert!(t.target_ratio + t.tolerance <= 1.0);
        for brief in [desc.brief, desc.corrupted_brief] {
            assert!(names.insert(brief.name), "duplicate level name '{}'", brief.name);
            assert!(!brief.description.is_empty());
        }
        assert!(desc.guide_path.starts_with('M'));
        assert!(desc.guide_path.trim_end().ends_with('Z'));
    }
    assert!(Level::Jumpscare.desc().is_none());
    assert!(Level::Success.desc().is_none());
}

#[test]
fn palette_colors_are_distinct_and_round_trip_hex() {
    let mut seen = HashSet::new();
    for c in SALON_COLORS {
        assert!(seen.insert(c.to_hex()), "duplicate dye {}", c.to_hex());
        assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
    }
    assert!(SALON_COLORS.contains(&GameConfig::default().default_brush.color));
}

#[test]
fn brush_sizes_are_ascending() {
    assert!(BRUSH_SIZES.windows(2).all(|w| w[0] < w[1]));
    // The default brush sits between the presets rather than on one.
    let size = GameConfig::default().default_brush.size;
    assert!(BRUSH_SIZES[0] < size && size < BRUSH_SIZES[3]);
}

#[test]
fn ending_matrix() {
    let rules = ProgressionRules::default();
    let cases: [([u8; 3], Level); 5] = [
        ([100, 100, 100], Level::Success),
        ([0, 100, 100], Level::Success),
        ([100, 0, 100], Level::Success),
        ([0, 0, 100], Level::Jumpscare),
        ([100, 100, 0], Level::Jumpscare),
    ];
    for (scores, ending) in cases {
        let mut p = LevelProgress::default();
        for score in scores {
            p = advance(p, score, &rules).progress;
        }
        assert_eq!(p.level, ending, "scores {scores:?}");
    }
}

#[test]
fn config_json_overrides_only_named_fields() {
    let cfg = GameConfig::from_json(r#"{"surface_width": 300, "pass_threshold": 60}"#).unwrap();
    assert_eq!(cfg.surface_width, 300);
    assert_eq!(cfg.pass_threshold, 60);
    assert_eq!(cfg.surface_height, GameConfig::default().surface_height);
    assert_eq!(cfg.targets, GameConfig::default().targets);

    assert!(GameConfig::from_json(r#"{"surface_width": 0}"#).is_err());
    assert!(GameConfig::from_json("not json").is_err());
}
