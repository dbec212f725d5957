// Level 3: spiky avant-garde. Lots of hair, forgiving band.
use super::{Level, LevelBrief, LevelDesc, LevelTarget};

pub static LEVEL3: LevelDesc = LevelDesc {
    level: Level::Level3,
    target: LevelTarget::new(0.35, 0.12),
    brief: LevelBrief {
        name: "Avant-Garde Spike",
        description: "Something bold and daring! Go wild!",
    },
    corrupted_brief: LevelBrief {
        name: "FINAL CHANCE",
        description: "MAKE IT PERFECT OR ELSE.",
    },
    guide_path: "M 50 160 L 40 120 L 60 130 L 70 80 L 100 120 L 120 60 L 140 120 L 170 90 L 160 140 L 180 160 L 160 180 C 160 180, 130 160, 60 180 Z",
};
