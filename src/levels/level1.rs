// Level 1: the classic bob, a medium amount of hair.
use super::{Level, LevelBrief, LevelDesc, LevelTarget};

pub static LEVEL1: LevelDesc = LevelDesc {
    level: Level::Level1,
    target: LevelTarget::new(0.22, 0.08),
    brief: LevelBrief {
        name: "The Classic Bob",
        description: "A cute, round style. Keep it neat!",
    },
    corrupted_brief: LevelBrief {
        name: "The Beginning",
        description: "Just a simple cut. Do not mess this up.",
    },
    guide_path: "M 45 100 C 30 150, 40 210, 50 220 L 170 220 C 180 210, 190 150, 175 100 C 170 80, 50 80, 45 100 Z",
};
