// Level 2: the pixie cut. Least hair of the three and the tightest band.
use super::{Level, LevelBrief, LevelDesc, LevelTarget};

pub static LEVEL2: LevelDesc = LevelDesc {
    level: Level::Level2,
    target: LevelTarget::new(0.12, 0.05),
    brief: LevelBrief {
        name: "The Pixie Cut",
        description: "Short, sharp, and stylish. Keep it tight!",
    },
    corrupted_brief: LevelBrief {
        name: "Correction",
        description: "Fix your mistake. She is waiting.",
    },
    guide_path: "M 45 120 C 45 60, 155 60, 155 120 C 155 145, 140 155, 100 155 C 60 155, 45 145, 45 120 Z",
};
