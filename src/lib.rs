//! Lovely Cuts core crate.
//!
//! The player paints a hairstyle over a salon client; the canvas coverage is
//! scored against the level's haircut and three confirmations later the run
//! ends in either a happy reveal or a jumpscare.
//!
//! Everything outside `web` is plain Rust with no browser dependency, so the
//! drawing, scoring and progression logic is tested natively with `cargo test`.
//! The `web` module mounts a [`GameSession`] on a `<canvas>` and exposes the
//! controls to JavaScript.

use wasm_bindgen::prelude::*;

pub mod analyzer;
pub mod audio;
pub mod brush;
pub mod config;
pub mod error;
pub mod levels;
mod logging;
pub mod mood;
pub mod progression;
pub mod session;
pub mod surface;
pub mod tracker;
mod web;

pub use analyzer::{CoverageAnalyzer, ScoreResult, Sentiment, score_for_ratio};
pub use audio::{AudioService, SilentAudio};
pub use brush::{BRUSH_SIZES, BrushSettings, Rgb, SALON_COLORS, Tool};
pub use config::GameConfig;
pub use error::{Error, Result};
pub use levels::{Level, LevelTarget};
pub use progression::{LevelProgress, LevelView, ProgressionRules, Transition, advance};
pub use session::{GameSession, NullPresenter, Presenter};
pub use surface::{Point, RasterSurface};
pub use tracker::{PointerSample, PointerState, StrokeTracker, SurfaceRect};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}
