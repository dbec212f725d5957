//! One play session: the surface, the brush, the tracker, the progression
//! state and the injected collaborators, glued together.
//!
//! `GameSession` is host-agnostic. The browser runtime feeds it input samples
//! and timer ticks; native tests drive it directly with recording
//! collaborators.

use crate::analyzer::{CoverageAnalyzer, ScoreResult, Sentiment};
use crate::audio::{Ambience, AudioService};
use crate::brush::{BrushSettings, Rgb, Tool};
use crate::config::GameConfig;
use crate::error::Result;
use crate::mood::MoodSchedule;
use crate::progression::{LevelProgress, LevelView, ProgressionRules, Transition, advance};
use crate::surface::RasterSurface;
use crate::tracker::{PointerSample, PointerState, StrokeTracker};

/// Receives everything the presentation layer renders from.
pub trait Presenter {
    fn pointer_changed(&mut self, state: PointerState);
    fn sentiment_changed(&mut self, sentiment: Sentiment);
    fn level_changed(&mut self, view: &LevelView);
    fn surface_cleared(&mut self);
}

/// Presenter that ignores everything.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn pointer_changed(&mut self, _state: PointerState) {}
    fn sentiment_changed(&mut self, _sentiment: Sentiment) {}
    fn level_changed(&mut self, _view: &LevelView) {}
    fn surface_cleared(&mut self) {}
}

pub struct GameSession {
    config: GameConfig,
    analyzer: CoverageAnalyzer,
    rules: ProgressionRules,
    surface: Option<RasterSurface>,
    brush: BrushSettings,
    progress: LevelProgress,
    tracker: StrokeTracker,
    mood: MoodSchedule,
    sentiment: Sentiment,
    // Last pointer state handed to the presenter.
    pointer: PointerState,
    ambience: Option<Ambience>,
    audio: Box<dyn AudioService>,
    presenter: Box<dyn Presenter>,
}

impl GameSession {
    /// Validate `config`, allocate the surface and announce level 1.
    pub fn new(
        config: GameConfig,
        audio: Box<dyn AudioService>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        config.validate()?;
        let surface = RasterSurface::new(config.surface_width, config.surface_height)?;
        let mut session = Self {
            analyzer: CoverageAnalyzer::from_config(&config),
            rules: ProgressionRules::from_config(&config),
            surface: Some(surface),
            brush: config.default_brush,
            progress: LevelProgress::default(),
            tracker: StrokeTracker::new(),
            mood: MoodSchedule::new(config.mood_cadence_ms),
            sentiment: Sentiment::Neutral,
            pointer: PointerState::REST,
            ambience: None,
            audio,
            presenter,
            config,
        };
        session.presenter.level_changed(&session.level_view());
        session.sync_ambience();
        log::info!(
            "session started on a {}x{} surface",
            session.config.surface_width,
            session.config.surface_height
        );
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progress(&self) -> LevelProgress {
        self.progress
    }

    pub fn level_view(&self) -> LevelView {
        LevelView::from(self.progress)
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn surface(&self) -> Option<&RasterSurface> {
        self.surface.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.tracker.is_active()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.surface_width, self.config.surface_height)
    }

    // --- Input ------------------------------------------------------------

    pub fn pointer_down(&mut self, sample: PointerSample, now_ms: f64) {
        let state = self.tracker.begin(
            self.surface.as_mut(),
            &self.brush,
            sample,
            self.audio.as_mut(),
        );
        if let Some(state) = state {
            self.mood.start(now_ms);
            self.report_pointer(state);
        }
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        if let Some(state) = self.tracker.extend(self.surface.as_mut(), &self.brush, sample) {
            self.report_pointer(state);
        }
    }

    /// Pointer up, pointer leave and touch end all land here. The pointer
    /// always returns to rest, hover included.
    pub fn pointer_up(&mut self) {
        let state = self.tracker.end(self.audio.as_mut());
        self.mood.stop();
        if self.pointer != state {
            self.report_pointer(state);
        }
    }

    /// Run the mood check if one is due. Returns the sentiment pushed, if any.
    pub fn poll_mood(&mut self, now_ms: f64) -> Option<Sentiment> {
        if !self.tracker.is_active() || !self.mood.due(now_ms) {
            return None;
        }
        let sentiment = self.analyzer.sentiment(self.calculate_score().score);
        self.sentiment = sentiment;
        self.presenter.sentiment_changed(sentiment);
        Some(sentiment)
    }

    pub fn mood_running(&self) -> bool {
        self.mood.is_running()
    }

    // --- Controls ---------------------------------------------------------

    pub fn set_color(&mut self, color: Rgb) {
        self.audio.play_click();
        self.brush = self.brush.with_dye(color);
    }

    pub fn set_size(&mut self, size: u32) {
        self.audio.play_click();
        self.brush = self.brush.with_size(size);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.audio.play_click();
        self.brush = self.brush.with_tool(tool);
    }

    pub fn resume_audio(&mut self) {
        self.audio.resume();
    }

    /// Manual "clear hair" button.
    pub fn clear(&mut self) {
        self.audio.play_click();
        self.clear_surface();
    }

    pub fn calculate_score(&self) -> ScoreResult {
        let target = self.config.target_for(self.progress.level);
        self.analyzer.score(self.surface.as_ref(), target)
    }

    /// The player confirmed they are done with the current cut.
    pub fn confirm_done(&mut self) -> Transition {
        self.audio.play_click();
        let result = self.calculate_score();
        let transition = advance(self.progress, result.score, &self.rules);
        if !transition.changed() {
            log::debug!("confirmation ignored in {:?}", transition.from);
            return transition;
        }
        log::info!(
            "{:?} -> {:?} (fill {:.3}, score {}, passed {})",
            transition.from,
            transition.to(),
            result.fill_ratio,
            result.score,
            transition.passed
        );
        self.pointer_up();
        self.progress = transition.progress;
        self.clear_surface();
        self.presenter.level_changed(&self.level_view());
        self.sync_ambience();
        transition
    }

    /// Start over from level 1 with a clean slate.
    pub fn reset(&mut self) {
        self.audio.play_click();
        self.pointer_up();
        self.progress = LevelProgress::default();
        self.brush = self.config.default_brush;
        self.sentiment = Sentiment::Neutral;
        self.presenter.sentiment_changed(self.sentiment);
        self.clear_surface();
        self.presenter.level_changed(&self.level_view());
        self.sync_ambience();
        log::info!("session reset");
    }

    /// Stop every sound and release the surface. Further input is ignored.
    pub fn teardown(&mut self) {
        self.pointer_up();
        if self.ambience.take().is_some() {
            self.audio.stop_ambience();
        }
        self.surface = None;
        log::info!("session torn down");
    }

    fn report_pointer(&mut self, state: PointerState) {
        self.pointer = state;
        self.presenter.pointer_changed(state);
    }

    fn clear_surface(&mut self) {
        if self.tracker.clear(self.surface.as_mut()) {
            self.presenter.surface_cleared();
        }
    }

    fn sync_ambience(&mut self) {
        let wanted = Ambience::for_progress(&self.progress);
        if wanted == self.ambience {
            return;
        }
        match wanted {
            Some(a) => self.audio.play_ambience(a),
            None => self.audio.stop_ambience(),
        }
        log::debug!("ambience {:?} -> {:?}", self.ambience, wanted);
        self.ambience = wanted;
    }
}
