//! Audio feedback seam.
//!
//! The session never talks to Web Audio directly; it holds an [`AudioService`]
//! and tells it *what* should be audible. Sound design lives in the small descriptor
//! structs below so the browser implementation (`web::audio`) is just plumbing.
//! Audio is always optional: every implementation must swallow its own
//! failures and let the game carry on silently.

use crate::brush::Tool;
use crate::levels::Level;
use crate::progression::LevelProgress;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// Frequency wobble applied to a voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lfo {
    pub rate_hz: f32,
    pub depth_hz: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub lfo: Option<Lfo>,
}

const fn voice(waveform: Waveform, frequency_hz: f32) -> Voice {
    Voice {
        waveform,
        frequency_hz,
        lfo: None,
    }
}

/// Long-running background bed for a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ambience {
    /// C major pad, salon hum.
    Gentle,
    /// Low detuned drone.
    Unsettling,
    /// Rumble plus a wobbling high whine.
    Horror,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbienceSpec {
    pub gain: f32,
    pub voices: &'static [Voice],
}

static GENTLE_VOICES: [Voice; 4] = [
    voice(Waveform::Sine, 261.63),
    voice(Waveform::Sine, 329.63),
    voice(Waveform::Sine, 392.00),
    voice(Waveform::Sine, 523.25),
];

static UNSETTLING_VOICES: [Voice; 2] = [
    voice(Waveform::Triangle, 55.00),
    voice(Waveform::Triangle, 58.00),
];

static HORROR_VOICES: [Voice; 2] = [
    voice(Waveform::Sawtooth, 40.0),
    Voice {
        waveform: Waveform::Sine,
        frequency_hz: 8000.0,
        lfo: Some(Lfo {
            rate_hz: 0.5,
            depth_hz: 1000.0,
        }),
    },
];

impl Ambience {
    pub fn spec(self) -> AmbienceSpec {
        match self {
            Ambience::Gentle => AmbienceSpec {
                gain: 0.05,
                voices: &GENTLE_VOICES,
            },
            Ambience::Unsettling => AmbienceSpec {
                gain: 0.08,
                voices: &UNSETTLING_VOICES,
            },
            Ambience::Horror => AmbienceSpec {
                gain: 0.1,
                voices: &HORROR_VOICES,
            },
        }
    }

    /// Bed for the current progress; `None` means silence (the endings).
    pub fn for_progress(progress: &LevelProgress) -> Option<Ambience> {
        match (progress.level, progress.corrupted) {
            (Level::Jumpscare | Level::Success, _) => None,
            (Level::Level3, true) => Some(Ambience::Horror),
            (_, true) => Some(Ambience::Unsettling),
            (_, false) => Some(Ambience::Gentle),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// Looping filtered noise played while a stroke is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCue {
    pub gain: f32,
    pub filter: FilterKind,
    pub cutoff_hz: f32,
}

impl DrawCue {
    pub fn for_tool(tool: Tool) -> Self {
        match tool {
            // Soft brushing.
            Tool::Paint => DrawCue {
                gain: 0.05,
                filter: FilterKind::LowPass,
                cutoff_hz: 400.0,
            },
            // Scissors: louder and harsher.
            Tool::Erase => DrawCue {
                gain: 0.15,
                filter: FilterKind::HighPass,
                cutoff_hz: 1000.0,
            },
        }
    }
}

/// UI click blip: sine sweep from `start_hz` to `end_hz`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickSpec {
    pub start_hz: f32,
    pub end_hz: f32,
    pub gain: f32,
    pub duration_s: f64,
}

pub const CLICK: ClickSpec = ClickSpec {
    start_hz: 800.0,
    end_hz: 400.0,
    gain: 0.1,
    duration_s: 0.1,
};

pub trait AudioService {
    /// Unlock a suspended context after a user gesture.
    fn resume(&mut self);
    /// Replace whatever ambience is playing.
    fn play_ambience(&mut self, ambience: Ambience);
    fn stop_ambience(&mut self);
    /// Start the stroke texture. At most one cue plays at a time.
    fn start_draw_cue(&mut self, cue: DrawCue);
    fn stop_draw_cue(&mut self);
    fn play_click(&mut self);
}

/// No-op service for hosts without audio (and native tests).
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn resume(&mut self) {}
    fn play_ambience(&mut self, _ambience: Ambience) {}
    fn stop_ambience(&mut self) {}
    fn start_draw_cue(&mut self, _cue: DrawCue) {}
    fn stop_draw_cue(&mut self) {}
    fn play_click(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambience_follows_corruption() {
        let mut p = LevelProgress::default();
        assert_eq!(Ambience::for_progress(&p), Some(Ambience::Gentle));
        p.corrupted = true;
        assert_eq!(Ambience::for_progress(&p), Some(Ambience::Unsettling));
        p.level = Level::Level3;
        assert_eq!(Ambience::for_progress(&p), Some(Ambience::Horror));
        p.level = Level::Jumpscare;
        assert_eq!(Ambience::for_progress(&p), None);
    }

    #[test]
    fn test_eraser_cue_is_harsher() {
        let paint = DrawCue::for_tool(Tool::Paint);
        let erase = DrawCue::for_tool(Tool::Erase);
        assert!(erase.gain > paint.gain);
        assert_eq!(paint.filter, FilterKind::LowPass);
        assert_eq!(erase.filter, FilterKind::HighPass);
    }

    #[test]
    fn test_only_horror_wobbles() {
        let lfo_count = |a: Ambience| a.spec().voices.iter().filter(|v| v.lfo.is_some()).count();
        assert_eq!(lfo_count(Ambience::Gentle), 0);
        assert_eq!(lfo_count(Ambience::Horror), 1);
    }
}
