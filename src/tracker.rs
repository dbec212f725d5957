//! Pointer/stroke tracking.
//!
//! Turns pointer and touch samples into stroke segments on the raster surface.
//! There is no stroke object: the tracker only remembers whether a stroke is in
//! progress and where the last sample landed. Everything drawn exists solely as
//! pixels, so there is nothing to undo.

use serde::Serialize;

use crate::audio::{AudioService, DrawCue};
use crate::brush::BrushSettings;
use crate::surface::{Point, RasterSurface};

/// Normalized pointer position for gaze effects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointerState {
    pub is_active: bool,
    pub x: f64,
    pub y: f64,
}

impl PointerState {
    /// Centered "at rest" pose reported when a stroke ends.
    pub const REST: PointerState = PointerState {
        is_active: false,
        x: 0.5,
        y: 0.5,
    };
}

/// On-screen box of the canvas element, in client (CSS) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    /// Box whose CSS size equals the surface size, placed at the origin.
    pub fn identity(surface: &RasterSurface) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: surface.width() as f64,
            height: surface.height() as f64,
        }
    }

    /// Map a client-space position to surface pixels and normalized `[0, 1]`
    /// coordinates. `None` (an event without coordinates, e.g. a touch list
    /// that is already empty) maps to `(0, 0)`.
    pub fn sample(&self, client: Option<(f64, f64)>, surface_size: (u32, u32)) -> PointerSample {
        let Some((cx, cy)) = client else {
            return PointerSample {
                local: Point::new(0.0, 0.0),
                normalized: (0.0, 0.0),
            };
        };
        let (ox, oy) = (cx - self.left, cy - self.top);
        let scale = |css: f64, px: u32| if css > 0.0 { px as f64 / css } else { 1.0 };
        let norm = |off: f64, css: f64| {
            if css > 0.0 {
                (off / css).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        PointerSample {
            local: Point::new(
                ox * scale(self.width, surface_size.0),
                oy * scale(self.height, surface_size.1),
            ),
            normalized: (norm(ox, self.width), norm(oy, self.height)),
        }
    }
}

/// One input event, already converted into both coordinate spaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub local: Point,
    pub normalized: (f64, f64),
}

impl PointerSample {
    fn active_state(&self) -> PointerState {
        PointerState {
            is_active: true,
            x: self.normalized.0,
            y: self.normalized.1,
        }
    }
}

#[derive(Debug, Default)]
pub struct StrokeTracker {
    active: bool,
    last: Option<Point>,
    cue_playing: bool,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a stroke at `sample`. Calling this mid-stroke restarts the stroke
    /// and its audio cue. Without a surface nothing happens.
    pub fn begin(
        &mut self,
        surface: Option<&mut RasterSurface>,
        brush: &BrushSettings,
        sample: PointerSample,
        audio: &mut dyn AudioService,
    ) -> Option<PointerState> {
        surface?;
        if self.cue_playing {
            audio.stop_draw_cue();
        }
        audio.resume();
        audio.start_draw_cue(DrawCue::for_tool(brush.tool));
        self.cue_playing = true;
        self.active = true;
        self.last = Some(sample.local);
        log::debug!("stroke begin at {:?} with {:?}", sample.local, brush.tool);
        Some(sample.active_state())
    }

    /// Extend the current stroke to `sample`. The pointer is reported on every
    /// move, but only moves during an active stroke paint.
    pub fn extend(
        &mut self,
        surface: Option<&mut RasterSurface>,
        brush: &BrushSettings,
        sample: PointerSample,
    ) -> Option<PointerState> {
        let surface = surface?;
        if self.active {
            let from = self.last.unwrap_or(sample.local);
            surface.stroke_segment(from, sample.local, brush);
            self.last = Some(sample.local);
        }
        Some(sample.active_state())
    }

    /// Close the stroke and silence its cue. Always safe to call.
    pub fn end(&mut self, audio: &mut dyn AudioService) -> PointerState {
        if self.cue_playing {
            audio.stop_draw_cue();
            self.cue_playing = false;
        }
        if self.active {
            log::debug!("stroke end");
        }
        self.active = false;
        self.last = None;
        PointerState::REST
    }

    /// Wipe the surface. Brush and progress are not the tracker's business.
    pub fn clear(&mut self, surface: Option<&mut RasterSurface>) -> bool {
        match surface {
            Some(s) => {
                s.clear();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::brush::Tool;

    fn sample(x: f64, y: f64) -> PointerSample {
        PointerSample {
            local: Point::new(x, y),
            normalized: (x / 100.0, y / 100.0),
        }
    }

    #[test]
    fn test_rect_scales_and_normalizes() {
        let rect = SurfaceRect {
            left: 10.0,
            top: 20.0,
            width: 225.0,
            height: 300.0,
        };
        let s = rect.sample(Some((10.0 + 112.5, 20.0 + 150.0)), (450, 600));
        assert_eq!(s.local, Point::new(225.0, 300.0));
        assert_eq!(s.normalized, (0.5, 0.5));
        // Outside the box the normalized value clamps.
        let s = rect.sample(Some((0.0, 1000.0)), (450, 600));
        assert_eq!(s.normalized, (0.0, 1.0));
    }

    #[test]
    fn test_missing_coordinates_default_to_origin() {
        let rect = SurfaceRect {
            left: 5.0,
            top: 5.0,
            width: 100.0,
            height: 100.0,
        };
        let s = rect.sample(None, (100, 100));
        assert_eq!(s.local, Point::new(0.0, 0.0));
        assert_eq!(s.normalized, (0.0, 0.0));
        let degenerate = SurfaceRect {
            width: 0.0,
            ..rect
        };
        assert_eq!(degenerate.sample(Some((15.0, 5.0)), (100, 100)).normalized.0, 0.0);
    }

    #[test]
    fn test_move_without_begin_reports_but_does_not_paint() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut t = StrokeTracker::new();
        let state = t
            .extend(Some(&mut surface), &BrushSettings::default(), sample(50.0, 50.0))
            .unwrap();
        assert!(state.is_active);
        assert_eq!((state.x, state.y), (0.5, 0.5));
        assert_eq!(surface.covered_pixels(10).unwrap(), 0);
    }

    #[test]
    fn test_stroke_paints_between_samples() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut audio = SilentAudio;
        let brush = BrushSettings::default().with_size(4);
        let mut t = StrokeTracker::new();
        t.begin(Some(&mut surface), &brush, sample(10.0, 50.0), &mut audio);
        t.extend(Some(&mut surface), &brush, sample(60.0, 50.0));
        t.extend(Some(&mut surface), &brush, sample(60.0, 90.0));
        assert_eq!(surface.alpha(35, 50), Some(255));
        assert_eq!(surface.alpha(60, 70), Some(255));
        assert_eq!(t.end(&mut audio), PointerState::REST);
        // After the stroke ends, moves no longer paint.
        t.extend(Some(&mut surface), &brush, sample(10.0, 10.0));
        assert_eq!(surface.alpha(10, 10), Some(0));
    }

    #[test]
    fn test_erase_stroke() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut audio = SilentAudio;
        let brush = BrushSettings::default().with_size(10);
        let mut t = StrokeTracker::new();
        for b in [brush, brush.with_tool(Tool::Erase)] {
            t.begin(Some(&mut surface), &b, sample(20.0, 20.0), &mut audio);
            t.extend(Some(&mut surface), &b, sample(80.0, 80.0));
            t.end(&mut audio);
        }
        assert_eq!(surface.covered_pixels(10).unwrap(), 0);
    }

    #[test]
    fn test_no_surface_is_noop() {
        let mut audio = SilentAudio;
        let mut t = StrokeTracker::new();
        let brush = BrushSettings::default();
        assert!(t.begin(None, &brush, sample(1.0, 1.0), &mut audio).is_none());
        assert!(!t.is_active());
        assert!(t.extend(None, &brush, sample(2.0, 2.0)).is_none());
        assert!(!t.clear(None));
    }
}
