//! Fixed-cadence mood polling.
//!
//! While a stroke is in progress the character re-reads the canvas every
//! `cadence_ms` and reacts. Polling instead of scoring on every segment keeps
//! the full-surface scan off the pointer-move path.
//!
//! `MoodSchedule` is the clock-agnostic half: it only decides whether a poll is
//! due. The browser runtime pairs it with an interval that is cancelled when the
//! stroke ends, so no recurring scan outlives its drawing session.

/// Early-tick tolerance of [`MoodSchedule::due`].
pub const TIMER_SLACK_MS: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct MoodSchedule {
    cadence_ms: f64,
    next_due_ms: Option<f64>,
}

impl MoodSchedule {
    pub fn new(cadence_ms: u32) -> Self {
        Self {
            cadence_ms: cadence_ms.max(1) as f64,
            next_due_ms: None,
        }
    }

    pub fn cadence_ms(&self) -> f64 {
        self.cadence_ms
    }

    /// Arm the schedule; the first poll is one cadence after `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.cadence_ms);
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// True when a poll should run at `now_ms`. Consumes the slot, and skips
    /// ahead past any slots missed while the page was throttled.
    ///
    /// A tick up to [`TIMER_SLACK_MS`] early still counts, since browsers
    /// coarsen `performance.now()` and timer callbacks can land just short.
    pub fn due(&mut self, now_ms: f64) -> bool {
        let Some(next) = self.next_due_ms else {
            return false;
        };
        if now_ms + TIMER_SLACK_MS < next {
            return false;
        }
        let missed = ((now_ms - next) / self.cadence_ms).floor().max(0.0);
        self.next_due_ms = Some(next + (missed + 1.0) * self.cadence_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_schedule_never_fires() {
        let mut s = MoodSchedule::new(500);
        assert!(!s.is_running());
        assert!(!s.due(10_000.0));
    }

    #[test]
    fn test_fires_once_per_cadence() {
        let mut s = MoodSchedule::new(500);
        s.start(1_000.0);
        assert!(!s.due(1_498.0));
        assert!(s.due(1_500.0));
        assert!(!s.due(1_700.0));
        assert!(s.due(2_000.0));
    }

    #[test]
    fn test_throttled_gap_collapses_to_one_poll() {
        let mut s = MoodSchedule::new(500);
        s.start(0.0);
        assert!(s.due(2_750.0));
        assert!(!s.due(2_900.0));
        assert!(s.due(3_000.0));
    }

    #[test]
    fn test_slightly_early_tick_counts_once() {
        let mut s = MoodSchedule::new(500);
        s.start(0.0);
        // Timer fired at a coarsened 499.6 ms.
        assert!(s.due(499.6));
        assert!(!s.due(500.0));
        assert!(!s.due(998.0));
        assert!(s.due(999.4));
    }

    #[test]
    fn test_stop_cancels() {
        let mut s = MoodSchedule::new(500);
        s.start(0.0);
        s.stop();
        assert!(!s.due(5_000.0));
    }
}
