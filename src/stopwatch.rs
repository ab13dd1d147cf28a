use crate::session::{Lap, Session};
use crate::util::format_duration;
use chrono::Local;
use std::time::{Duration, Instant};

/// Lifecycle of the stopwatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Stopped,
    Running,
    Paused,
}

/// Read-only view handed to renderers; never lets a caller reach back
/// into the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct StopwatchSnapshot {
    pub phase: Phase,
    pub elapsed_ms: u64,
    pub laps: Vec<Lap>,
}

/// The timer state machine.
///
/// `elapsed` only advances while `Running`, recomputed on every tick as
/// `now - anchor`. Start and resume re-anchor (`anchor = now - elapsed`)
/// so pause/resume cycles neither lose nor double-count time. The anchor
/// is a monotonic `Instant`, so wall-clock adjustments cannot skew it.
#[derive(Debug)]
pub struct Stopwatch {
    phase: Phase,
    elapsed: Duration,
    anchor: Option<Instant>,
    laps: Vec<Lap>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            phase: Phase::Stopped,
            elapsed: Duration::ZERO,
            anchor: None,
            laps: vec![],
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Main-button semantics: Stopped starts, Running pauses, Paused resumes.
    pub fn toggle(&mut self) {
        match self.phase {
            Phase::Stopped => self.start(),
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            return;
        }
        // Re-anchor so elapsed continues from wherever it left off
        // (0 after reset, >0 after a reset-less stop or pause).
        self.anchor = Some(anchor_for(Instant::now(), self.elapsed));
        self.phase = Phase::Running;
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.settle();
        self.phase = Phase::Paused;
    }

    /// Resume is start with the existing elapsed preserved.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.start();
        }
    }

    /// Ends the current run and emits the completed session, or `None`
    /// when there is nothing to record. Laps are retained until reset.
    pub fn stop(&mut self) -> Option<Session> {
        if self.phase != Phase::Running && self.elapsed.is_zero() {
            return None;
        }
        if self.phase == Phase::Running {
            self.settle();
        }
        self.phase = Phase::Stopped;
        self.anchor = None;

        let duration = self.elapsed_ms();
        Some(Session {
            timestamp: Local::now(),
            duration,
            display_duration: format_duration(duration),
            laps: self.laps.clone(),
        })
    }

    /// Back to the initial state, regardless of the current phase.
    pub fn reset(&mut self) {
        self.phase = Phase::Stopped;
        self.elapsed = Duration::ZERO;
        self.anchor = None;
        self.laps.clear();
    }

    /// Captures the current elapsed time as a lap. No-op unless Running.
    pub fn record_lap(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.settle();
        let ms = self.elapsed_ms();
        self.laps.push(Lap {
            time: ms,
            display: format_duration(ms),
        });
    }

    /// Periodic callback while Running; a stale tick arriving after a
    /// pause or stop is a no-op.
    pub fn on_tick(&mut self) {
        if self.phase == Phase::Running {
            self.settle();
        }
    }

    /// Reset button is enabled once there is anything to wipe.
    pub fn can_reset(&self) -> bool {
        self.is_running() || !self.elapsed.is_zero() || !self.laps.is_empty()
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        StopwatchSnapshot {
            phase: self.phase,
            elapsed_ms: self.elapsed_ms(),
            laps: self.laps.clone(),
        }
    }

    fn settle(&mut self) {
        if let Some(anchor) = self.anchor {
            self.elapsed = anchor.elapsed();
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Backdated anchor for a run that carries prior elapsed time. If the
/// carried duration reaches past the start of the monotonic clock,
/// saturate to `now` instead of panicking on `Instant` underflow.
fn anchor_for(now: Instant, elapsed: Duration) -> Instant {
    now.checked_sub(elapsed).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::thread::sleep;

    #[test]
    fn starts_stopped_and_empty() {
        let sw = Stopwatch::new();
        assert_matches!(sw.phase(), Phase::Stopped);
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(sw.laps().is_empty());
        assert!(!sw.can_reset());
    }

    #[test]
    fn toggle_walks_the_state_machine() {
        let mut sw = Stopwatch::new();
        sw.toggle();
        assert_matches!(sw.phase(), Phase::Running);
        sw.toggle();
        assert_matches!(sw.phase(), Phase::Paused);
        sw.toggle();
        assert_matches!(sw.phase(), Phase::Running);
    }

    #[test]
    fn elapsed_advances_only_while_running() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(30));
        sw.on_tick();
        let running = sw.elapsed_ms();
        assert!(running >= 30);

        sw.pause();
        let frozen = sw.elapsed_ms();
        sleep(std::time::Duration::from_millis(30));
        sw.on_tick();
        assert_eq!(sw.elapsed_ms(), frozen);
    }

    #[test]
    fn pause_resume_neither_loses_nor_double_counts() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(20));
        sw.pause();
        let after_first = sw.elapsed_ms();

        // Time spent paused must not leak into elapsed.
        sleep(std::time::Duration::from_millis(100));
        sw.resume();
        sleep(std::time::Duration::from_millis(20));
        sw.pause();

        let total = sw.elapsed_ms();
        assert!(total >= after_first + 20);
        assert!(total < after_first + 90, "paused time leaked into elapsed");
    }

    #[test]
    fn lap_is_noop_unless_running() {
        let mut sw = Stopwatch::new();
        sw.record_lap();
        assert!(sw.laps().is_empty());

        sw.start();
        sw.pause();
        sw.record_lap();
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn lap_survives_into_the_session() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(10));
        sw.record_lap();
        assert_eq!(sw.laps().len(), 1);

        let session = sw.stop().expect("non-zero run should emit a session");
        assert_eq!(session.laps.len(), 1);
        assert_eq!(session.laps[0].time, sw.laps()[0].time);
        // Laps stay visible after stop, until reset.
        assert_eq!(sw.laps().len(), 1);
    }

    #[test]
    fn stop_with_nothing_recorded_emits_nothing() {
        let mut sw = Stopwatch::new();
        assert!(sw.stop().is_none());
    }

    #[test]
    fn stop_works_from_paused() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(10));
        sw.pause();
        let frozen = sw.elapsed_ms();

        let session = sw.stop().expect("paused run with elapsed>0 should emit");
        assert_eq!(session.duration, frozen);
        assert_matches!(sw.phase(), Phase::Stopped);
    }

    #[test]
    fn start_after_stop_continues_from_prior_elapsed() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(10));
        let _ = sw.stop();
        let carried = sw.elapsed_ms();
        assert!(carried > 0);

        sw.start();
        sw.on_tick();
        assert!(sw.elapsed_ms() >= carried);
    }

    #[test]
    fn reset_clears_everything_from_any_phase() {
        for pause_first in [false, true] {
            let mut sw = Stopwatch::new();
            sw.start();
            sleep(std::time::Duration::from_millis(10));
            sw.record_lap();
            if pause_first {
                sw.pause();
            }
            sw.reset();
            assert_matches!(sw.phase(), Phase::Stopped);
            assert_eq!(sw.elapsed_ms(), 0);
            assert!(sw.laps().is_empty());
        }
    }

    #[test]
    fn anchor_saturates_instead_of_underflowing() {
        let now = Instant::now();
        // Far larger than any plausible monotonic-clock span.
        let huge = Duration::from_secs(u64::MAX / 2);
        assert_eq!(anchor_for(now, huge), now);
        assert_eq!(anchor_for(now, Duration::ZERO), now);
        assert!(anchor_for(now, Duration::from_millis(5)) <= now);
    }

    #[test]
    fn snapshot_matches_engine_state() {
        let mut sw = Stopwatch::new();
        sw.start();
        sleep(std::time::Duration::from_millis(10));
        sw.record_lap();
        sw.pause();

        let snap = sw.snapshot();
        assert_eq!(snap.phase, Phase::Paused);
        assert_eq!(snap.elapsed_ms, sw.elapsed_ms());
        assert_eq!(snap.laps.len(), 1);
    }
}
