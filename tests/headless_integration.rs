use std::sync::mpsc;
use std::time::Duration;

use takt::history::{MemoryHistoryStore, SessionHistory};
use takt::runtime::{AppEvent, Cadence, Runner, TestEventSource};
use takt::stopwatch::{Phase, Stopwatch};

fn fast_cadence() -> Cadence {
    Cadence::new(Duration::from_millis(10), Duration::from_millis(10))
}

// Headless integration using the internal runtime + Stopwatch without a TTY.
// Drives a full start -> lap -> pause -> resume -> stop run via Runner ticks.
#[test]
fn headless_run_records_a_session_with_laps() {
    let mut sw = Stopwatch::new();
    let mut history = SessionHistory::load(Box::new(MemoryHistoryStore::new()));

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), fast_cadence());

    sw.start();

    // Let a handful of ticks elapse while running.
    for _ in 0..5u32 {
        if let AppEvent::Tick = runner.step(sw.is_running()) {
            sw.on_tick();
        }
    }
    sw.record_lap();
    assert_eq!(sw.laps().len(), 1);

    sw.pause();
    let frozen = sw.elapsed_ms();

    // Ticks while paused must not move the clock.
    for _ in 0..5u32 {
        if let AppEvent::Tick = runner.step(sw.is_running()) {
            sw.on_tick();
        }
    }
    assert_eq!(sw.elapsed_ms(), frozen);

    sw.resume();
    for _ in 0..5u32 {
        if let AppEvent::Tick = runner.step(sw.is_running()) {
            sw.on_tick();
        }
    }

    let session = sw.stop().expect("run should emit a session");
    assert!(session.duration >= frozen);
    assert_eq!(session.laps.len(), 1);

    history.append(session).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.recent(10)[0].laps.len(), 1);
}

#[test]
fn headless_reset_returns_to_initial_state() {
    let mut sw = Stopwatch::new();
    sw.start();

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), fast_cadence());
    for _ in 0..4u32 {
        if let AppEvent::Tick = runner.step(sw.is_running()) {
            sw.on_tick();
        }
    }
    sw.record_lap();

    sw.reset();
    assert_eq!(sw.phase(), Phase::Stopped);
    assert_eq!(sw.elapsed_ms(), 0);
    assert!(sw.laps().is_empty());
}

#[test]
fn headless_key_events_pass_through_the_runner() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let (tx, rx) = mpsc::channel();
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Char(' '),
        KeyModifiers::NONE,
    )))
    .unwrap();

    let runner = Runner::new(TestEventSource::new(rx), fast_cadence());

    let mut sw = Stopwatch::new();
    match runner.step(sw.is_running()) {
        AppEvent::Key(key) if key.code == KeyCode::Char(' ') => sw.toggle(),
        other => panic!("expected the space key event, got {other:?}"),
    }
    assert_eq!(sw.phase(), Phase::Running);
}
