use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app loop. There is one logical
/// thread of control: each event is handled to completion before the
/// next is taken.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// How long the loop blocks between ticks, depending on the stopwatch
/// phase. A running clock refreshes its centisecond display on a 10 ms
/// best-effort tick; a stopped or paused clock has nothing to redraw, so
/// the loop sleeps much longer and wakes only for input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    running: Duration,
    idle: Duration,
}

impl Cadence {
    pub const RUNNING_TICK_MS: u64 = 10;
    pub const IDLE_TICK_MS: u64 = 250;

    pub fn new(running: Duration, idle: Duration) -> Self {
        Self { running, idle }
    }

    pub fn interval(&self, running: bool) -> Duration {
        if running {
            self.running
        } else {
            self.idle
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            running: Duration::from_millis(Self::RUNNING_TICK_MS),
            idle: Duration::from_millis(Self::IDLE_TICK_MS),
        }
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source backed by a crossterm reader thread
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scriptable event source for headless tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event or tick at a time, blocking for
/// the phase-appropriate interval.
pub struct Runner<E: EventSource> {
    source: E,
    cadence: Cadence,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, cadence: Cadence) -> Self {
        Self { source, cadence }
    }

    /// Returns the next input event, or `Tick` once the current
    /// cadence interval expires with nothing to read.
    pub fn step(&self, running: bool) -> AppEvent {
        match self.source.recv_timeout(self.cadence.interval(running)) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}
