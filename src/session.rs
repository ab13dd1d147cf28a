use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// An elapsed-time snapshot captured while the stopwatch was running.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Elapsed milliseconds at the moment the lap was recorded
    pub time: u64,
    /// Pre-rendered `MM:SS`/`HH:MM:SS` form
    pub display: String,
}

/// One completed timing run, created at stop time. Immutable once built;
/// the lap list is a copy of the engine's laps, not shared state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session end time, serialized as ISO-8601
    pub timestamp: DateTime<Local>,
    /// Total elapsed milliseconds
    pub duration: u64,
    #[serde(rename = "displayDuration")]
    pub display_duration: String,
    pub laps: Vec<Lap>,
}

/// Per-lap deltas: the first split equals the first lap, each subsequent
/// split is the gap to the previous lap.
pub fn lap_splits(laps: &[Lap]) -> Vec<u64> {
    let mut splits = Vec::with_capacity(laps.len());
    if let Some(first) = laps.first() {
        splits.push(first.time);
    }
    splits.extend(
        laps.iter()
            .tuple_windows()
            .map(|(a, b)| b.time.saturating_sub(a.time)),
    );
    splits
}
