use crate::app_dirs::AppDirs;
use crate::session::Session;
use crate::stats::{summarize, WindowStats};
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persistence port for the session log. The whole list is rewritten on
/// every mutation; there is a single logical owner, so no partial-write
/// concern.
pub trait HistoryStore {
    /// Missing or unparsable data is never fatal; it reads as empty.
    fn load(&self) -> Vec<Session>;
    fn save(&self, sessions: &[Session]) -> io::Result<()>;
}

/// JSON file under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new() -> Self {
        let path = AppDirs::history_path().unwrap_or_else(|| PathBuf::from("takt_sessions.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Vec<Session> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(sessions) = serde_json::from_slice::<Vec<Session>>(&bytes) {
                return sessions;
            }
        }
        vec![]
    }

    fn save(&self, sessions: &[Session]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(sessions).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory substitute for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    sessions: RefCell<Vec<Session>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Vec<Session> {
        self.sessions.borrow().clone()
    }

    fn save(&self, sessions: &[Session]) -> io::Result<()> {
        *self.sessions.borrow_mut() = sessions.to_vec();
        Ok(())
    }
}

/// Append-only log of completed sessions, loaded once at startup and
/// persisted in full after every mutation. In-memory state stays
/// authoritative for the current run even when a write fails.
pub struct SessionHistory {
    sessions: Vec<Session>,
    store: Box<dyn HistoryStore>,
}

impl SessionHistory {
    pub fn load(store: Box<dyn HistoryStore>) -> Self {
        let sessions = store.load();
        Self { sessions, store }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// All-time focused milliseconds, for the header stats.
    pub fn total_duration(&self) -> u64 {
        self.sessions.iter().map(|s| s.duration).sum()
    }

    pub fn append(&mut self, session: Session) -> io::Result<()> {
        self.sessions.push(session);
        self.store.save(&self.sessions)
    }

    /// Irreversible; callers gate this on explicit user confirmation.
    pub fn clear(&mut self) -> io::Result<()> {
        self.sessions.clear();
        self.store.save(&self.sessions)
    }

    /// The last `limit` sessions, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&Session> {
        self.sessions.iter().rev().take(limit).collect()
    }

    pub fn stats_since(&self, window_start: DateTime<Local>) -> WindowStats {
        summarize(&self.sessions, window_start)
    }

    /// Write the full history as CSV, one row per session.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        writer
            .write_record(["timestamp", "duration_ms", "duration", "laps"])
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        for session in &self.sessions {
            writer
                .write_record([
                    session.timestamp.to_rfc3339(),
                    session.duration.to_string(),
                    session.display_duration.clone(),
                    session.laps.len().to_string(),
                ])
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        }

        writer.flush()
    }
}
