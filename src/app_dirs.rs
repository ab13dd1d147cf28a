use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Session history lives under the local state dir when HOME is set,
    /// otherwise under the platform data dir.
    pub fn history_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("takt");
            Some(state_dir.join("sessions.json"))
        } else {
            ProjectDirs::from("", "", "takt")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("sessions.json"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "takt").map(|pd| pd.config_dir().join("config.json"))
    }
}
