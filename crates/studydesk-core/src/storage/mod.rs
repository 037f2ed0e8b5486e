mod config;
mod kv;

pub use config::{ClockConfig, Config, LogConfig, TimerConfig};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore, UpdateFn};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Where the data directory lives, without touching the filesystem.
///
/// `STUDYDESK_HOME` overrides the location outright. Otherwise this is
/// `~/.config/studydesk`, or `~/.config/studydesk-dev` when
/// `STUDYDESK_ENV=dev`.
pub fn data_dir_path() -> PathBuf {
    if let Some(home) = std::env::var_os("STUDYDESK_HOME") {
        return PathBuf::from(home);
    }
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");
    let env = std::env::var("STUDYDESK_ENV").unwrap_or_else(|_| "production".to_string());
    if env == "dev" {
        base_dir.join("studydesk-dev")
    } else {
        base_dir.join("studydesk")
    }
}

/// Returns the data directory, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = data_dir_path();
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
