//! # Studydesk Core Library
//!
//! Core logic for the Studydesk study companion. The CLI is a thin host over
//! this crate; any other front end would be too.
//!
//! ## Architecture
//!
//! - **Timer**: a Pomodoro session controller stepped one second at a time,
//!   plus a tokio ticker and driver that feed it from a real clock
//! - **Stats**: figures derived from the controller's counters
//! - **Storage**: TOML configuration and a SQLite-backed string key-value store
//! - **Notes**: subject-tagged notes persisted through the key-value store
//! - **Profile**: the student's profile card and session role, same store
//!
//! ## Key Components
//!
//! - [`SessionController`]: focus/break state machine
//! - [`SessionDriver`]: controller plus exactly one live ticker while running
//! - [`Config`]: application configuration management
//! - [`KeyValueStore`]: injected persistence interface

pub mod error;
pub mod events;
pub mod notes;
pub mod profile;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notes::{Note, Notebook};
pub use profile::Profile;
pub use stats::{format_clock, SessionStats};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{Durations, SessionController, SessionDriver, SessionMode, Ticker, TimerState};
