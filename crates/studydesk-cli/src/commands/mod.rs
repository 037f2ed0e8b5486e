pub mod config;
pub mod notes;
pub mod profile;
pub mod timer;
