//! Core data models for envwiz

mod assignment;
pub mod config;

pub use assignment::{Assignment, Line};
pub use config::{BackupConfig, Config, DefaultsConfig, LogConfig, UiConfig};
