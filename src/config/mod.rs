//! Configuration management module

use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::model::Config;

/// Ensure the configuration directory exists and return the config path
pub fn ensure_config_file() -> Result<PathBuf> {
    let config_path = Config::config_path();
    if !config_path.exists() {
        Config::default()
            .save_to(&config_path)
            .with_context(|| format!("Failed to create {}", config_path.display()))?;
    }
    Ok(config_path)
}

/// Load configuration, falling back to defaults when the file is missing
pub fn load_config() -> Result<Config> {
    let path = Config::config_path();
    Config::load_from(&path).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Open the config file in `$EDITOR`, creating it with defaults first
pub fn edit_config() -> Result<()> {
    let config_path = ensure_config_file()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });
    tracing::debug!(%editor, path = %config_path.display(), "opening config");
    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;
    Ok(())
}
