//! Command execution context

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::cli::args::Cli;
use crate::model::Config;
use crate::schema::{load_schema_file, FieldSchema};
use crate::store::ConfigStore;
use crate::utils::path::normalize_path;

/// Common context for command execution
pub struct Context {
    pub config: Config,
    pub env_file: PathBuf,
    pub schema_file: PathBuf,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = crate::config::load_config()?;
        Ok(Self::new(config, cli.file.clone(), cli.schema.clone()))
    }

    /// Resolve paths against the config defaults.
    pub fn new(config: Config, env_file: Option<PathBuf>, schema_file: Option<PathBuf>) -> Self {
        let env_file = env_file.unwrap_or_else(|| PathBuf::from(&config.defaults.env_file));
        let schema_file =
            schema_file.unwrap_or_else(|| PathBuf::from(&config.defaults.schema_file));
        Self {
            env_file: normalize_path(&env_file),
            schema_file: normalize_path(&schema_file),
            config,
        }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.env_file)
    }

    /// Load the schema fields, failing when the schema file is absent.
    pub fn load_fields(&self) -> Result<Vec<FieldSchema>> {
        if !self.schema_file.exists() {
            anyhow::bail!(
                "Schema file not found: {} (use --schema to point at one)",
                self.schema_file.display()
            );
        }
        Ok(load_schema_file(&self.schema_file)?)
    }

    /// Schema fields when a schema file exists, otherwise none.
    pub fn optional_fields(&self) -> Result<Vec<FieldSchema>> {
        if self.schema_file.exists() {
            self.load_fields()
        } else {
            Ok(Vec::new())
        }
    }

    /// Backup manager when backups are enabled
    pub fn backup_manager(&self) -> Option<BackupManager> {
        self.config
            .backup
            .enabled
            .then(|| BackupManager::new(&self.env_file, &self.config))
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn print_warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }
}
