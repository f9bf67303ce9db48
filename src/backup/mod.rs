//! Backup management module
//!
//! Copies of an env file are stored as `<timestamp>_<name>.bak` under
//! `backups/<group>/`, newest first, pruned to `backup.max_count`.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use time::{macros::format_description, OffsetDateTime};

use crate::model::Config;
use crate::utils::path::backup_group;

/// Backup entry information
#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub id: String,
    pub path: PathBuf,
    pub timestamp: String,
    pub size: u64,
}

/// Backup manager for one env file
pub struct BackupManager {
    backup_dir: PathBuf,
    max_count: usize,
}

impl BackupManager {
    pub fn new(env_file: &Path, config: &Config) -> Self {
        Self::with_dir(
            Config::backups_dir().join(backup_group(env_file)),
            config.backup.max_count,
        )
    }

    pub fn with_dir(backup_dir: impl Into<PathBuf>, max_count: usize) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            max_count,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn timestamp() -> Result<String> {
        let format = format_description!("[year][month][day]_[hour][minute][second]_[subsecond digits:3]");
        Ok(OffsetDateTime::now_utc().format(format)?)
    }

    /// Copy `source_file` into the backup directory and prune old copies
    pub fn create_backup(&self, source_file: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.backup_dir)
            .with_context(|| format!("Failed to create {}", self.backup_dir.display()))?;

        let filename = source_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "env".to_string());
        let backup_path = self
            .backup_dir
            .join(format!("{}_{}.bak", Self::timestamp()?, filename));

        std::fs::copy(source_file, &backup_path).with_context(|| {
            format!("Failed to back up {}", source_file.display())
        })?;
        tracing::info!(
            source = %source_file.display(),
            backup = %backup_path.display(),
            "backup created"
        );

        self.cleanup_keep(self.max_count)?;
        Ok(backup_path)
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let mut entries = Vec::new();
        let read_dir = match std::fs::read_dir(&self.backup_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };

        for entry in read_dir {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e != "bak").unwrap_or(true) {
                continue;
            }

            let id = path
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let timestamp = id.splitn(4, '_').take(3).collect::<Vec<_>>().join("_");

            entries.push(BackupEntry {
                size: entry.metadata()?.len(),
                id,
                path,
                timestamp,
            });
        }

        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    /// Find a backup by exact ID or unique substring
    pub fn get_backup(&self, id: &str) -> Result<Option<BackupEntry>> {
        let backups = self.list_backups()?;
        if let Some(exact) = backups.iter().find(|b| b.id == id) {
            return Ok(Some(exact.clone()));
        }
        let mut matches = backups.into_iter().filter(|b| b.id.contains(id));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(Some(only)),
            (Some(_), Some(_)) => anyhow::bail!("Backup ID '{}' is ambiguous", id),
            _ => Ok(None),
        }
    }

    /// Restore a backup over `target_file`, backing up the current file first
    pub fn restore_backup(&self, id: &str, target_file: &Path) -> Result<BackupEntry> {
        let backup = self
            .get_backup(id)?
            .ok_or_else(|| anyhow::anyhow!("Backup not found: {}", id))?;

        if target_file.exists() {
            self.create_backup(target_file)?;
        }
        std::fs::copy(&backup.path, target_file)
            .with_context(|| format!("Failed to restore {}", target_file.display()))?;
        tracing::info!(backup = %backup.id, target = %target_file.display(), "backup restored");
        Ok(backup)
    }

    /// Remove all but the newest `keep` backups, returning how many were removed
    pub fn cleanup_keep(&self, keep: usize) -> Result<usize> {
        let backups = self.list_backups()?;
        let mut removed = 0;
        for backup in backups.into_iter().skip(keep) {
            std::fs::remove_file(&backup.path)?;
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!(removed, "old backups pruned");
        }
        Ok(removed)
    }
}
