//! Field-by-field session over one env file
//!
//! Each field is prompted with the file's current value; committed values are
//! written immediately, so cancelling leaves everything already committed in
//! place and nothing else touched.

use anyhow::{Context as _, Result};

use crate::backup::BackupManager;
use crate::prompt::{FieldOptions, FieldPrompt, FieldResult, KeySource, Renderer};
use crate::schema::FieldSchema;
use crate::store::{ConfigStore, WriteOutcome};

/// How a field ended up after the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    /// Value committed; `written` is false when the file already held it
    Committed { value: String, written: bool },
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Latest status per field, in field order of first resolution
    pub fields: Vec<(String, FieldStatus)>,
    pub cancelled: bool,
}

impl SessionReport {
    fn record(&mut self, key: &str, status: FieldStatus) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = status,
            None => self.fields.push((key.to_string(), status)),
        }
    }

    pub fn status(&self, key: &str) -> Option<&FieldStatus> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Number of fields whose commit changed the file
    pub fn written(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, s)| matches!(s, FieldStatus::Committed { written: true, .. }))
            .count()
    }
}

pub struct Session<'a> {
    fields: &'a [FieldSchema],
    store: &'a mut ConfigStore,
    mask_char: char,
    backup: Option<BackupManager>,
    backed_up: bool,
}

impl<'a> Session<'a> {
    pub fn new(fields: &'a [FieldSchema], store: &'a mut ConfigStore) -> Self {
        Self {
            fields,
            store,
            mask_char: '*',
            backup: None,
            backed_up: false,
        }
    }

    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Back up the env file once, before the first write that changes it.
    pub fn with_backup(mut self, manager: BackupManager) -> Self {
        self.backup = Some(manager);
        self
    }

    pub fn run(&mut self, keys: &mut dyn KeySource, renderer: &mut dyn Renderer) -> Result<SessionReport> {
        let mut report = SessionReport::default();
        let fields = self.fields;
        let mut index = 0;

        while let Some(field) = fields.get(index) {
            let current = self
                .store
                .read_key(&field.key)
                .with_context(|| format!("Failed to read {}", field.key))?;

            let options = FieldOptions {
                is_first: index == 0,
                mask_char: self.mask_char,
            };
            let result = FieldPrompt::new(field, current.clone(), options).run(keys, renderer)?;

            match result {
                FieldResult::Commit(value) => {
                    let written = current.as_deref() != Some(value.as_str())
                        && self.commit(&field.key, &value)?;
                    tracing::info!(field = %field.key, written, "field committed");
                    report.record(&field.key, FieldStatus::Committed { value, written });
                    index += 1;
                }
                FieldResult::Skip => {
                    tracing::info!(field = %field.key, "field skipped");
                    report.record(&field.key, FieldStatus::Skipped);
                    index += 1;
                }
                FieldResult::Previous => {
                    tracing::info!(field = %field.key, "back to previous field");
                    index = index.saturating_sub(1);
                }
                FieldResult::Cancelled => {
                    tracing::info!(field = %field.key, "session cancelled");
                    report.cancelled = true;
                    return Ok(report);
                }
            }
        }

        Ok(report)
    }

    fn commit(&mut self, key: &str, value: &str) -> Result<bool> {
        if !self.backed_up && self.store.path().exists() {
            if let Some(manager) = &self.backup {
                manager.create_backup(self.store.path())?;
            }
            self.backed_up = true;
        }

        let outcome = self
            .store
            .write(key, value)
            .with_context(|| format!("Failed to write {}", key))?;
        Ok(outcome == WriteOutcome::Written)
    }
}
