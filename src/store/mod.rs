//! Buffered reader/writer over a `.env` file
//!
//! The file is parsed on first access and kept in memory. Every write
//! mutates a copy of the document, serializes it in full, and replaces the
//! file in one rename; the in-memory copy is only swapped in after the
//! replace succeeded. A write that changes nothing touches nothing.

mod document;

pub use document::ConfigDocument;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{KeyNameError, StoreError};
use crate::parser::is_valid_key;

/// Result of a write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File content was replaced
    Written,
    /// Serialized content matched the file; nothing was written
    Unchanged,
}

/// Validate a variable name.
pub fn validate_key(key: &str) -> Result<(), KeyNameError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(KeyNameError::new(key))
    }
}

struct Loaded {
    document: ConfigDocument,
    content: String,
}

/// `.env` store bound to one file path.
///
/// Not synchronized: one logical caller drives a store at a time.
pub struct ConfigStore {
    path: PathBuf,
    loaded: Option<Loaded>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&mut self) -> Result<&mut Loaded, StoreError> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => self.read_file()?,
        };
        Ok(self.loaded.insert(loaded))
    }

    fn read_file(&self) -> Result<Loaded, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "env file absent, starting empty");
                String::new()
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document = ConfigDocument::parse(&content);
        tracing::debug!(
            path = %self.path.display(),
            lines = document.lines().len(),
            "loaded env file"
        );
        Ok(Loaded { document, content })
    }

    /// Every effective key/value pair (bottom-most assignment per key).
    pub fn read(&mut self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.load()?.document.get_all())
    }

    /// Value of the bottom-most assignment for `key`.
    pub fn read_key(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.load()?.document.get(key).map(str::to_string))
    }

    /// Values for `keys` in request order, duplicates collapsed.
    pub fn read_keys(&mut self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, StoreError> {
        for key in keys {
            validate_key(key)?;
        }
        Ok(self.load()?.document.get_many(keys))
    }

    /// Set one variable.
    pub fn write(&mut self, key: &str, value: &str) -> Result<WriteOutcome, StoreError> {
        self.write_all(&[(key, value)])
    }

    /// Set several variables in a single file replacement.
    ///
    /// Existing keys are updated in place on their bottom-most line; new keys
    /// are appended in the given order.
    pub fn write_all(&mut self, entries: &[(&str, &str)]) -> Result<WriteOutcome, StoreError> {
        for (key, _) in entries {
            validate_key(key)?;
        }

        let path = self.path.clone();
        let loaded = self.load()?;

        let mut document = loaded.document.clone();
        if document.apply(entries) == 0 {
            tracing::debug!(path = %path.display(), "write skipped, values unchanged");
            return Ok(WriteOutcome::Unchanged);
        }

        let content = document.render();
        if content == loaded.content {
            tracing::debug!(path = %path.display(), "write skipped, content identical");
            return Ok(WriteOutcome::Unchanged);
        }

        replace_file(&path, &content).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), keys = entries.len(), "env file written");
        loaded.document = document;
        loaded.content = content;
        Ok(WriteOutcome::Written)
    }
}

/// Replace `path` with `content` through a temp file in the same directory.
fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
