//! Error types shared by the store, schema and prompt layers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An identifier that does not match `^[A-Za-z_][A-Za-z0-9_]*$`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid variable name '{key}': must match [A-Za-z_][A-Za-z0-9_]*")]
pub struct KeyNameError {
    pub key: String,
}

impl KeyNameError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Errors surfaced by [`crate::store::ConfigStore`].
///
/// A missing backing file is not an error; it reads as an empty document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    KeyName(#[from] KeyNameError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A candidate value rejected by [`crate::schema::FieldSchema::process`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while loading a schema file.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Schema has no [fields] table")]
    MissingFields,

    #[error(transparent)]
    KeyName(#[from] KeyNameError),

    #[error("Field '{key}': {message}")]
    Field { key: String, message: String },

    #[error("Field '{key}': no converter recognizes this definition")]
    Unrecognized { key: String },
}

impl SchemaError {
    pub fn field(key: &str, message: impl Into<String>) -> Self {
        SchemaError::Field {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
