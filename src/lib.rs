//! envwiz - Interactive .env file manager
//!
//! Reads and writes `.env` files without disturbing their formatting, and
//! walks a user through every variable a schema describes.
//!
//! # Features
//!
//! - Format-preserving `.env` reads and writes (comments, `export`, quoting)
//! - Last-assignment-wins lookups and in-place updates
//! - Schema files with typed, optional, secret and enum fields
//! - Interactive per-field prompts with masking, validation and a toolbar
//! - Automatic backups

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod store;
pub mod tui;
pub mod utils;

pub use error::{KeyNameError, SchemaError, StoreError, ValidationError};
pub use model::{Assignment, Config, Line};
pub use schema::{FieldSchema, FieldType, FieldValue};
pub use session::{Session, SessionReport};
pub use store::{ConfigDocument, ConfigStore, WriteOutcome};
