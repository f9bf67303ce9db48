//! Interactive per-field prompt
//!
//! - [`state`]: the owned state machine and its observers
//! - [`keys`]: backend-independent key events and sources
//! - [`field`]: the interaction loop binding a schema to a state machine
//! - [`view`]: view model and renderers

pub mod field;
pub mod keys;
pub mod state;
pub mod view;

pub use field::{FieldOptions, FieldPrompt, FieldResult, Slot, ToolbarAction};
pub use keys::{KeyName, KeyPress, KeySource, ScriptedKeys};
pub use state::{PromptObserver, PromptState};
pub use view::{PlainRenderer, Renderer};
