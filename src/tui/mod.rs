//! Terminal backend for interactive prompts

pub mod event;
pub mod render;

pub use event::TerminalKeys;
pub use render::InlineRenderer;
