//! CLI action implementations

pub mod backup;
pub mod get;
pub mod list;
pub mod prompt;
pub mod set;
