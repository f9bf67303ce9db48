//! Small shared helpers

pub mod path;
pub mod strings;
