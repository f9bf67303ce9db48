//! # Regex Patterns
//!
//! Patterns for the `.env` line grammar.
//!
//! Everything else in the grammar (quote matching, comment boundaries) is a
//! character scan in `quoted.rs`, since `regex` has no backreferences to
//! match a closing quote against its opener.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Valid variable name: `FOO`, `_foo`, `Foo_2`
    pub static ref KEY_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();

    /// Leading `export` keyword followed by whitespace
    ///
    /// `export=1` is an assignment to a variable named `export`, so the
    /// keyword only counts when whitespace follows it.
    pub static ref EXPORT_PREFIX_RE: Regex = Regex::new(r"^export\s+").unwrap();
}

/// Check whether `key` is a valid variable name.
pub fn is_valid_key(key: &str) -> bool {
    KEY_NAME_RE.is_match(key)
}
