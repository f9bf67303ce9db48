//! # Parser Module
//!
//! Turns `.env` text into [`Line`]s.
//!
//! ## Architecture Overview
//!
//! ```text
//! parser/
//! ├── mod.rs       - This file: line grammar + document parsing
//! ├── patterns.rs  - Regex patterns (KEY_NAME_RE, EXPORT_PREFIX_RE)
//! └── quoted.rs    - Value region decoding (quotes, escapes, inline comments)
//! ```
//!
//! ## Line Grammar
//!
//! 1. Strip a trailing `\r`
//! 2. Blank, or `#` after trimming: not an assignment
//! 3. Strip a leading `export ` token
//! 4. Split on the first `=`; the trimmed left side is the key (empty key:
//!    not an assignment, no `=`: not an assignment)
//! 5. Decode the right side with [`quoted::decode_region`]
//!
//! Lines that are not assignments are kept verbatim and never reported.
//!
//! ## Usage
//!
//! ```rust
//! use envwiz::parser::parse_document;
//!
//! let lines = parse_document("# db\nexport DB_HOST=localhost # local\n");
//! let db = lines[1].as_assignment().unwrap();
//! assert_eq!(db.key, "DB_HOST");
//! assert_eq!(db.value, "localhost");
//! assert!(db.has_export_prefix);
//! ```

pub mod patterns;
pub mod quoted;

pub use patterns::is_valid_key;

use crate::model::{Assignment, Line};
use crate::utils::strings::split_lines_preserve_trailing;
use patterns::EXPORT_PREFIX_RE;

/// Parse one physical line (without its `\n`).
pub fn parse_line(line_index: usize, raw: &str) -> Line {
    let (body, carriage_return) = match raw.strip_suffix('\r') {
        Some(body) => (body, true),
        None => (raw, false),
    };

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Text(raw.to_string());
    }

    let indent = body.len() - body.trim_start().len();
    let after_indent = &body[indent..];
    let export_len = EXPORT_PREFIX_RE
        .find(after_indent)
        .map(|m| m.end())
        .unwrap_or(0);
    let rest = &after_indent[export_len..];

    let Some(eq) = rest.find('=') else {
        return Line::Text(raw.to_string());
    };

    let key = rest[..eq].trim();
    if key.is_empty() {
        return Line::Text(raw.to_string());
    }

    let region_start = indent + export_len + eq + 1;
    let region = quoted::decode_region(&body[region_start..]);

    Line::Assignment(Assignment {
        key: key.to_string(),
        value: region.value,
        raw_value: region.raw,
        line_index,
        leading_whitespace: body[..indent].to_string(),
        has_export_prefix: export_len > 0,
        trailing_comment: region.comment,
        prefix: body[..region_start + region.value_offset].to_string(),
        carriage_return,
        raw_line: raw.to_string(),
    })
}

/// Parse a whole document into lines.
///
/// A single trailing newline terminates the last line; additional trailing
/// newlines are kept as blank lines.
pub fn parse_document(content: &str) -> Vec<Line> {
    split_lines_preserve_trailing(content)
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_line(i, raw))
        .collect()
}
