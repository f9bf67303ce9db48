//! Formatter module for `.env` values
//!
//! The inverse of [`crate::parser::quoted`]: values that would not survive a
//! round trip unquoted are wrapped in double quotes with escapes applied.

/// Check whether a value must be double-quoted to read back unchanged.
///
/// An empty value is written bare (`KEY=`), which already reads back as empty.
pub fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#'))
}

/// Escape a value for use inside double quotes.
pub fn escape_double(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

/// Encode a value for the right side of `=`.
pub fn encode_value(value: &str) -> String {
    if needs_quotes(value) {
        format!("\"{}\"", escape_double(value))
    } else {
        value.to_string()
    }
}

/// Format a fresh `KEY=VALUE` line.
pub fn render_assignment(key: &str, value: &str) -> String {
    format!("{}={}", key, encode_value(value))
}
