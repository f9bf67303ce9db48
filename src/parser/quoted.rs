//! # Value Region Decoding
//!
//! Splits the text right of `=` into the value and an optional inline
//! comment, then removes quoting.
//!
//! ## Rules
//!
//! | Form | Example | Decoded |
//! |------|---------|---------|
//! | Double-quoted | `"a\"b\n"` | escapes `\\ \n \r \t \"` resolved |
//! | Single-quoted | `'a\nb'` | inner text taken literally |
//! | Unquoted | `a b # c` | cut at the first ` #`, trimmed |
//!
//! ## Comment Boundary
//!
//! A quoted value is scanned for its closing quote first and the comment
//! search starts after it, so `"a # b"` keeps its `#`. In unquoted values the
//! first ` #` always starts a comment, even if the user meant it as data:
//! `URL=http://x/ #frag` reads as `http://x/`. A `#` with no space before it
//! (`COLOR=#fff`) is data.

/// A decoded value region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRegion {
    /// Decoded value
    pub value: String,
    /// Value as written (quotes and escapes intact, comment removed, trimmed)
    pub raw: String,
    /// Byte offset in the region where the written value starts
    pub value_offset: usize,
    /// Inline comment with its preceding whitespace, e.g. `"  # note"`
    pub comment: Option<String>,
}

/// Find the byte index of the quote that closes the one at position 0.
///
/// Inside double quotes a backslash escapes the next character; single
/// quotes have no escapes.
pub fn closing_quote(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, open) = chars.next()?;
    if open != '"' && open != '\'' {
        return None;
    }

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if open == '"' => {
                chars.next();
            }
            c if c == open => return Some(i),
            _ => {}
        }
    }
    None
}

/// Resolve backslash escapes inside a double-quoted value.
///
/// Unknown sequences such as `\x` are kept as written.
pub fn unescape_double(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Remove matching outer quotes from a trimmed value.
fn unquote(raw: &str) -> String {
    if raw.len() >= 2 {
        if raw.starts_with('"') && raw.ends_with('"') {
            return unescape_double(&raw[1..raw.len() - 1]);
        }
        if raw.starts_with('\'') && raw.ends_with('\'') {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    raw.to_string()
}

/// Decode the text right of the first `=` on an assignment line.
pub fn decode_region(region: &str) -> ValueRegion {
    let lead = region.len() - region.trim_start().len();
    let body = &region[lead..];

    // A quoted value's comment search starts after its closing quote.
    let search_from = if body.starts_with('"') || body.starts_with('\'') {
        closing_quote(body).map(|end| lead + end + 1)
    } else {
        Some(0)
    };

    let boundary = search_from
        .and_then(|from| region[from..].find(" #").map(|pos| from + pos))
        .unwrap_or(region.len());

    let before = &region[..boundary];
    let value_end = before.trim_end().len();
    let value_offset = lead.min(value_end);
    let raw = region[value_offset..value_end].to_string();

    let comment = if boundary < region.len() {
        Some(region[value_end..].trim_end().to_string())
    } else {
        None
    };

    ValueRegion {
        value: unquote(&raw),
        raw,
        value_offset,
        comment,
    }
}
