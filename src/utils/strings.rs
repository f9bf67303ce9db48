//! String utility functions

/// Split a string into lines, keeping trailing empty lines.
///
/// A single final `\n` terminates the last line rather than starting a new
/// one, so `"a\n"` is one line and `"a\n\n"` is two.
///
/// ```
/// use envwiz::utils::strings::split_lines_preserve_trailing;
///
/// assert_eq!(split_lines_preserve_trailing("a\nb"), vec!["a", "b"]);
/// assert_eq!(split_lines_preserve_trailing("a\n"), vec!["a"]);
/// assert_eq!(split_lines_preserve_trailing("a\n\n"), vec!["a", ""]);
/// assert_eq!(split_lines_preserve_trailing(""), Vec::<&str>::new());
/// ```
pub fn split_lines_preserve_trailing(s: &str) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }
    s.strip_suffix('\n').unwrap_or(s).split('\n').collect()
}

/// Replace every character with `mask_char`.
pub fn mask(value: &str, mask_char: char) -> String {
    std::iter::repeat(mask_char)
        .take(value.chars().count())
        .collect()
}

/// Cut `s` to at most `width` characters, ending with `…` when shortened.
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trailing_lines() {
        assert_eq!(split_lines_preserve_trailing("hello"), vec!["hello"]);
        assert_eq!(split_lines_preserve_trailing("hello\n"), vec!["hello"]);
        assert_eq!(
            split_lines_preserve_trailing("# Comment\n\n\n"),
            vec!["# Comment", "", ""]
        );
        assert_eq!(split_lines_preserve_trailing("\n"), vec![""]);
        assert_eq!(split_lines_preserve_trailing("\n\n"), vec!["", ""]);
    }

    #[test]
    fn test_split_keeps_carriage_returns() {
        assert_eq!(split_lines_preserve_trailing("A=1\r\nB=2\r\n"), vec!["A=1\r", "B=2\r"]);
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("s3cr3t", '*'), "******");
        assert_eq!(mask("", '*'), "");
        assert_eq!(mask("äb", '•'), "••");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
