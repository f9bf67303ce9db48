//! Line-level data structures for `.env` documents

/// One parsed `KEY=VALUE` line.
///
/// # Field Semantics
/// - `key`: Identifier left of the first `=`, trimmed
/// - `value`: Decoded value (quotes removed, escapes resolved, inline comment dropped)
/// - `raw_value`: Value text exactly as written, without any inline comment
/// - `prefix`: Everything before the value: indentation, `export `, key, `=`, spacing
/// - `trailing_comment`: Inline comment including the whitespace that precedes `#`
/// - `raw_line`: The line as read, used verbatim until the value changes
///
/// `prefix` + encoded value + `trailing_comment` reproduces the line, which is
/// how in-place updates keep indentation, the export prefix and comments intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
    pub raw_value: String,
    pub line_index: usize,
    pub leading_whitespace: String,
    pub has_export_prefix: bool,
    pub trailing_comment: Option<String>,
    pub prefix: String,
    pub carriage_return: bool,
    pub raw_line: String,
}

impl Assignment {
    /// Rebuild the source text of this line with a new encoded value.
    pub fn with_encoded_value(&self, encoded: &str) -> String {
        let mut line = String::with_capacity(self.prefix.len() + encoded.len() + 8);
        line.push_str(&self.prefix);
        line.push_str(encoded);
        if let Some(comment) = &self.trailing_comment {
            line.push_str(comment);
        }
        if self.carriage_return {
            line.push('\r');
        }
        line
    }
}

/// A single physical line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Comment, blank or malformed line, kept verbatim
    Text(String),
    Assignment(Assignment),
}

impl Line {
    pub fn as_assignment(&self) -> Option<&Assignment> {
        match self {
            Line::Assignment(a) => Some(a),
            Line::Text(_) => None,
        }
    }

    /// Check if this line is blank (whitespace only).
    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Text(text) if text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        Assignment {
            key: "PORT".into(),
            value: "80".into(),
            raw_value: "80".into(),
            line_index: 0,
            leading_whitespace: "  ".into(),
            has_export_prefix: true,
            trailing_comment: Some("  # http".into()),
            prefix: "  export PORT=".into(),
            carriage_return: false,
            raw_line: "  export PORT=80  # http".into(),
        }
    }

    #[test]
    fn test_with_encoded_value_keeps_layout() {
        assert_eq!(
            sample().with_encoded_value("8080"),
            "  export PORT=8080  # http"
        );
    }

    #[test]
    fn test_with_encoded_value_keeps_carriage_return() {
        let mut a = sample();
        a.trailing_comment = None;
        a.carriage_return = true;
        assert_eq!(a.with_encoded_value("1"), "  export PORT=1\r");
    }

    #[test]
    fn test_line_classification() {
        assert!(Line::Text("   ".into()).is_blank());
        assert!(!Line::Text("  # note".into()).is_blank());
        assert!(!Line::Assignment(sample()).is_blank());
        assert!(Line::Assignment(sample()).as_assignment().is_some());
    }
}
