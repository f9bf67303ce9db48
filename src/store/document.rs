//! In-memory `.env` document with last-assignment-wins lookups

use std::collections::{HashMap, HashSet};

use crate::formatter::{encode_value, render_assignment};
use crate::model::{Assignment, Line};
use crate::parser::{parse_document, parse_line};

/// Ordered lines of a `.env` file.
///
/// Reads resolve duplicates to the bottom-most assignment. Writes update that
/// same assignment in place, or append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<Line>,
}

impl ConfigDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: parse_document(content),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Assignments from the bottom of the document up.
    fn assignments_rev(&self) -> impl Iterator<Item = &Assignment> {
        self.lines.iter().rev().filter_map(Line::as_assignment)
    }

    /// Find the effective assignment for `key`.
    pub fn find(&self, key: &str) -> Option<&Assignment> {
        self.assignments_rev().find(|a| a.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|a| a.value.as_str())
    }

    /// Every effective key/value pair.
    pub fn get_all(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        for a in self.assignments_rev() {
            values
                .entry(a.key.clone())
                .or_insert_with(|| a.value.clone());
        }
        values
    }

    /// Resolve several keys in one bottom-up pass.
    ///
    /// Duplicate requests are collapsed; the result follows the order of
    /// first request and holds `None` for keys with no assignment.
    pub fn get_many(&self, keys: &[&str]) -> Vec<(String, Option<String>)> {
        let mut order: Vec<&str> = Vec::with_capacity(keys.len());
        for &key in keys {
            if !order.contains(&key) {
                order.push(key);
            }
        }

        let mut pending: HashSet<&str> = order.iter().copied().collect();
        let mut found: HashMap<&str, &str> = HashMap::with_capacity(order.len());

        for a in self.assignments_rev() {
            if pending.is_empty() {
                break;
            }
            if pending.remove(a.key.as_str()) {
                found.insert(a.key.as_str(), a.value.as_str());
            }
        }

        order
            .into_iter()
            .map(|key| (key.to_string(), found.get(key).map(|v| v.to_string())))
            .collect()
    }

    /// Apply writes and return how many lines changed or were added.
    ///
    /// A repeated key keeps its first position and its last value. Existing
    /// keys whose value is already equal are left byte-for-byte untouched.
    pub fn apply(&mut self, writes: &[(&str, &str)]) -> usize {
        let mut order: Vec<(&str, &str)> = Vec::with_capacity(writes.len());
        for &(key, value) in writes {
            match order.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => order.push((key, value)),
            }
        }

        let mut pending: HashSet<&str> = order.iter().map(|(k, _)| *k).collect();
        let mut targets: HashMap<&str, usize> = HashMap::new();
        for (index, line) in self.lines.iter().enumerate().rev() {
            if pending.is_empty() {
                break;
            }
            if let Line::Assignment(a) = line {
                if let Some(key) = pending.take(a.key.as_str()) {
                    targets.insert(key, index);
                }
            }
        }

        let mut changed = 0;
        let mut appended: Vec<(&str, &str)> = Vec::new();

        for (key, value) in order {
            match targets.get(key) {
                Some(&index) => {
                    if self.replace_value(index, value) {
                        changed += 1;
                    }
                }
                None => appended.push((key, value)),
            }
        }

        if !appended.is_empty() {
            let eol = self.line_ending_suffix();
            // Appended block is set off from existing content by one blank line.
            if self.lines.last().is_some_and(|line| !line.is_blank()) {
                self.lines.push(Line::Text(eol.to_string()));
            }
            for (key, value) in appended {
                let index = self.lines.len();
                let text = format!("{}{}", render_assignment(key, value), eol);
                self.lines.push(parse_line(index, &text));
                changed += 1;
            }
        }

        changed
    }

    /// `"\r"` when the document uses CRLF endings, judged by its last line.
    fn line_ending_suffix(&self) -> &'static str {
        let crlf = match self.lines.last() {
            Some(Line::Text(text)) => text.ends_with('\r'),
            Some(Line::Assignment(a)) => a.carriage_return,
            None => false,
        };
        if crlf {
            "\r"
        } else {
            ""
        }
    }

    fn replace_value(&mut self, index: usize, value: &str) -> bool {
        let Some(Line::Assignment(current)) = self.lines.get(index) else {
            return false;
        };
        if current.value == value {
            return false;
        }
        let text = current.with_encoded_value(&encode_value(value));
        self.lines[index] = parse_line(index, &text);
        true
    }

    /// Serialize the document, always ending with exactly one newline.
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Text(text) => out.push_str(text),
                Line::Assignment(a) => out.push_str(&a.raw_line),
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_assignment_wins() {
        let mut doc = ConfigDocument::parse("FOO=1\nFOO=2\n");
        assert_eq!(doc.get("FOO"), Some("2"));

        assert_eq!(doc.apply(&[("FOO", "3")]), 1);
        assert_eq!(doc.render(), "FOO=1\nFOO=3\n");
    }

    #[test]
    fn test_get_all_uses_bottom_most() {
        let doc = ConfigDocument::parse("A=1\nB=2\nA=3\n# A=4\n");
        let all = doc.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all["A"], "3");
        assert_eq!(all["B"], "2");
    }

    #[test]
    fn test_get_many_keeps_request_order() {
        let doc = ConfigDocument::parse("A=1\nB=2\nC=3\n");
        let values = doc.get_many(&["C", "MISSING", "A", "C"]);
        assert_eq!(
            values,
            vec![
                ("C".to_string(), Some("3".to_string())),
                ("MISSING".to_string(), None),
                ("A".to_string(), Some("1".to_string())),
            ]
        );
    }

    #[test]
    fn test_apply_to_empty_document() {
        let mut doc = ConfigDocument::default();
        doc.apply(&[("A", "1"), ("B", "2")]);
        assert_eq!(doc.render(), "A=1\nB=2\n");
    }

    #[test]
    fn test_apply_preserves_comment_and_export() {
        let mut doc = ConfigDocument::parse("  export K=old # note\n");
        doc.apply(&[("K", "new value")]);
        assert_eq!(doc.render(), "  export K=\"new value\" # note\n");
    }

    #[test]
    fn test_apply_equal_value_untouched() {
        let mut doc = ConfigDocument::parse("K='same'   # keep\n");
        assert_eq!(doc.apply(&[("K", "same")]), 0);
        assert_eq!(doc.render(), "K='same'   # keep\n");
    }

    #[test]
    fn test_apply_mixed_update_and_append_order() {
        let mut doc = ConfigDocument::parse("B=old\n");
        doc.apply(&[("Z", "26"), ("B", "new"), ("A", "1")]);
        assert_eq!(doc.render(), "B=new\n\nZ=26\nA=1\n");
    }

    #[test]
    fn test_apply_repeated_key_last_value() {
        let mut doc = ConfigDocument::default();
        doc.apply(&[("A", "1"), ("B", "2"), ("A", "3")]);
        assert_eq!(doc.render(), "A=3\nB=2\n");
    }

    #[test]
    fn test_append_after_trailing_comment_adds_blank() {
        let mut doc = ConfigDocument::parse("A=1\n# optional settings\n");
        doc.apply(&[("B", "2")]);
        assert_eq!(doc.render(), "A=1\n# optional settings\n\nB=2\n");
    }

    #[test]
    fn test_render_preserves_untouched_lines() {
        let content = "# header\n\n  A = 'x y'  # c\nmalformed line\nB=\"q\\\"\"\nC=1   \n";
        let doc = ConfigDocument::parse(content);
        assert_eq!(doc.render(), content);
    }

    #[test]
    fn test_render_adds_trailing_newline() {
        let mut doc = ConfigDocument::parse("A=1");
        doc.apply(&[("B", "2")]);
        assert_eq!(doc.render(), "A=1\n\nB=2\n");
    }

    #[test]
    fn test_append_to_non_empty_adds_one_blank() {
        let mut doc = ConfigDocument::parse("A=1\n");
        assert_eq!(doc.apply(&[("B", "2"), ("C", "3")]), 2);
        assert_eq!(doc.render(), "A=1\n\nB=2\nC=3\n");

        // An existing blank last line already separates the block
        let mut doc = ConfigDocument::parse("A=1\n\n");
        doc.apply(&[("B", "2")]);
        assert_eq!(doc.render(), "A=1\n\nB=2\n");
    }

    #[test]
    fn test_append_keeps_crlf_endings() {
        let mut doc = ConfigDocument::parse("A=1\r\n");
        doc.apply(&[("B", "2")]);
        assert_eq!(doc.render(), "A=1\r\n\r\nB=2\r\n");
        assert_eq!(doc.get("B"), Some("2"));
    }
}
