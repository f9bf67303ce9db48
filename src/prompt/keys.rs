//! Key events as seen by the prompt

use std::collections::VecDeque;

use anyhow::Result;

/// Named keys the prompt reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    Char,
    Enter,
    Tab,
    BackTab,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Other,
}

/// A single key press, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub character: Option<char>,
    pub name: KeyName,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn char(c: char) -> Self {
        Self {
            character: Some(c),
            name: KeyName::Char,
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            ctrl: true,
            ..Self::char(c)
        }
    }

    pub fn named(name: KeyName) -> Self {
        Self {
            character: None,
            name,
            ctrl: false,
            meta: false,
        }
    }

    /// Character that should be inserted into the input, if any.
    pub fn printable(&self) -> Option<char> {
        match self.character {
            Some(c) if self.name == KeyName::Char && !self.ctrl && !self.meta && !c.is_control() => {
                Some(c)
            }
            _ => None,
        }
    }

    /// Ctrl+C and Ctrl+D abort the whole session.
    pub fn is_cancel(&self) -> bool {
        self.ctrl && matches!(self.character, Some('c') | Some('d'))
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.ctrl && self.character == Some(c)
    }
}

/// Something that yields key presses.
///
/// `Ok(None)` means the source is exhausted (input closed).
pub trait KeySource {
    fn next_key(&mut self) -> Result<Option<KeyPress>>;
}

/// Pre-recorded key presses, used for non-interactive runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyPress>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: KeyPress) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn named(self, name: KeyName) -> Self {
        self.key(KeyPress::named(name))
    }

    /// Type every character of `text`.
    pub fn text(mut self, text: &str) -> Self {
        self.keys.extend(text.chars().map(KeyPress::char));
        self
    }

    pub fn enter(self) -> Self {
        self.named(KeyName::Enter)
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Option<KeyPress>> {
        Ok(self.keys.pop_front())
    }
}
