//! Event handling for the terminal

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::prompt::{KeyName, KeyPress, KeySource};

/// Convert a crossterm key event; `None` for releases and repeats.
pub fn to_key_press(key: KeyEvent) -> Option<KeyPress> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let (name, character) = match key.code {
        KeyCode::Char(c) => (KeyName::Char, Some(c)),
        KeyCode::Enter => (KeyName::Enter, None),
        KeyCode::Tab => (KeyName::Tab, None),
        KeyCode::BackTab => (KeyName::BackTab, None),
        KeyCode::Esc => (KeyName::Escape, None),
        KeyCode::Backspace => (KeyName::Backspace, None),
        KeyCode::Up => (KeyName::Up, None),
        KeyCode::Down => (KeyName::Down, None),
        KeyCode::Left => (KeyName::Left, None),
        KeyCode::Right => (KeyName::Right, None),
        _ => (KeyName::Other, None),
    };

    Some(KeyPress {
        character,
        name,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        meta: key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::META),
    })
}

/// Blocking key source over the process terminal. Expects raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Option<KeyPress>> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(press) = to_key_press(key) {
                    return Ok(Some(press));
                }
            }
        }
    }
}
