//! Inline terminal renderer
//!
//! Draws the prompt into a fixed-height viewport below the cursor instead of
//! taking over the screen. Settled fields are inserted above the viewport so
//! they stay in the scrollback.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Text},
    widgets::{Paragraph, Widget, Wrap},
    Terminal, TerminalOptions, Viewport,
};

use crate::prompt::Renderer;

pub struct InlineRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl InlineRenderer {
    /// Enter raw mode and reserve `height` rows. Raw mode is left on drop.
    pub fn new(height: u16) -> Result<Self> {
        enable_raw_mode()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = match Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height.max(3)),
            },
        ) {
            Ok(terminal) => terminal,
            Err(e) => {
                disable_raw_mode()?;
                return Err(e.into());
            }
        };
        Ok(Self { terminal })
    }
}

impl Renderer for InlineRenderer {
    fn draw(&mut self, view: &Text<'static>) -> Result<()> {
        self.terminal.draw(|f| {
            let area = f.size();
            f.render_widget(
                Paragraph::new(view.clone()).wrap(Wrap { trim: false }),
                area,
            );
        })?;
        Ok(())
    }

    fn settle(&mut self, summary: Line<'static>) -> Result<()> {
        self.terminal.insert_before(1, |buf| {
            let area = buf.area;
            Paragraph::new(summary).render(area, buf);
        })?;
        self.terminal.clear()?;
        Ok(())
    }
}

impl Drop for InlineRenderer {
    fn drop(&mut self) {
        let _ = self.terminal.clear();
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
    }
}
