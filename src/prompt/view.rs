//! View model for a field prompt
//!
//! The prompt is rendered as ratatui [`Text`]; a [`Renderer`] decides where it
//! goes (inline terminal viewport, or a plain stream).

use std::io::Write;

use anyhow::Result;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use super::field::{FieldPrompt, FieldResult, Slot, ToolbarAction};
use super::state::{Mode, Validation};

const HINT: &str = "↑↓ select · enter confirm · tab actions · ctrl+c cancel";

/// Output side of the interaction loop.
pub trait Renderer {
    /// Redraw the live prompt.
    fn draw(&mut self, view: &Text<'static>) -> Result<()>;

    /// Replace the live prompt with a one-line summary that stays on screen.
    fn settle(&mut self, summary: Line<'static>) -> Result<()>;
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn action_label(action: ToolbarAction) -> &'static str {
    match action {
        ToolbarAction::Skip => "[s]kip",
        ToolbarAction::Previous => "[p]revious",
        ToolbarAction::Reveal => "[r]eveal",
        ToolbarAction::Close => "[c]lose",
    }
}

fn header(prompt: &FieldPrompt) -> Line<'static> {
    let schema = prompt.schema();
    let mut spans = vec![
        Span::styled(
            "? ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            schema.key.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", schema.field_type), dim()),
    ];
    if !schema.required {
        spans.push(Span::styled(" optional", dim()));
    }
    if schema.secret {
        spans.push(Span::styled(" secret", dim()));
    }
    Line::from(spans)
}

fn slot_text(prompt: &FieldPrompt, slot: &Slot) -> Vec<Span<'static>> {
    let schema = prompt.schema();
    let substate = prompt.state().substate();
    match slot {
        Slot::Current(v) => vec![
            Span::raw(prompt.display(v)),
            Span::styled(" (current)", dim()),
        ],
        Slot::Default(v) => vec![
            Span::raw(prompt.display(v)),
            Span::styled(" (default)", dim()),
        ],
        Slot::Choice(v) => {
            let mut spans = vec![Span::raw(prompt.display(v))];
            if prompt.current() == Some(v.as_str()) {
                spans.push(Span::styled(" (current)", dim()));
            }
            if schema.default.as_deref() == Some(v.as_str()) {
                spans.push(Span::styled(" (default)", dim()));
            }
            spans
        }
        Slot::Custom if substate.mode == Mode::Typing => vec![
            Span::styled("Custom value: ", dim()),
            Span::raw(prompt.display(&substate.input_value)),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ],
        Slot::Custom => vec![Span::styled("Custom value…", dim())],
        Slot::Skip => vec![Span::styled("Skip", dim())],
    }
}

/// Build the live view for a field.
pub fn field_view(prompt: &FieldPrompt) -> Text<'static> {
    let schema = prompt.schema();
    let substate = prompt.state().substate();
    let computed = prompt.state().computed();
    let mut lines = vec![header(prompt)];

    if let Some(description) = &schema.description {
        lines.push(Line::from(Span::styled(format!("  {}", description), dim())));
    }

    for (index, slot) in prompt.slots().iter().enumerate() {
        let selected = index == substate.cursor;
        let marker = if selected {
            Span::styled("❯ ", Style::default().fg(Color::Cyan))
        } else {
            Span::raw("  ")
        };
        let mut spans = vec![marker];
        spans.extend(slot_text(prompt, slot));
        let mut line = Line::from(spans);
        if computed.should_dim_ui {
            line = line.style(dim());
        } else if selected {
            line = line.style(Style::default().fg(Color::Cyan));
        }
        lines.push(line);
    }

    if let Some(error) = prompt.error() {
        if substate.validation == Validation::Invalid {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {}", error),
                Style::default().fg(Color::Red),
            )));
        }
    }

    if substate.toolbar_open {
        let mut spans = vec![Span::raw("  ")];
        for (index, action) in prompt.toolbar_actions().into_iter().enumerate() {
            let style = if index == prompt.toolbar_cursor() {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(action_label(action), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    } else {
        lines.push(Line::from(Span::styled(format!("  {}", HINT), dim())));
    }

    Text::from(lines)
}

/// One-line record of how a field resolved.
pub fn summary_line(prompt: &FieldPrompt, result: &FieldResult) -> Line<'static> {
    let key = prompt.schema().key.clone();
    match result {
        FieldResult::Commit(value) => Line::from(vec![
            Span::styled("✔ ", Style::default().fg(Color::Green)),
            Span::styled(key, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" = "),
            Span::raw(prompt.display(value)),
        ]),
        FieldResult::Skip => Line::from(vec![
            Span::styled("↷ ", Style::default().fg(Color::Yellow)),
            Span::raw(key),
            Span::styled(" skipped", dim()),
        ]),
        FieldResult::Previous => Line::from(vec![
            Span::styled("↑ ", dim()),
            Span::styled(key, dim()),
        ]),
        FieldResult::Cancelled => Line::from(vec![
            Span::styled("✗ ", Style::default().fg(Color::Red)),
            Span::raw(key),
            Span::styled(" cancelled", dim()),
        ]),
    }
}

/// Flatten a line to its text content.
pub fn line_to_plain(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

pub fn text_to_plain(text: &Text) -> String {
    text.lines
        .iter()
        .map(line_to_plain)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes frames as plain text, skipping frames identical to the last one.
pub struct PlainRenderer<W: Write> {
    out: W,
    last: Option<String>,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn draw(&mut self, view: &Text<'static>) -> Result<()> {
        let frame = text_to_plain(view);
        if self.last.as_deref() != Some(frame.as_str()) {
            writeln!(self.out, "{}", frame)?;
            self.out.flush()?;
            self.last = Some(frame);
        }
        Ok(())
    }

    fn settle(&mut self, summary: Line<'static>) -> Result<()> {
        writeln!(self.out, "{}", line_to_plain(&summary))?;
        self.out.flush()?;
        self.last = None;
        Ok(())
    }
}
