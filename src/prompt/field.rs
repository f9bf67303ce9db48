//! One field's interactive loop
//!
//! A [`FieldPrompt`] owns a [`PromptState`] and maps key presses onto its
//! transitions. Rendering is delegated to a [`Renderer`]; the prompt only
//! builds the view model.

use anyhow::Result;

use super::keys::{KeyName, KeyPress, KeySource};
use super::state::{
    Direction, Intention, Mode, PromptConfig, PromptObserver, PromptState, SecretVisibility,
    TraceObserver, Validation,
};
use super::view::{self, Renderer};
use crate::schema::FieldSchema;

/// What a field resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResult {
    Commit(String),
    Skip,
    Previous,
    /// Ctrl+C / Ctrl+D, or the key source ran dry
    Cancelled,
}

/// A selectable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Value currently in the file
    Current(String),
    /// Schema default
    Default(String),
    /// One enum option
    Choice(String),
    /// Free-entry slot
    Custom,
    Skip,
}

impl Slot {
    /// Literal value this slot submits, if it is a fixed slot.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Slot::Current(v) | Slot::Default(v) | Slot::Choice(v) => Some(v),
            Slot::Custom | Slot::Skip => None,
        }
    }
}

/// Overlay actions reachable with Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Skip,
    Previous,
    Reveal,
    Close,
}

impl ToolbarAction {
    pub fn hotkey(self) -> char {
        match self {
            ToolbarAction::Skip => 's',
            ToolbarAction::Previous => 'p',
            ToolbarAction::Reveal => 'r',
            ToolbarAction::Close => 'c',
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldOptions {
    /// First field of the session; hides "previous"
    pub is_first: bool,
    pub mask_char: char,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            is_first: true,
            mask_char: '*',
        }
    }
}

pub struct FieldPrompt<'a> {
    schema: &'a FieldSchema,
    current: Option<String>,
    slots: Vec<Slot>,
    state: PromptState,
    error: Option<String>,
    toolbar_cursor: usize,
    options: FieldOptions,
}

/// Build the slot list for a field.
///
/// Enum fields list their options (plus the current value when it is not one
/// of them); other fields offer the current value and a differing default.
pub fn build_slots(schema: &FieldSchema, current: Option<&str>) -> Vec<Slot> {
    let mut slots = Vec::new();
    let options = schema.field_type.options();

    if options.is_empty() {
        if let Some(current) = current {
            slots.push(Slot::Current(current.to_string()));
        }
        if let Some(default) = &schema.default {
            if current != Some(default.as_str()) {
                slots.push(Slot::Default(default.clone()));
            }
        }
    } else {
        if let Some(current) = current.filter(|c| !options.iter().any(|o| o == c)) {
            slots.push(Slot::Current(current.to_string()));
        }
        slots.extend(options.iter().cloned().map(Slot::Choice));
    }

    slots.push(Slot::Custom);
    if !schema.required {
        slots.push(Slot::Skip);
    }
    slots
}

/// Cursor priority: current value, then default, then the free-entry slot.
fn initial_cursor(slots: &[Slot], current: Option<&str>, default: Option<&str>) -> usize {
    let position_of = |wanted: Option<&str>| {
        wanted.and_then(|w| slots.iter().position(|s| s.literal() == Some(w)))
    };
    position_of(current)
        .or_else(|| position_of(default))
        .or_else(|| slots.iter().position(|s| *s == Slot::Custom))
        .unwrap_or(0)
}

impl<'a> FieldPrompt<'a> {
    pub fn new(schema: &'a FieldSchema, current: Option<String>, options: FieldOptions) -> Self {
        let slots = build_slots(schema, current.as_deref());
        let cursor = initial_cursor(&slots, current.as_deref(), schema.default.as_deref());
        let mut state = PromptState::new(PromptConfig {
            has_fixed_slots: slots.iter().any(|s| s.literal().is_some()),
            secret: schema.secret,
            initial_cursor: cursor,
        });
        state.subscribe(Box::new(TraceObserver {
            field: schema.key.clone(),
        }));

        Self {
            schema,
            current,
            slots,
            state,
            error: None,
            toolbar_cursor: 0,
            options,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn PromptObserver>) {
        self.state.subscribe(observer);
    }

    pub fn schema(&self) -> &FieldSchema {
        self.schema
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn toolbar_cursor(&self) -> usize {
        self.toolbar_cursor
    }

    fn custom_index(&self) -> usize {
        self.slots
            .iter()
            .position(|s| *s == Slot::Custom)
            .unwrap_or(0)
    }

    pub fn cursor_slot(&self) -> Option<&Slot> {
        self.slots.get(self.state.substate().cursor)
    }

    /// Candidate under the cursor: the draft while typing, otherwise the
    /// literal of the selected slot (empty for custom/skip).
    pub fn value(&self) -> String {
        let substate = self.state.substate();
        match substate.mode {
            Mode::Typing => substate.input_value.clone(),
            Mode::Selection => self
                .cursor_slot()
                .and_then(Slot::literal)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Text as it should appear on screen, masked for hidden secrets.
    pub fn display(&self, text: &str) -> String {
        match self.state.substate().secret_visibility {
            SecretVisibility::Hidden => self
                .options
                .mask_char
                .to_string()
                .repeat(text.chars().count()),
            _ => text.to_string(),
        }
    }

    pub fn toolbar_actions(&self) -> Vec<ToolbarAction> {
        let mut actions = Vec::new();
        if !self.schema.required {
            actions.push(ToolbarAction::Skip);
        }
        if !self.options.is_first {
            actions.push(ToolbarAction::Previous);
        }
        if self.schema.secret {
            actions.push(ToolbarAction::Reveal);
        }
        actions.push(ToolbarAction::Close);
        actions
    }

    /// Process one key to completion. Returns the result once the field
    /// resolves.
    pub fn handle_key(&mut self, key: &KeyPress) -> Option<FieldResult> {
        if key.is_cancel() {
            return Some(FieldResult::Cancelled);
        }

        let toolbar_was_open = self.state.substate().toolbar_open;
        let result = if toolbar_was_open {
            self.handle_toolbar_key(key)
        } else {
            self.handle_field_key(key)
        };

        if result.is_none() && key.name == KeyName::Enter && !toolbar_was_open {
            return self.submit();
        }

        // One-shot: only the event that set it may observe it.
        self.state.clear_consume_submit();
        result
    }

    fn handle_field_key(&mut self, key: &KeyPress) -> Option<FieldResult> {
        let typing = self.state.substate().mode == Mode::Typing;

        if let Some(c) = key.printable() {
            if typing {
                let mut input = self.state.substate().input_value.clone();
                input.push(c);
                self.state.update_input(&input);
            } else {
                self.state.set_cursor(self.custom_index());
                self.state.enter_typing(&c.to_string());
            }
            return None;
        }

        match key.name {
            KeyName::Tab => {
                self.state.suppress_validation();
                self.state.open_toolbar();
                self.toolbar_cursor = 0;
            }
            KeyName::Up | KeyName::Down => {
                if typing {
                    self.state.exit_typing();
                    self.error = None;
                }
                let direction = if key.name == KeyName::Up {
                    Direction::Up
                } else {
                    Direction::Down
                };
                self.state
                    .move_cursor(direction, self.slots.len().saturating_sub(1));
            }
            KeyName::Escape if typing => {
                self.state.exit_typing();
                self.error = None;
            }
            KeyName::Backspace if typing => {
                let mut input = self.state.substate().input_value.clone();
                input.pop();
                self.state.update_input(&input);
            }
            KeyName::Char if typing && key.is_ctrl('u') => {
                self.state.clear_input();
            }
            _ => {}
        }
        None
    }

    fn handle_toolbar_key(&mut self, key: &KeyPress) -> Option<FieldResult> {
        let actions = self.toolbar_actions();
        match key.name {
            KeyName::Tab | KeyName::Escape => {
                self.run_action(ToolbarAction::Close);
                None
            }
            KeyName::Left | KeyName::BackTab => {
                self.toolbar_cursor = (self.toolbar_cursor + actions.len() - 1) % actions.len();
                None
            }
            KeyName::Right => {
                self.toolbar_cursor = (self.toolbar_cursor + 1) % actions.len();
                None
            }
            KeyName::Enter => {
                let action = actions[self.toolbar_cursor.min(actions.len() - 1)];
                self.run_action(action)
            }
            KeyName::Char if !key.ctrl => {
                let action = actions
                    .iter()
                    .copied()
                    .find(|a| key.character == Some(a.hotkey()))?;
                self.run_action(action)
            }
            _ => None,
        }
    }

    fn run_action(&mut self, action: ToolbarAction) -> Option<FieldResult> {
        tracing::debug!(field = %self.schema.key, ?action, "toolbar action");
        self.state.restore_validation();
        self.state.close_toolbar();
        match action {
            ToolbarAction::Skip => {
                self.state.set_intention(Intention::Skip);
                Some(FieldResult::Skip)
            }
            ToolbarAction::Previous => {
                self.state.set_intention(Intention::Previous);
                Some(FieldResult::Previous)
            }
            ToolbarAction::Reveal => {
                self.state.toggle_secret_visibility();
                None
            }
            ToolbarAction::Close => None,
        }
    }

    fn submit(&mut self) -> Option<FieldResult> {
        if !self.state.computed().can_submit {
            self.state.clear_consume_submit();
            return None;
        }

        let candidate = match self.state.substate().mode {
            Mode::Typing => self.state.substate().input_value.clone(),
            Mode::Selection => match self.cursor_slot().cloned() {
                Some(Slot::Custom) => {
                    self.state.enter_typing("");
                    return None;
                }
                Some(Slot::Skip) => {
                    self.state.set_intention(Intention::Skip);
                    return Some(FieldResult::Skip);
                }
                Some(slot) => slot.literal().unwrap_or_default().to_string(),
                None => return None,
            },
        };
        self.attempt_commit(&candidate)
    }

    fn attempt_commit(&mut self, candidate: &str) -> Option<FieldResult> {
        match self.schema.process(candidate) {
            Ok(value) => {
                self.error = None;
                self.state.set_validation_state(Validation::Valid);
                Some(FieldResult::Commit(value.to_string()))
            }
            Err(err) => {
                tracing::debug!(field = %self.schema.key, error = %err, "validation failed");
                self.error = Some(err.message);
                self.state.set_validation_state(Validation::Invalid);
                None
            }
        }
    }

    /// Drive the field until it resolves.
    pub fn run(&mut self, keys: &mut dyn KeySource, renderer: &mut dyn Renderer) -> Result<FieldResult> {
        loop {
            renderer.draw(&view::field_view(self))?;

            let Some(key) = keys.next_key()? else {
                let result = FieldResult::Cancelled;
                renderer.settle(view::summary_line(self, &result))?;
                return Ok(result);
            };

            if let Some(result) = self.handle_key(&key) {
                renderer.settle(view::summary_line(self, &result))?;
                return Ok(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::keys::ScriptedKeys;
    use crate::prompt::state::{PromptComputed, PromptSubstate};
    use crate::prompt::view::PlainRenderer;
    use crate::schema::FieldType;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn level() -> FieldSchema {
        FieldSchema::new(
            "LEVEL",
            FieldType::Enum(vec!["alpha".into(), "beta".into(), "gamma".into()]),
        )
    }

    fn press(prompt: &mut FieldPrompt, key: KeyPress) -> Option<FieldResult> {
        prompt.handle_key(&key)
    }

    fn enter(prompt: &mut FieldPrompt) -> Option<FieldResult> {
        press(prompt, KeyPress::named(KeyName::Enter))
    }

    #[test]
    fn test_enum_current_selects_matching_option() {
        let schema = level();
        let prompt = FieldPrompt::new(&schema, Some("beta".into()), FieldOptions::default());
        assert_eq!(prompt.state().substate().cursor, 1);
        assert_eq!(prompt.value(), "beta");
        assert_eq!(prompt.state().substate().mode, Mode::Selection);
    }

    #[test]
    fn test_unknown_current_gets_own_slot() {
        let schema = level();
        let prompt = FieldPrompt::new(&schema, Some("delta".into()), FieldOptions::default());
        assert_eq!(prompt.slots()[0], Slot::Current("delta".into()));
        assert_eq!(prompt.state().substate().cursor, 0);
    }

    #[test]
    fn test_printable_key_starts_typing() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("beta".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::char('x'));

        let substate = prompt.state().substate();
        assert_eq!(substate.mode, Mode::Typing);
        assert_eq!(substate.input_value, "x");
        assert_eq!(prompt.cursor_slot(), Some(&Slot::Custom));
    }

    #[test]
    fn test_no_fixed_slots_starts_typing() {
        let schema = FieldSchema::new("API_URL", FieldType::String);
        let prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        assert_eq!(prompt.state().substate().mode, Mode::Typing);
        assert_eq!(prompt.slots(), &[Slot::Custom]);
    }

    #[test]
    fn test_cursor_prefers_current_then_default() {
        let schema = FieldSchema::new("PORT", FieldType::Number).with_default("8080");
        let with_current = FieldPrompt::new(&schema, Some("3000".into()), FieldOptions::default());
        assert_eq!(with_current.value(), "3000");

        let without = FieldPrompt::new(&schema, None, FieldOptions::default());
        assert_eq!(without.value(), "8080");
    }

    #[test]
    fn test_enter_on_fixed_slot_commits() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("beta".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::named(KeyName::Down));
        assert_eq!(enter(&mut prompt), Some(FieldResult::Commit("gamma".into())));
    }

    #[test]
    fn test_invalid_input_stays_and_shows_error() {
        let schema = FieldSchema::new("PORT", FieldType::Number);
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        for c in "abc".chars() {
            press(&mut prompt, KeyPress::char(c));
        }
        assert_eq!(enter(&mut prompt), None);
        assert_eq!(prompt.error(), Some("PORT must be a number, got 'abc'"));
        assert_eq!(prompt.state().substate().mode, Mode::Typing);
        assert!(!prompt.state().computed().can_submit);

        // Enter again without editing does nothing
        assert_eq!(enter(&mut prompt), None);

        for _ in 0..3 {
            press(&mut prompt, KeyPress::named(KeyName::Backspace));
        }
        press(&mut prompt, KeyPress::char('8'));
        assert_eq!(enter(&mut prompt), Some(FieldResult::Commit("8".into())));
    }

    #[test]
    fn test_enter_on_custom_slot_starts_typing() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("gamma".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::named(KeyName::Down));
        assert_eq!(prompt.cursor_slot(), Some(&Slot::Custom));
        assert_eq!(enter(&mut prompt), None);
        assert_eq!(prompt.state().substate().mode, Mode::Typing);
        assert_eq!(prompt.state().substate().input_value, "");
    }

    #[test]
    fn test_arrow_discards_draft() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("alpha".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::char('z'));
        press(&mut prompt, KeyPress::named(KeyName::Up));
        let substate = prompt.state().substate();
        assert_eq!(substate.mode, Mode::Selection);
        assert_eq!(substate.input_value, "");
        assert_eq!(prompt.value(), "gamma");
    }

    #[test]
    fn test_escape_leaves_typing_and_clears_error() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("alpha".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::char('z'));
        enter(&mut prompt);
        assert!(prompt.error().is_some());

        press(&mut prompt, KeyPress::named(KeyName::Escape));
        assert_eq!(prompt.state().substate().mode, Mode::Selection);
        assert_eq!(prompt.error(), None);
    }

    #[test]
    fn test_skip_slot_for_optional() {
        let schema = FieldSchema::new("NOTE", FieldType::String).optional();
        let mut prompt = FieldPrompt::new(&schema, Some("hi".into()), FieldOptions::default());
        assert_eq!(prompt.slots().last(), Some(&Slot::Skip));
        press(&mut prompt, KeyPress::named(KeyName::Up));
        assert_eq!(enter(&mut prompt), Some(FieldResult::Skip));
    }

    #[test]
    fn test_toolbar_actions_filtered() {
        let required = FieldSchema::new("A", FieldType::String);
        let prompt = FieldPrompt::new(&required, None, FieldOptions::default());
        assert_eq!(prompt.toolbar_actions(), vec![ToolbarAction::Close]);

        let secret = FieldSchema::new("B", FieldType::String).optional().secret();
        let options = FieldOptions {
            is_first: false,
            ..FieldOptions::default()
        };
        let prompt = FieldPrompt::new(&secret, None, options);
        assert_eq!(
            prompt.toolbar_actions(),
            vec![
                ToolbarAction::Skip,
                ToolbarAction::Previous,
                ToolbarAction::Reveal,
                ToolbarAction::Close
            ]
        );
    }

    #[test]
    fn test_toolbar_enter_does_not_submit() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, Some("beta".into()), FieldOptions::default());
        press(&mut prompt, KeyPress::named(KeyName::Tab));
        assert!(prompt.state().computed().should_dim_ui);
        assert_eq!(enter(&mut prompt), None);
        assert!(!prompt.state().substate().toolbar_open);
        assert_eq!(enter(&mut prompt), Some(FieldResult::Commit("beta".into())));
    }

    #[test]
    fn test_toolbar_previous() {
        let schema = level();
        let options = FieldOptions {
            is_first: false,
            ..FieldOptions::default()
        };
        let mut prompt = FieldPrompt::new(&schema, None, options);
        press(&mut prompt, KeyPress::named(KeyName::Tab));
        assert_eq!(press(&mut prompt, KeyPress::char('p')), Some(FieldResult::Previous));
    }

    #[test]
    fn test_toolbar_keeps_invalid_state() {
        let schema = FieldSchema::new("PORT", FieldType::Number);
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        press(&mut prompt, KeyPress::char('x'));
        enter(&mut prompt);
        press(&mut prompt, KeyPress::named(KeyName::Tab));
        assert!(prompt.state().computed().should_skip_validation);
        press(&mut prompt, KeyPress::named(KeyName::Tab));
        assert_eq!(prompt.state().substate().validation, Validation::Invalid);
    }

    #[test]
    fn test_secret_reveal_keeps_input_and_masks() {
        let schema = FieldSchema::new("TOKEN", FieldType::String).secret();
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        for c in "abc".chars() {
            press(&mut prompt, KeyPress::char(c));
        }
        assert_eq!(prompt.display(&prompt.value()), "***");

        press(&mut prompt, KeyPress::named(KeyName::Tab));
        assert_eq!(press(&mut prompt, KeyPress::char('r')), None);
        assert_eq!(prompt.state().substate().input_value, "abc");
        assert_eq!(prompt.display(&prompt.value()), "abc");
        assert!(!prompt.state().substate().consume_submit);

        assert_eq!(enter(&mut prompt), Some(FieldResult::Commit("abc".into())));
    }

    #[test]
    fn test_cancel_keys() {
        let schema = level();
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        assert_eq!(press(&mut prompt, KeyPress::ctrl('c')), Some(FieldResult::Cancelled));
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl PromptObserver for Recorder {
        fn state_changed(&self, transition: &'static str, _: &PromptSubstate, _: &PromptComputed) {
            self.0.borrow_mut().push(transition);
        }
    }

    #[test]
    fn test_observer_sees_transitions() {
        let schema = level();
        let recorder = Recorder::default();
        let mut prompt = FieldPrompt::new(&schema, Some("beta".into()), FieldOptions::default());
        prompt.subscribe(Box::new(recorder.clone()));
        press(&mut prompt, KeyPress::char('q'));
        assert_eq!(*recorder.0.borrow(), vec!["set_cursor", "enter_typing"]);
    }

    #[test]
    fn test_run_with_scripted_keys() {
        let schema = FieldSchema::new("NAME", FieldType::String);
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        let mut keys = ScriptedKeys::new().text("demo").enter();
        let mut renderer = PlainRenderer::new(Vec::new());

        let result = prompt.run(&mut keys, &mut renderer).unwrap();
        assert_eq!(result, FieldResult::Commit("demo".into()));

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.contains("NAME"));
        assert!(output.contains("demo"));
    }

    #[test]
    fn test_run_exhausted_keys_cancels() {
        let schema = FieldSchema::new("NAME", FieldType::String);
        let mut prompt = FieldPrompt::new(&schema, None, FieldOptions::default());
        let mut keys = ScriptedKeys::new().text("de");
        let mut renderer = PlainRenderer::new(Vec::new());
        assert_eq!(
            prompt.run(&mut keys, &mut renderer).unwrap(),
            FieldResult::Cancelled
        );
    }
}
