//! Prompt state machine
//!
//! [`PromptState`] owns the per-field substate and is the only thing that
//! mutates it. Each transition checks its preconditions (and is a no-op
//! returning `false` when they do not hold), recomputes [`PromptComputed`],
//! and calls every subscribed [`PromptObserver`] before returning.

/// Interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving between fixed slots
    Selection,
    /// Editing the free-entry slot
    Typing,
}

/// What submitting the field should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intention {
    Commit,
    Skip,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretVisibility {
    Hidden,
    Revealed,
    NotSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Pending,
    Valid,
    Invalid,
    /// Errors are not shown (toolbar open, secret just toggled)
    Suppressed,
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSubstate {
    pub mode: Mode,
    pub intention: Intention,
    pub secret_visibility: SecretVisibility,
    pub validation: Validation,
    pub cursor: usize,
    pub input_value: String,
    pub toolbar_open: bool,
    /// One-shot guard: the key that toggled secret visibility must not submit
    pub consume_submit: bool,
}

/// Flags derived from [`PromptSubstate`] after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComputed {
    pub can_submit: bool,
    pub should_track_input: bool,
    pub should_dim_ui: bool,
    pub should_skip_validation: bool,
}

impl PromptComputed {
    pub fn derive(state: &PromptSubstate) -> Self {
        Self {
            can_submit: state.intention == Intention::Commit
                && state.validation != Validation::Invalid
                && !state.consume_submit,
            should_track_input: state.mode == Mode::Typing,
            should_dim_ui: state.toolbar_open,
            should_skip_validation: state.validation == Validation::Suppressed,
        }
    }
}

/// Receives the full state after every applied transition.
pub trait PromptObserver {
    fn state_changed(&self, transition: &'static str, state: &PromptSubstate, computed: &PromptComputed);
}

/// Logs transitions at trace level.
pub struct TraceObserver {
    pub field: String,
}

impl PromptObserver for TraceObserver {
    fn state_changed(&self, transition: &'static str, state: &PromptSubstate, computed: &PromptComputed) {
        tracing::trace!(
            field = %self.field,
            transition,
            mode = ?state.mode,
            cursor = state.cursor,
            validation = ?state.validation,
            toolbar = state.toolbar_open,
            can_submit = computed.can_submit,
            "prompt state"
        );
    }
}

/// Constants a state machine is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptConfig {
    /// Field offers current/default/choice slots to select from
    pub has_fixed_slots: bool,
    pub secret: bool,
    pub initial_cursor: usize,
}

pub struct PromptState {
    state: PromptSubstate,
    computed: PromptComputed,
    saved_validation: Option<Validation>,
    observers: Vec<Box<dyn PromptObserver>>,
}

impl PromptState {
    pub fn new(config: PromptConfig) -> Self {
        let state = PromptSubstate {
            mode: if config.has_fixed_slots {
                Mode::Selection
            } else {
                Mode::Typing
            },
            intention: Intention::Commit,
            secret_visibility: if config.secret {
                SecretVisibility::Hidden
            } else {
                SecretVisibility::NotSecret
            },
            validation: Validation::Pending,
            cursor: config.initial_cursor,
            input_value: String::new(),
            toolbar_open: false,
            consume_submit: false,
        };
        let computed = PromptComputed::derive(&state);
        Self {
            state,
            computed,
            saved_validation: None,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn PromptObserver>) {
        self.observers.push(observer);
    }

    pub fn substate(&self) -> &PromptSubstate {
        &self.state
    }

    pub fn computed(&self) -> &PromptComputed {
        &self.computed
    }

    fn changed(&mut self, transition: &'static str) -> bool {
        self.computed = PromptComputed::derive(&self.state);
        for observer in &self.observers {
            observer.state_changed(transition, &self.state, &self.computed);
        }
        true
    }

    pub fn enter_typing(&mut self, seed: &str) -> bool {
        if self.state.mode != Mode::Selection || self.state.toolbar_open {
            return false;
        }
        self.state.mode = Mode::Typing;
        self.state.input_value = seed.to_string();
        self.state.validation = Validation::Pending;
        self.changed("enter_typing")
    }

    pub fn exit_typing(&mut self) -> bool {
        if self.state.mode != Mode::Typing {
            return false;
        }
        self.state.mode = Mode::Selection;
        self.state.input_value.clear();
        self.state.validation = Validation::Pending;
        self.changed("exit_typing")
    }

    pub fn open_toolbar(&mut self) -> bool {
        if self.state.toolbar_open {
            return false;
        }
        self.state.toolbar_open = true;
        self.changed("open_toolbar")
    }

    pub fn close_toolbar(&mut self) -> bool {
        if !self.state.toolbar_open {
            return false;
        }
        self.state.toolbar_open = false;
        self.changed("close_toolbar")
    }

    /// Move one slot, wrapping within `0..=max_index`.
    pub fn move_cursor(&mut self, direction: Direction, max_index: usize) -> bool {
        if self.state.mode != Mode::Selection || self.state.toolbar_open {
            return false;
        }
        let cursor = self.state.cursor.min(max_index);
        self.state.cursor = match direction {
            Direction::Up if cursor == 0 => max_index,
            Direction::Up => cursor - 1,
            Direction::Down if cursor >= max_index => 0,
            Direction::Down => cursor + 1,
        };
        self.state.validation = Validation::Pending;
        self.changed("move_cursor")
    }

    pub fn set_cursor(&mut self, position: usize) -> bool {
        if self.state.mode != Mode::Selection {
            return false;
        }
        self.state.cursor = position;
        self.changed("set_cursor")
    }

    pub fn set_intention(&mut self, intention: Intention) -> bool {
        self.state.intention = intention;
        self.changed("set_intention")
    }

    pub fn toggle_secret_visibility(&mut self) -> bool {
        self.state.secret_visibility = match self.state.secret_visibility {
            SecretVisibility::NotSecret => return false,
            SecretVisibility::Hidden => SecretVisibility::Revealed,
            SecretVisibility::Revealed => SecretVisibility::Hidden,
        };
        self.state.validation = Validation::Suppressed;
        self.state.consume_submit = true;
        self.changed("toggle_secret_visibility")
    }

    pub fn update_input(&mut self, value: &str) -> bool {
        if self.state.mode != Mode::Typing {
            return false;
        }
        self.state.input_value = value.to_string();
        self.state.validation = Validation::Pending;
        self.changed("update_input")
    }

    pub fn clear_input(&mut self) -> bool {
        self.state.input_value.clear();
        self.state.validation = Validation::Pending;
        self.changed("clear_input")
    }

    pub fn set_validation_state(&mut self, validation: Validation) -> bool {
        self.state.validation = validation;
        self.changed("set_validation_state")
    }

    /// Hide validation, remembering the state to restore.
    pub fn suppress_validation(&mut self) -> bool {
        if self.state.validation != Validation::Suppressed {
            self.saved_validation = Some(self.state.validation);
        }
        self.state.validation = Validation::Suppressed;
        self.changed("suppress_validation")
    }

    pub fn restore_validation(&mut self) -> bool {
        match self.saved_validation.take() {
            Some(saved) => self.state.validation = saved,
            None if self.state.validation == Validation::Suppressed => {
                self.state.validation = Validation::Pending
            }
            None => return false,
        }
        self.changed("restore_validation")
    }

    pub fn clear_consume_submit(&mut self) -> bool {
        if !self.state.consume_submit {
            return false;
        }
        self.state.consume_submit = false;
        self.changed("clear_consume_submit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn selection(secret: bool) -> PromptState {
        PromptState::new(PromptConfig {
            has_fixed_slots: true,
            secret,
            initial_cursor: 0,
        })
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(&'static str, PromptComputed)>>>);

    impl PromptObserver for Recorder {
        fn state_changed(&self, transition: &'static str, _: &PromptSubstate, computed: &PromptComputed) {
            self.0.borrow_mut().push((transition, *computed));
        }
    }

    #[test]
    fn test_initial_mode_follows_fixed_slots() {
        assert_eq!(selection(false).substate().mode, Mode::Selection);
        let typing = PromptState::new(PromptConfig {
            has_fixed_slots: false,
            secret: false,
            initial_cursor: 0,
        });
        assert_eq!(typing.substate().mode, Mode::Typing);
        assert!(typing.computed().should_track_input);
    }

    #[test]
    fn test_enter_and_exit_typing() {
        let mut state = selection(false);
        assert!(state.enter_typing("x"));
        assert_eq!(state.substate().input_value, "x");
        assert!(!state.enter_typing("y"));

        assert!(state.exit_typing());
        assert_eq!(state.substate().mode, Mode::Selection);
        assert_eq!(state.substate().input_value, "");
        assert!(!state.exit_typing());
    }

    #[test]
    fn test_enter_typing_blocked_by_toolbar() {
        let mut state = selection(false);
        state.open_toolbar();
        assert!(!state.enter_typing("x"));
        assert_eq!(state.substate().mode, Mode::Selection);
        assert!(state.computed().should_dim_ui);
    }

    #[test]
    fn test_move_cursor_wraps_both_ends() {
        for max_index in 0..5 {
            let mut state = selection(false);
            state.move_cursor(Direction::Up, max_index);
            assert_eq!(state.substate().cursor, max_index);
            state.move_cursor(Direction::Down, max_index);
            assert_eq!(state.substate().cursor, 0);
            for _ in 0..=max_index {
                state.move_cursor(Direction::Down, max_index);
            }
            assert_eq!(state.substate().cursor, 0);
        }
    }

    #[test]
    fn test_move_cursor_wraps_at_usize_max() {
        let mut state = selection(false);
        assert!(state.move_cursor(Direction::Up, usize::MAX));
        assert_eq!(state.substate().cursor, usize::MAX);
        assert!(state.move_cursor(Direction::Down, usize::MAX));
        assert_eq!(state.substate().cursor, 0);
    }

    #[test]
    fn test_move_cursor_blocked_while_typing_or_toolbar() {
        let mut state = selection(false);
        state.open_toolbar();
        assert!(!state.move_cursor(Direction::Down, 3));
        state.close_toolbar();
        state.enter_typing("");
        assert!(!state.move_cursor(Direction::Down, 3));
        assert_eq!(state.substate().cursor, 0);
    }

    #[test]
    fn test_invalid_blocks_submit_for_every_intention() {
        for intention in [Intention::Commit, Intention::Skip, Intention::Previous] {
            let mut state = selection(false);
            state.set_intention(intention);
            state.set_validation_state(Validation::Invalid);
            assert!(!state.computed().can_submit);
        }
    }

    #[test]
    fn test_toggle_secret_keeps_input() {
        let mut state = selection(true);
        state.enter_typing("hunter2");
        assert!(state.toggle_secret_visibility());
        assert_eq!(state.substate().input_value, "hunter2");
        assert_eq!(state.substate().secret_visibility, SecretVisibility::Revealed);
        assert!(state.substate().consume_submit);
        assert!(state.computed().should_skip_validation);
        assert!(!state.computed().can_submit);

        assert!(state.clear_consume_submit());
        assert!(state.computed().can_submit);
        assert!(!state.clear_consume_submit());
    }

    #[test]
    fn test_toggle_non_secret_is_noop() {
        let mut state = selection(false);
        assert!(!state.toggle_secret_visibility());
        assert!(!state.substate().consume_submit);
    }

    #[test]
    fn test_suppress_and_restore_validation() {
        let mut state = selection(false);
        state.set_validation_state(Validation::Invalid);
        state.suppress_validation();
        assert!(state.computed().should_skip_validation);
        state.restore_validation();
        assert_eq!(state.substate().validation, Validation::Invalid);
        assert!(!state.restore_validation());
    }

    #[test]
    fn test_update_input_only_while_typing() {
        let mut state = selection(false);
        assert!(!state.update_input("x"));
        state.enter_typing("a");
        state.set_validation_state(Validation::Invalid);
        assert!(state.update_input("ab"));
        assert_eq!(state.substate().validation, Validation::Pending);
    }

    #[test]
    fn test_observers_notified_synchronously() {
        let recorder = Recorder::default();
        let mut state = selection(false);
        state.subscribe(Box::new(recorder.clone()));

        state.enter_typing("a");
        state.set_validation_state(Validation::Invalid);
        state.move_cursor(Direction::Down, 2); // no-op while typing

        let seen = recorder.0.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "enter_typing");
        assert!(seen[0].1.should_track_input);
        assert_eq!(seen[1].0, "set_validation_state");
        assert!(!seen[1].1.can_submit);
    }
}
