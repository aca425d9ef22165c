//! Key routing
//!
//! Decides what a keystroke means for the command line:
//! - previous / next key: history recall, skipping duplicates
//! - autocomplete key: cycle through command names matching the input
//! - return key: submit the text after the prompt
//! - Backspace / Delete / ArrowLeft: never edit or cross into the prompt
//!
//! The router never touches a real widget. It works on an `EditableSurface`
//! and reports what the host should do (prevent the default action,
//! submit a line).

use super::config::Config;
use super::history::{History, Previous};
use super::registry::ActionRegistry;

/// Which end of a selection the caret sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::None => "none",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "forward" => Self::Forward,
            "backward" => Self::Backward,
            _ => Self::None,
        }
    }
}

/// Selection in character offsets; collapsed when `start == end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: Direction,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            direction: Direction::None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The editable text widget, as far as the router needs it
pub trait EditableSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);
}

/// A keydown, reduced to what routing needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key value (e.g., "a", "Enter", "Backspace")
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Held with Ctrl, Alt or Meta. Chords belong to the host (copy, word
    /// jumps, browser shortcuts) and only the prompt guard applies to them.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// What the host should do after routing a keydown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Suppress the widget's default handling of the key
    pub prevent_default: bool,
    /// Execute this line (prompt already stripped)
    pub submit: Option<String>,
}

impl KeyOutcome {
    fn pass() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            prevent_default: true,
            submit: None,
        }
    }
}

/// Shared state the router reads and writes
pub struct RouterContext<'a> {
    pub history: &'a mut History,
    pub registry: &'a ActionRegistry,
    pub config: &'a Config,
}

/// Autocomplete cache; everything else is re-derived per keystroke
#[derive(Debug, Default)]
pub struct KeyRouter {
    predictions: Vec<String>,
    prediction_index: usize,
}

impl KeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached predictions of the running autocomplete sequence
    pub fn predictions(&self) -> &[String] {
        &self.predictions
    }

    pub fn prediction_index(&self) -> usize {
        self.prediction_index
    }

    pub fn reset_autocomplete(&mut self) {
        self.predictions.clear();
        self.prediction_index = 0;
    }

    /// Route one keydown
    pub fn on_keydown(
        &mut self,
        event: &KeyEvent,
        surface: &mut dyn EditableSurface,
        ctx: RouterContext<'_>,
    ) -> KeyOutcome {
        let prompt = ctx.config.prompt_region();
        let prompt_len = prompt.chars().count();
        let key = event.key.as_str();

        if event.is_chord() {
            self.reset_autocomplete();
            return if guards_prompt(key, surface.selection(), prompt_len) {
                KeyOutcome::handled()
            } else {
                KeyOutcome::pass()
            };
        }

        if key == ctx.config.autocomplete_key {
            self.autocomplete(surface, ctx.registry, &prompt);
            return KeyOutcome::handled();
        }
        self.reset_autocomplete();

        if key == ctx.config.previous_key {
            recall_previous(surface, ctx.history, &prompt, ctx.config.show_duplicate_commands);
            KeyOutcome::handled()
        } else if key == ctx.config.next_key {
            recall_next(surface, ctx.history, &prompt, ctx.config.show_duplicate_commands);
            KeyOutcome::handled()
        } else if key == ctx.config.return_key {
            let line = editable_text(&surface.value(), prompt_len);
            KeyOutcome {
                prevent_default: true,
                submit: Some(line),
            }
        } else if guards_prompt(key, surface.selection(), prompt_len) {
            KeyOutcome::handled()
        } else {
            KeyOutcome::pass()
        }
    }

    fn autocomplete(&mut self, surface: &mut dyn EditableSurface, registry: &ActionRegistry, prompt: &str) {
        if self.predictions.is_empty() {
            let input = editable_text(&surface.value(), prompt.chars().count());
            self.predictions = registry.predict(&input);
            self.prediction_index = 0;
        }
        if let Some(candidate) = self.predictions.get(self.prediction_index) {
            render_input(surface, prompt, candidate);
            self.prediction_index = (self.prediction_index + 1) % self.predictions.len();
        }
    }
}

/// Keep the selection out of the protected prompt region.
///
/// A selection wholly inside the prompt collapses to the boundary; one that
/// extends past it keeps its end and direction.
pub fn clamp_selection(surface: &mut dyn EditableSurface, prompt_len: usize) {
    let sel = surface.selection();
    if sel.start >= prompt_len {
        return;
    }
    let clamped = if sel.end <= prompt_len {
        Selection {
            start: prompt_len,
            end: prompt_len,
            direction: sel.direction,
        }
    } else {
        Selection {
            start: prompt_len,
            end: sel.end,
            direction: sel.direction,
        }
    };
    surface.set_selection(clamped);
}

/// Replace the editable text, keeping the prompt, caret at the end
pub fn render_input(surface: &mut dyn EditableSurface, prompt: &str, text: &str) {
    let value = format!("{}{}", prompt, text);
    let end = value.chars().count();
    surface.set_value(&value);
    surface.set_selection(Selection::caret(end));
}

/// Text after the first `prompt_len` characters
fn editable_text(value: &str, prompt_len: usize) -> String {
    value.chars().skip(prompt_len).collect()
}

/// Would this key erase or cross into the prompt?
fn guards_prompt(key: &str, sel: Selection, prompt_len: usize) -> bool {
    match key {
        "ArrowLeft" => sel.start <= prompt_len,
        "Backspace" | "Delete" => sel.start <= prompt_len && sel.end <= prompt_len,
        _ => false,
    }
}

fn recall_previous(surface: &mut dyn EditableSurface, history: &mut History, prompt: &str, show_duplicates: bool) {
    let shown = editable_text(&surface.value(), prompt.chars().count());
    loop {
        match history.previous() {
            Previous::Record(record) => {
                if !show_duplicates && record.raw_input == shown {
                    continue;
                }
                render_input(surface, prompt, &record.raw_input);
                return;
            }
            // Nothing older: leave the input alone
            Previous::AtOldest | Previous::Empty => return,
        }
    }
}

fn recall_next(surface: &mut dyn EditableSurface, history: &mut History, prompt: &str, show_duplicates: bool) {
    let shown = editable_text(&surface.value(), prompt.chars().count());
    loop {
        match history.next() {
            Some(record) => {
                if !show_duplicates && record.raw_input == shown {
                    continue;
                }
                render_input(surface, prompt, &record.raw_input);
                return;
            }
            None => {
                render_input(surface, prompt, "");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::action::{Action, ExecutionRecord};
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeSurface {
        value: String,
        selection: Selection,
    }

    impl FakeSurface {
        fn with(value: &str) -> Self {
            let end = value.chars().count();
            Self {
                value: value.to_string(),
                selection: Selection::caret(end),
            }
        }
    }

    impl EditableSurface for FakeSurface {
        fn value(&self) -> String {
            self.value.clone()
        }
        fn set_value(&mut self, value: &str) {
            self.value = value.to_string();
        }
        fn selection(&self) -> Selection {
            self.selection
        }
        fn set_selection(&mut self, selection: Selection) {
            self.selection = selection;
        }
    }

    struct Fixture {
        router: KeyRouter,
        history: History,
        registry: ActionRegistry,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                router: KeyRouter::new(),
                history: History::new(),
                registry: ActionRegistry::new(),
                config: Config::default(),
            }
        }

        fn press(&mut self, key: &str, surface: &mut FakeSurface) -> KeyOutcome {
            let ctx = RouterContext {
                history: &mut self.history,
                registry: &self.registry,
                config: &self.config,
            };
            self.router.on_keydown(&KeyEvent::new(key), surface, ctx)
        }

        fn press_event(&mut self, event: KeyEvent, surface: &mut FakeSurface) -> KeyOutcome {
            let ctx = RouterContext {
                history: &mut self.history,
                registry: &self.registry,
                config: &self.config,
            };
            self.router.on_keydown(&event, surface, ctx)
        }

        fn remember(&mut self, inputs: &[&str]) {
            for input in inputs {
                self.history.push(Rc::new(ExecutionRecord::failure(
                    vec![input.to_string()],
                    input,
                    "x".into(),
                    vec![],
                    vec![],
                )));
            }
        }
    }

    // ============ History recall ============

    #[test]
    fn test_previous_recalls_newest_first() {
        let mut fx = Fixture::new();
        fx.remember(&["one", "two"]);
        let mut surface = FakeSurface::with("$ ");

        assert!(fx.press("ArrowUp", &mut surface).prevent_default);
        assert_eq!(surface.value, "$ two");
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ one");
        assert_eq!(surface.selection, Selection::caret(5));
    }

    #[test]
    fn test_previous_at_oldest_keeps_input() {
        let mut fx = Fixture::new();
        fx.remember(&["only"]);
        let mut surface = FakeSurface::with("$ ");
        fx.press("ArrowUp", &mut surface);
        surface.value = "$ only edited".into();
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ only edited");
    }

    #[test]
    fn test_previous_on_empty_history_keeps_input() {
        let mut fx = Fixture::new();
        let mut surface = FakeSurface::with("$ draft");
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ draft");
    }

    #[test]
    fn test_next_past_newest_clears() {
        let mut fx = Fixture::new();
        fx.remember(&["one", "two"]);
        let mut surface = FakeSurface::with("$ ");
        fx.press("ArrowUp", &mut surface);
        fx.press("ArrowUp", &mut surface);
        fx.press("ArrowDown", &mut surface);
        assert_eq!(surface.value, "$ two");
        fx.press("ArrowDown", &mut surface);
        assert_eq!(surface.value, "$ ");
        assert_eq!(fx.history.index(), None);
    }

    #[test]
    fn test_duplicates_skipped() {
        let mut fx = Fixture::new();
        fx.remember(&["a", "b", "b", "b"]);
        let mut surface = FakeSurface::with("$ ");
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ b");
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ a");
        assert_eq!(fx.history.index(), Some(3));

        fx.press("ArrowDown", &mut surface);
        assert_eq!(surface.value, "$ b");
        assert_eq!(fx.history.index(), Some(2));
    }

    #[test]
    fn test_duplicates_shown_when_configured() {
        let mut fx = Fixture::new();
        fx.config.show_duplicate_commands = true;
        fx.remember(&["a", "b", "b"]);
        let mut surface = FakeSurface::with("$ ");
        fx.press("ArrowUp", &mut surface);
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ b");
        assert_eq!(fx.history.index(), Some(1));
    }

    #[test]
    fn test_duplicate_of_typed_text_skipped() {
        let mut fx = Fixture::new();
        fx.remember(&["ls", "pwd"]);
        let mut surface = FakeSurface::with("$ pwd");
        fx.press("ArrowUp", &mut surface);
        assert_eq!(surface.value, "$ ls");
    }

    // ============ Autocomplete ============

    #[test]
    fn test_autocomplete_cycles_and_wraps() {
        let mut fx = Fixture::new();
        fx.registry
            .add_all(vec![Action::noop("help"), Action::noop("echo"), Action::noop("hello")])
            .unwrap();
        let mut surface = FakeSurface::with("$ he");

        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ help");
        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ hello");
        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ help");
        assert_eq!(fx.router.predictions(), ["help", "hello"]);
    }

    #[test]
    fn test_autocomplete_empty_input_lists_all() {
        let mut fx = Fixture::new();
        fx.registry.add_all(vec![Action::noop("a"), Action::noop("b")]).unwrap();
        let mut surface = FakeSurface::with("$ ");
        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ a");
        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ b");
    }

    #[test]
    fn test_other_key_resets_autocomplete() {
        let mut fx = Fixture::new();
        fx.registry.add_all(vec![Action::noop("ab"), Action::noop("ac")]).unwrap();
        let mut surface = FakeSurface::with("$ a");
        fx.press("Tab", &mut surface);
        assert_eq!(fx.router.prediction_index(), 1);

        fx.press("x", &mut surface);
        assert!(fx.router.predictions().is_empty());
        assert_eq!(fx.router.prediction_index(), 0);

        surface.value = "$ ac".into();
        fx.press("Tab", &mut surface);
        assert_eq!(fx.router.predictions(), ["ac"]);
    }

    #[test]
    fn test_autocomplete_without_matches_keeps_input() {
        let mut fx = Fixture::new();
        fx.registry.add(Action::noop("echo")).unwrap();
        let mut surface = FakeSurface::with("$ zz");
        fx.press("Tab", &mut surface);
        assert_eq!(surface.value, "$ zz");
    }

    // ============ Submit ============

    #[test]
    fn test_return_submits_text_after_prompt() {
        let mut fx = Fixture::new();
        fx.config.preprompt = "web".into();
        let mut surface = FakeSurface::with("web$ echo hi");
        let outcome = fx.press("Enter", &mut surface);
        assert_eq!(outcome.submit.as_deref(), Some("echo hi"));
        assert!(outcome.prevent_default);
    }

    // ============ Prompt guard ============

    #[test]
    fn test_guard_at_prompt_boundary() {
        let mut fx = Fixture::new();
        for key in ["Backspace", "Delete", "ArrowLeft"] {
            let mut surface = FakeSurface::with("$ ");
            assert!(fx.press(key, &mut surface).prevent_default, "key {}", key);
        }
    }

    #[test]
    fn test_guard_allows_editing_past_prompt() {
        let mut fx = Fixture::new();
        let mut surface = FakeSurface::with("$ abc");
        assert!(!fx.press("Backspace", &mut surface).prevent_default);
        assert!(!fx.press("ArrowLeft", &mut surface).prevent_default);
    }

    #[test]
    fn test_guard_allows_deleting_selection_past_prompt() {
        let mut fx = Fixture::new();
        let mut surface = FakeSurface::with("$ abc");
        surface.selection = Selection {
            start: 2,
            end: 5,
            direction: Direction::Forward,
        };
        assert!(!fx.press("Backspace", &mut surface).prevent_default);
        assert!(fx.press("ArrowLeft", &mut surface).prevent_default);
    }

    #[test]
    fn test_ordinary_key_passes() {
        let mut fx = Fixture::new();
        let mut surface = FakeSurface::with("$ ");
        assert_eq!(fx.press("a", &mut surface), KeyOutcome::default());
    }

    // ============ Selection clamp ============

    #[test]
    fn test_clamp_collapses_inside_prompt() {
        let mut surface = FakeSurface::with("$ abc");
        surface.selection = Selection {
            start: 0,
            end: 1,
            direction: Direction::Backward,
        };
        clamp_selection(&mut surface, 2);
        assert_eq!(
            surface.selection,
            Selection {
                start: 2,
                end: 2,
                direction: Direction::Backward
            }
        );
    }

    #[test]
    fn test_clamp_pulls_start_only() {
        let mut surface = FakeSurface::with("$ abc");
        surface.selection = Selection {
            start: 1,
            end: 4,
            direction: Direction::Forward,
        };
        clamp_selection(&mut surface, 2);
        assert_eq!(
            surface.selection,
            Selection {
                start: 2,
                end: 4,
                direction: Direction::Forward
            }
        );
    }

    #[test]
    fn test_clamp_leaves_editable_selection() {
        let mut surface = FakeSurface::with("$ abc");
        surface.selection = Selection::caret(3);
        clamp_selection(&mut surface, 2);
        assert_eq!(surface.selection, Selection::caret(3));
    }

    // ============ Modifier chords ============

    #[test]
    fn test_chords_do_not_navigate_or_submit() {
        let mut fx = Fixture::new();
        fx.remember(&["one"]);
        fx.registry.add(Action::noop("echo")).unwrap();
        let mut surface = FakeSurface::with("$ e");

        let ctrl_up = KeyEvent {
            ctrl: true,
            ..KeyEvent::new("ArrowUp")
        };
        assert!(!fx.press_event(ctrl_up, &mut surface).prevent_default);
        assert_eq!(fx.history.index(), None);

        let alt_tab = KeyEvent {
            alt: true,
            ..KeyEvent::new("Tab")
        };
        fx.press_event(alt_tab, &mut surface);
        assert!(fx.router.predictions().is_empty());

        let meta_enter = KeyEvent {
            meta: true,
            ..KeyEvent::new("Enter")
        };
        let outcome = fx.press_event(meta_enter, &mut surface);
        assert_eq!(outcome.submit, None);
        assert_eq!(surface.value, "$ e");
    }

    #[test]
    fn test_chord_still_guards_prompt() {
        let mut fx = Fixture::new();
        let mut surface = FakeSurface::with("$ ");
        let ctrl_backspace = KeyEvent {
            ctrl: true,
            ..KeyEvent::new("Backspace")
        };
        assert!(fx.press_event(ctrl_backspace, &mut surface).prevent_default);
    }
}
