//! Terminal - the command line engine
//!
//! Owns the registry, the history, the configuration and the key router,
//! and runs submitted lines:
//!
//! 1. Reset the per-run output buffers
//! 2. Tokenize the trimmed line
//! 3. Look up token 0 (empty name runs the fallback)
//! 4. Run it, or produce a "not found" record
//! 5. Keep the record in history when eligible
//! 6. Leave history browsing mode
//! 7. Emit `executed` and return the record
//!
//! One line runs to completion before the next is accepted.

use super::action::{Action, ExecutionRecord};
use super::builtins;
use super::config::Config;
use super::error::{ActionError, ShellResult};
use super::events::{EventBus, OutputEvent, Stream};
use super::history::History;
use super::keys::{self, EditableSurface, KeyEvent, KeyOutcome, KeyRouter, RouterContext};
use super::output::{self, SharedSink};
use super::registry::ActionRegistry;
use super::tokenizer::tokenize;
use crate::console_log;
use crate::platform;
use std::rc::Rc;

/// Terminal state
pub struct Terminal {
    registry: ActionRegistry,
    history: History,
    config: Config,
    router: KeyRouter,
    events: EventBus,

    /// Values written during the current run
    stdout_lines: Vec<serde_json::Value>,
    stderr_lines: Vec<serde_json::Value>,

    /// Where rendered output goes, subscribed on `init`
    sink: Option<SharedSink>,

    initialized: bool,
}

impl Terminal {
    pub fn new(config: Config) -> Self {
        Self {
            registry: ActionRegistry::new(),
            history: History::new(),
            config,
            router: KeyRouter::new(),
            events: EventBus::new(),
            stdout_lines: Vec::new(),
            stderr_lines: Vec::new(),
            sink: None,
            initialized: false,
        }
    }

    /// Pre-seed history; `records[0]` is the newest.
    pub fn with_history(mut self, records: Vec<Rc<ExecutionRecord>>) -> Self {
        self.history.push_all(records);
        self
    }

    /// Pre-seed actions
    pub fn with_actions(mut self, actions: Vec<Action>) -> ShellResult<Self> {
        self.registry.add_all(actions)?;
        Ok(self)
    }

    /// Output target, connected to the data feeds by `init`
    pub fn with_output(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// One-time activation: install built-ins if configured, connect the
    /// output sink, render the prompt.
    ///
    /// Returns `Ok(false)` when already initialized. A built-in name
    /// collision fails before anything is installed, leaving the terminal
    /// uninitialized and the registry untouched.
    pub fn init(&mut self, surface: &mut dyn EditableSurface) -> ShellResult<bool> {
        if self.initialized {
            return Ok(false);
        }

        if self.config.install_builtins {
            let actions = builtins::all();
            // All or nothing, so a failed init can be retried
            self.registry.check_available(actions.iter().map(|a| a.name()))?;
            self.registry.add_all(actions)?;
        }
        if let Some(sink) = self.sink.clone() {
            output::attach(&mut self.events, sink);
        }
        keys::render_input(surface, &self.config.prompt_region(), "");

        self.initialized = true;
        console_log!("[terminal] Initialized with {} actions", self.registry.len());
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run one line and return its record
    pub fn execute(&mut self, raw_input: &str) -> Rc<ExecutionRecord> {
        self.stdout_lines.clear();
        self.stderr_lines.clear();

        let tokens = tokenize(raw_input.trim());
        let name = tokens[0].clone();

        let (record, keep) = if let Some(action) = self.registry.find(&name) {
            (action.run(tokens, raw_input, self), true)
        } else if name.is_empty() {
            let fallback = self.registry.fallback();
            (fallback.run(tokens, raw_input, self), self.config.add_empty_command_to_history)
        } else {
            let error = ActionError::new(format!("{} not found", name));
            self.stderr(error.to_string());
            let (stdout, stderr) = self.take_output();
            (ExecutionRecord::failure(tokens, raw_input, error, stdout, stderr), true)
        };

        let record = Rc::new(record);
        if keep {
            self.history.push(Rc::clone(&record));
            if let Some(limit) = self.config.history_limit {
                self.history.truncate_to(limit);
            }
        }
        self.history.reset_index();

        self.events.emit_executed(&record);
        record
    }

    /// Write a value to stdout for the running command
    pub fn stdout(&mut self, data: impl Into<serde_json::Value>) {
        self.write(Stream::Stdout, data.into());
    }

    /// Write a value to stderr for the running command
    pub fn stderr(&mut self, data: impl Into<serde_json::Value>) {
        self.write(Stream::Stderr, data.into());
    }

    fn write(&mut self, stream: Stream, data: serde_json::Value) {
        let event = OutputEvent {
            stream,
            data,
            timestamp: platform::now_ms(),
        };
        self.events.emit_output(&event);
        match stream {
            Stream::Stdout => self.stdout_lines.push(event.data),
            Stream::Stderr => self.stderr_lines.push(event.data),
        }
    }

    /// Hand over this run's output and clear the buffers
    pub(crate) fn take_output(&mut self) -> (Vec<serde_json::Value>, Vec<serde_json::Value>) {
        (
            std::mem::take(&mut self.stdout_lines),
            std::mem::take(&mut self.stderr_lines),
        )
    }

    /// Route a keydown. Submission executes the line and resets the input
    /// to the bare prompt.
    pub fn handle_keydown(&mut self, surface: &mut dyn EditableSurface, event: &KeyEvent) -> KeyOutcome {
        let ctx = RouterContext {
            history: &mut self.history,
            registry: &self.registry,
            config: &self.config,
        };
        let outcome = self.router.on_keydown(event, surface, ctx);

        if let Some(line) = &outcome.submit {
            self.execute(line);
            keys::render_input(surface, &self.config.prompt_region(), "");
        }
        outcome
    }

    /// Keep the caret out of the prompt after any selection change
    pub fn handle_selection_change(&mut self, surface: &mut dyn EditableSurface) {
        let prompt_len = self.config.prompt_region().chars().count();
        keys::clamp_selection(surface, prompt_len);
    }

    /// Clear whatever the output sink shows
    pub fn clear_output(&mut self) {
        if let Some(sink) = &self.sink {
            sink.borrow_mut().clear();
        }
    }

    /// Most recent record kept in history
    pub fn last_record(&self) -> Option<Rc<ExecutionRecord>> {
        self.history.latest()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn router(&self) -> &KeyRouter {
        &self.router
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
