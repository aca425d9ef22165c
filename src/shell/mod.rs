//! Shell - Command line over a single text input
//!
//! The interaction pipeline, leaves first:
//! - Tokenizer: raw line -> words (quotes, escapes)
//! - Argument parser: words -> typed positionals and options
//! - Actions and their registry: named handlers with unique keys
//! - History: execution records with a browsing cursor
//! - Key router: history recall, autocomplete, submit, prompt protection
//! - Terminal: owns all of the above and runs submitted lines

pub mod action;
pub mod args;
pub mod builtins;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod keys;
pub mod output;
pub mod registry;
pub mod terminal;
pub mod tokenizer;

pub use action::{Action, ExecutionRecord, Handler, HandlerResult, Outcome};
pub use args::{coerce, parse_args, Options, ParsedArgs, Value};
pub use config::Config;
pub use error::{ActionError, ShellError, ShellResult};
pub use events::{EventBus, ListenerId, OutputEvent, Stream};
pub use history::{History, Previous};
pub use keys::{Direction, EditableSurface, KeyEvent, KeyOutcome, KeyRouter, Selection};
pub use output::{OutputLine, OutputSink, Scrollback, SharedSink};
pub use registry::ActionRegistry;
pub use terminal::Terminal;
pub use tokenizer::tokenize;
