//! Named actions and the records they produce
//!
//! An action wraps a name and a handler. Running it parses the tokens,
//! calls the handler against the terminal, and captures everything the run
//! produced (status, value or error, output lines) in an `ExecutionRecord`.

use super::args::{parse_args, Options, Value};
use super::error::{ActionError, ShellError, ShellResult};
use super::terminal::Terminal;
use crate::platform;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// What a handler returns: any JSON value, or the error it "throws"
pub type HandlerResult = Result<serde_json::Value, ActionError>;

/// A handler: positionals, options, and the terminal it runs against
pub type Handler = Rc<dyn Fn(&[Value], &Options, &mut Terminal) -> HandlerResult>;

/// A named, registrable command
pub struct Action {
    name: String,
    handler: Handler,
    /// Written at most once
    manual: OnceCell<String>,
}

impl Action {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value], &Options, &mut Terminal) -> HandlerResult + 'static,
    {
        Self {
            name: name.into(),
            handler: Rc::new(handler),
            manual: OnceCell::new(),
        }
    }

    /// Action that does nothing and returns null. Used as the empty-line fallback.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, |_, _, _| Ok(serde_json::Value::Null))
    }

    /// Builder form of `set_manual` for freshly constructed actions
    pub fn with_manual(self, text: impl Into<String>) -> Self {
        // A fresh cell is always empty
        let _ = self.manual.set(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manual(&self) -> Option<&str> {
        self.manual.get().map(|s| s.as_str())
    }

    /// Set the manual text. The first write wins; later writes are rejected.
    pub fn set_manual(&self, text: impl Into<String>) -> ShellResult<()> {
        self.manual
            .set(text.into())
            .map_err(|_| ShellError::ManualAlreadySet {
                action: self.name.clone(),
            })
    }

    /// Run the action.
    ///
    /// `tokens[0]` is the command name; the rest is handed to the argument
    /// parser. A handler error is written to the terminal's stderr, then
    /// wrapped into the record with status 1.
    pub fn run(self: &Rc<Self>, tokens: Vec<String>, raw_input: &str, term: &mut Terminal) -> ExecutionRecord {
        let parsed = parse_args(tokens.get(1..).unwrap_or_default());

        let (status_code, result) = match (self.handler)(&parsed.positionals, &parsed.options, term) {
            Ok(value) => (0, Outcome::Value(value)),
            Err(err) => {
                term.stderr(err.to_string());
                (1, Outcome::Error(err))
            }
        };

        let (stdout, stderr) = term.take_output();
        ExecutionRecord {
            tokens,
            raw_input: raw_input.to_string(),
            action: Some(Rc::clone(self)),
            status_code,
            result,
            stdout,
            stderr,
            created_at: platform::now_ms(),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("manual", &self.manual())
            .finish_non_exhaustive()
    }
}

/// The value half of an execution record
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Handler returned normally
    Value(serde_json::Value),
    /// Handler failed, or the command was not found
    Error(ActionError),
}

impl Outcome {
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Value(_) => None,
            Self::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value itself, or `{"error": "<message>"}`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Error(e) => serde_json::json!({ "error": e.message() }),
        }
    }
}

/// The result of one submitted line. Immutable once created.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    /// Tokens the line was split into
    pub tokens: Vec<String>,
    /// The line exactly as submitted
    pub raw_input: String,
    /// The action that ran, `None` when lookup failed
    pub action: Option<Rc<Action>>,
    /// 0 on success, 1 when the handler failed or the command was not found
    pub status_code: i32,
    pub result: Outcome,
    /// Values written to stdout during this run only
    pub stdout: Vec<serde_json::Value>,
    /// Values written to stderr during this run only
    pub stderr: Vec<serde_json::Value>,
    /// Milliseconds since the Unix epoch
    pub created_at: f64,
}

impl ExecutionRecord {
    /// A failed run with no action behind it
    pub fn failure(
        tokens: Vec<String>,
        raw_input: &str,
        error: ActionError,
        stdout: Vec<serde_json::Value>,
        stderr: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            tokens,
            raw_input: raw_input.to_string(),
            action: None,
            status_code: 1,
            result: Outcome::Error(error),
            stdout,
            stderr,
            created_at: platform::now_ms(),
        }
    }

    /// Command name (token 0), possibly empty
    pub fn command(&self) -> &str {
        self.tokens.first().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn succeeded(&self) -> bool {
        self.status_code == 0
    }

    /// JSON form handed to JS listeners; the action appears by name
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "tokens": self.tokens,
            "rawInput": self.raw_input,
            "action": self.action.as_ref().map(|a| a.name()),
            "statusCode": self.status_code,
            "result": self.result.to_json(),
            "stdout": self.stdout,
            "stderr": self.stderr,
            "createdAt": self.created_at,
        })
    }
}
