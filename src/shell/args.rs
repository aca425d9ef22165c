//! Argument parser
//!
//! Turns the tokens after the command name into typed positionals and
//! flag-style options:
//!
//! - `--key`, `--key=value` : long option
//! - `-k=value`             : short option with a value
//! - `-abc`                 : three independent valueless options
//! - anything else          : positional
//!
//! Malformed option tokens are skipped (and logged) so one bad flag never
//! aborts the command. Parsing never fails.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A coerced argument or option value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Str(s) => serde_json::Value::String(s),
            Value::Num(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(b),
        }
    }
}

/// Parsed options: name -> value, `None` when the flag carried no value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: BTreeMap<String, Option<Value>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Was the option given at all (with or without a value)?
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// `Some(None)` for a present valueless option, `None` when absent
    pub fn get(&self, key: &str) -> Option<&Option<Value>> {
        self.entries.get(key)
    }

    /// The option's value, if it was given one
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(|v| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// A valued occurrence always wins; a bare flag never clears an earlier value.
    fn insert(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(v) => {
                self.entries.insert(key.to_string(), Some(v));
            }
            None => {
                self.entries.entry(key.to_string()).or_insert(None);
            }
        }
    }
}

/// Result of parsing a command's tokens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    pub positionals: Vec<Value>,
    pub options: Options,
}

/// Coerce raw text: empty stays a string, then number, then boolean, else string.
pub fn coerce(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Str(String::new());
    }
    if let Some(n) = parse_number(raw) {
        return Value::Num(n);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(raw.to_string()),
    }
}

/// Finite decimal numbers only; `inf`/`nan` spellings stay strings.
fn parse_number(raw: &str) -> Option<f64> {
    let first = raw.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn option_value(raw: Option<&str>) -> Option<Value> {
    match raw {
        Some("") | None => None,
        Some(v) => Some(coerce(v)),
    }
}

/// Parse the tokens following the command name.
pub fn parse_args<S: AsRef<str>>(tokens: &[S]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();

    for token in tokens {
        let token = token.as_ref();
        if let Some(body) = token.strip_prefix("--") {
            parse_long(body, token, &mut parsed.options);
        } else if let Some(body) = token.strip_prefix('-') {
            parse_short(body, token, &mut parsed.options);
        } else {
            parsed.positionals.push(coerce(token));
        }
    }

    parsed
}

fn parse_long(body: &str, token: &str, options: &mut Options) {
    let (key, raw) = match body.split_once('=') {
        Some((key, raw)) => (key, Some(raw)),
        None => (body, None),
    };
    if !is_valid_key(key) {
        skip(token);
        return;
    }
    options.insert(key, option_value(raw));
}

fn parse_short(body: &str, token: &str, options: &mut Options) {
    // -k=value: the '=' must be the token's third character
    let mut chars = body.chars();
    if let (Some(first), Some('=')) = (chars.next(), chars.next()) {
        let (key, raw) = body.split_at(first.len_utf8());
        if !is_valid_key(key) {
            skip(token);
            return;
        }
        options.insert(key, option_value(Some(&raw[1..])));
        return;
    }

    if body.contains('=') || !body.chars().all(is_key_char) {
        skip(token);
        return;
    }

    let mut buf = [0u8; 4];
    for c in body.chars() {
        options.insert(c.encode_utf8(&mut buf), None);
    }
}

fn skip(token: &str) {
    crate::console_log!("[args] Skipping malformed option {:?}", token);
}
