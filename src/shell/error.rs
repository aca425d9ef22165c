//! Error types for the shell
//!
//! Only programmer errors leave the core as `Err`. User-facing failures
//! (unknown commands, failing handlers) become execution records instead.

use std::fmt;

/// Result type for registration and setup operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors returned to the caller of the registration and setup APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// An action with this name is already registered
    DuplicateKey { key: String },

    /// Registered actions need a name; only the fallback goes without one
    EmptyKey,

    /// The action's manual was already written once
    ManualAlreadySet { action: String },

    /// Configuration could not be parsed or a known field has the wrong type
    Config { reason: String },

    /// A DOM element was missing or of the wrong kind
    Dom { reason: String },
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key } => {
                write!(f, "duplicate key: an action named '{}' is already registered", key)
            }
            Self::EmptyKey => write!(f, "empty key: only the fallback action may be unnamed"),
            Self::ManualAlreadySet { action } => {
                write!(f, "manual for '{}' is already set", action)
            }
            Self::Config { reason } => write!(f, "invalid configuration: {}", reason),
            Self::Dom { reason } => write!(f, "DOM error: {}", reason),
        }
    }
}

impl std::error::Error for ShellError {}

/// The failure a handler returns instead of a value.
///
/// Caught at the action boundary and wrapped into the execution record;
/// it never propagates out of `Terminal::execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ActionError {}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<ShellError> for ActionError {
    fn from(err: ShellError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_names_key() {
        let err = ShellError::DuplicateKey { key: "echo".into() };
        assert!(err.to_string().contains("'echo'"));
    }

    #[test]
    fn test_action_error_from_str() {
        let err: ActionError = "boom".into();
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");
    }
}
