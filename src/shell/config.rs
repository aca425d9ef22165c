//! Terminal configuration
//!
//! A fixed set of known keys with defaults, plus pass-through storage for
//! anything else. Known keys use the camelCase names of the JS-facing API.

use super::error::{ShellError, ShellResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Recall the previous history entry
    pub previous_key: String,
    /// Recall the next history entry
    pub next_key: String,
    /// Submit the line
    pub return_key: String,
    /// Cycle through command name predictions
    pub autocomplete_key: String,
    /// Install the default action set on `init`
    pub install_builtins: bool,
    pub prompt: String,
    /// Static text shown before the prompt; part of the protected region
    pub preprompt: String,
    /// Keep records for empty submissions
    pub add_empty_command_to_history: bool,
    /// Disable duplicate skipping during history recall
    pub show_duplicate_commands: bool,
    /// Oldest records are dropped past this many
    pub history_limit: Option<usize>,
    /// Unknown keys, stored untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            previous_key: "ArrowUp".to_string(),
            next_key: "ArrowDown".to_string(),
            return_key: "Enter".to_string(),
            autocomplete_key: "Tab".to_string(),
            install_builtins: true,
            prompt: "$ ".to_string(),
            preprompt: String::new(),
            add_empty_command_to_history: false,
            show_duplicate_commands: false,
            history_limit: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Config {
    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json(text: &str) -> ShellResult<Self> {
        serde_json::from_str(text).map_err(config_error)
    }

    pub fn from_value(value: serde_json::Value) -> ShellResult<Self> {
        serde_json::from_value(value).map_err(config_error)
    }

    /// Overlay `overrides` onto this configuration, last writer wins.
    ///
    /// On error `self` is left unchanged.
    pub fn merge(&mut self, overrides: &serde_json::Value) -> ShellResult<()> {
        let overrides = match overrides {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => return Ok(()),
            other => {
                return Err(ShellError::Config {
                    reason: format!("expected an object, got {}", other),
                })
            }
        };

        let mut current = match serde_json::to_value(&*self).map_err(config_error)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in overrides {
            current.insert(key.clone(), value.clone());
        }

        *self = Self::from_value(serde_json::Value::Object(current))?;
        Ok(())
    }

    /// The protected text at the start of the input: preprompt + prompt
    pub fn prompt_region(&self) -> String {
        format!("{}{}", self.preprompt, self.prompt)
    }

    /// A pass-through key that is not part of the known set
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

fn config_error(err: serde_json::Error) -> ShellError {
    ShellError::Config {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.previous_key, "ArrowUp");
        assert_eq!(config.autocomplete_key, "Tab");
        assert!(config.install_builtins);
        assert!(!config.show_duplicate_commands);
        assert_eq!(config.prompt_region(), "$ ");
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"prompt": "> ", "preprompt": "web "}"#).unwrap();
        assert_eq!(config.prompt_region(), "web > ");
        assert_eq!(config.return_key, "Enter");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let config = Config::from_json(r#"{"theme": "dark", "nextKey": "j"}"#).unwrap();
        assert_eq!(config.extra("theme"), Some(&json!("dark")));
        assert_eq!(config.next_key, "j");
        assert!(config.extra("nextKey").is_none());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = Config::from_json(r#"{"installBuiltins": "yes"}"#).unwrap_err();
        assert!(matches!(err, ShellError::Config { .. }));
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut config = Config::default();
        config.merge(&json!({"prompt": "a> ", "custom": 1})).unwrap();
        config.merge(&json!({"prompt": "b> ", "historyLimit": 10})).unwrap();
        assert_eq!(config.prompt, "b> ");
        assert_eq!(config.history_limit, Some(10));
        assert_eq!(config.extra("custom"), Some(&json!(1)));
    }

    #[test]
    fn test_merge_error_leaves_config() {
        let mut config = Config::default();
        assert!(config.merge(&json!({"prompt": 5})).is_err());
        assert!(config.merge(&json!([1, 2])).is_err());
        assert_eq!(config, Config::default());
    }
}
