//! Built-in actions
//!
//! Thin handlers over the terminal, installed by `init` when
//! `installBuiltins` is set. Each carries its manual from construction.

use super::action::{Action, HandlerResult};
use super::args::{Options, Value};
use super::output::render_data;
use super::terminal::Terminal;
use serde_json::json;

/// Every built-in, in installation order
pub fn all() -> Vec<Action> {
    vec![
        Action::new("echo", builtin_echo).with_manual("echo [words...]\nPrint the arguments, separated by spaces."),
        Action::new("alert", builtin_alert).with_manual("alert [words...]\nShow the arguments in a browser alert."),
        Action::new("man", builtin_man).with_manual("man <command>\nShow the manual of a command."),
        Action::new("help", builtin_help).with_manual("help\nList commands with a one-line summary."),
        Action::new("result", builtin_result).with_manual("result\nPrint the result of the last command."),
        Action::new("commands", builtin_commands).with_manual("commands\nList registered commands."),
        Action::new("list", builtin_commands).with_manual("list\nList registered commands."),
        Action::new("clear", builtin_clear).with_manual("clear\nClear the output."),
        Action::new("history", builtin_history).with_manual("history\nList previous command lines, oldest first."),
        Action::new("return", builtin_return).with_manual("return\nDo nothing."),
    ]
}

fn join(args: &[Value]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(" ")
}

/// echo - print arguments
fn builtin_echo(args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let text = join(args);
    term.stdout(text.clone());
    Ok(json!(text))
}

/// alert - browser alert, stdout elsewhere
fn builtin_alert(args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let text = join(args);

    #[cfg(target_arch = "wasm32")]
    {
        let _ = term;
        let window = web_sys::window().ok_or("alert: no window")?;
        window
            .alert_with_message(&text)
            .map_err(|e| format!("alert: {:?}", e))?;
    }

    #[cfg(not(target_arch = "wasm32"))]
    term.stdout(text);

    Ok(serde_json::Value::Null)
}

/// man - show a command's manual
fn builtin_man(args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let name = match args.first() {
        Some(name) => name.to_string(),
        None => return Err("man: what manual page do you want?".into()),
    };
    let action = term
        .registry()
        .find(&name)
        .ok_or_else(|| format!("man: no manual entry for {}", name))?;
    let manual = action
        .manual()
        .ok_or_else(|| format!("man: no manual entry for {}", name))?
        .to_string();

    term.stdout(manual.clone());
    Ok(json!(manual))
}

/// help - commands with the first line of their manual
fn builtin_help(_args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let entries: Vec<String> = term
        .registry()
        .iter()
        .map(|a| match a.manual().and_then(|m| m.lines().next()) {
            Some(usage) => format!("{:<10} {}", a.name(), usage),
            None => a.name().to_string(),
        })
        .collect();

    term.stdout("Available commands:");
    for entry in &entries {
        term.stdout(format!("  {}", entry));
    }
    Ok(json!(entries))
}

/// result - the last command's result
fn builtin_result(_args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let record = term.last_record().ok_or("result: no previous command")?;
    let result = record.result.to_json();
    term.stdout(render_data(&result));
    Ok(result)
}

/// commands / list - registered names
fn builtin_commands(_args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let keys: Vec<String> = term.registry().keys().into_iter().map(String::from).collect();
    term.stdout(keys.join("\n"));
    Ok(json!(keys))
}

/// clear - clear the output sink
fn builtin_clear(_args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    term.clear_output();
    Ok(serde_json::Value::Null)
}

/// history - numbered raw inputs, oldest first
fn builtin_history(_args: &[Value], _opts: &Options, term: &mut Terminal) -> HandlerResult {
    let inputs: Vec<String> = term
        .history()
        .iter()
        .rev()
        .map(|r| r.raw_input.clone())
        .collect();
    for (i, input) in inputs.iter().enumerate() {
        term.stdout(format!("{:>4}  {}", i + 1, input));
    }
    Ok(json!(inputs))
}

/// return - no-op
fn builtin_return(_args: &[Value], _opts: &Options, _term: &mut Terminal) -> HandlerResult {
    Ok(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::config::Config;
    use crate::shell::registry::ActionRegistry;

    fn term() -> Terminal {
        let mut config = Config::default();
        config.install_builtins = false;
        let mut term = Terminal::new(config);
        term.registry_mut().add_all(all()).unwrap();
        term
    }

    #[test]
    fn test_all_unique_with_manuals() {
        let mut reg = ActionRegistry::new();
        assert!(reg.add_all(all()).is_ok());
        assert!(reg.iter().all(|a| a.manual().is_some()));
    }

    #[test]
    fn test_echo() {
        let mut term = term();
        let record = term.execute("echo hello   'big world' 3");
        assert_eq!(record.result.value(), Some(&json!("hello big world 3")));
        assert_eq!(record.stdout, vec![json!("hello big world 3")]);
    }

    #[test]
    fn test_alert_native_writes_stdout() {
        let mut term = term();
        let record = term.execute("alert careful");
        assert_eq!(record.status_code, 0);
        assert_eq!(record.stdout, vec![json!("careful")]);
    }

    #[test]
    fn test_man() {
        let mut term = term();
        let record = term.execute("man echo");
        assert_eq!(record.status_code, 0);
        assert!(record.stdout[0].as_str().unwrap().starts_with("echo [words...]"));
    }

    #[test]
    fn test_man_errors() {
        let mut term = term();
        let record = term.execute("man");
        assert_eq!(record.status_code, 1);
        let record = term.execute("man nothing");
        assert_eq!(record.status_code, 1);
        assert!(record.stderr[0].as_str().unwrap().contains("no manual entry for nothing"));
    }

    #[test]
    fn test_help_lists_usage() {
        let mut term = term();
        let record = term.execute("help");
        assert_eq!(record.stdout[0], json!("Available commands:"));
        assert!(record.stdout.iter().any(|l| l.as_str().unwrap().contains("man <command>")));
    }

    #[test]
    fn test_result_of_last_command() {
        let mut term = term();
        assert_eq!(term.execute("result").status_code, 1);
        term.execute("echo 42");
        let record = term.execute("result");
        assert_eq!(record.result.value(), Some(&json!("42")));
    }

    #[test]
    fn test_result_after_failure() {
        let mut term = term();
        term.execute("missing");
        let record = term.execute("result");
        assert_eq!(record.result.value(), Some(&json!({ "error": "missing not found" })));
    }

    #[test]
    fn test_commands_in_insertion_order() {
        let mut term = term();
        let record = term.execute("list");
        let keys = record.result.value().unwrap().as_array().unwrap().clone();
        assert_eq!(keys.first(), Some(&json!("echo")));
        assert_eq!(keys.last(), Some(&json!("return")));
    }

    #[test]
    fn test_history_numbered() {
        let mut term = term();
        term.execute("echo a");
        term.execute("echo b");
        let record = term.execute("history");
        assert_eq!(record.stdout, vec![json!("   1  echo a"), json!("   2  echo b")]);
    }

    #[test]
    fn test_return_noop() {
        let mut term = term();
        let record = term.execute("return");
        assert_eq!(record.status_code, 0);
        assert_eq!(record.result.value(), Some(&serde_json::Value::Null));
        assert!(record.stdout.is_empty());
    }
}
