//! Browser runtime integration
//!
//! This module bridges the terminal to the page:
//! - `WebTerminal` is the JS-facing handle (`new WebTerminal("input", "output", {...})`)
//! - `keydown` on the input element is routed through the terminal
//! - `selectionchange` on the document keeps the caret out of the prompt
//! - JS callbacks can subscribe to the stdout/stderr/executed feeds

use crate::console_log;
use crate::platform::web::{DomInput, DomOutput};
use crate::shell::{Config, EditableSurface, KeyEvent, OutputEvent, ShellError, Terminal};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A terminal mounted on a DOM input element
#[wasm_bindgen]
pub struct WebTerminal {
    terminal: Rc<RefCell<Terminal>>,
    input: Rc<RefCell<DomInput>>,
    /// Same element as `input`, usable while the surface is borrowed
    element: web_sys::HtmlInputElement,
    /// Listeners installed?
    started: bool,
}

#[wasm_bindgen]
impl WebTerminal {
    /// Mount on `<input id=input_id>`, optionally rendering output into
    /// the element `output_id`. `config` is a plain object (or undefined).
    #[wasm_bindgen(constructor)]
    pub fn new(input_id: &str, output_id: Option<String>, config: JsValue) -> Result<WebTerminal, JsValue> {
        let config = config_from_js(&config).map_err(to_js)?;
        let input = DomInput::by_id(input_id).map_err(to_js)?;

        let mut terminal = Terminal::new(config);
        if let Some(id) = output_id {
            let output = DomOutput::by_id(&id).map_err(to_js)?;
            terminal = terminal.with_output(Rc::new(RefCell::new(output)));
        }

        Ok(WebTerminal {
            terminal: Rc::new(RefCell::new(terminal)),
            element: input.element().clone(),
            input: Rc::new(RefCell::new(input)),
            started: false,
        })
    }

    /// Activate: listeners, built-ins, output adapter, initial prompt.
    /// Calling it again does nothing and returns false.
    pub fn init(&mut self) -> Result<bool, JsValue> {
        if self.started {
            console_log!("[runtime] Already running");
            return Ok(false);
        }

        let first = {
            let mut input = self.input.try_borrow_mut().map_err(|_| busy())?;
            let mut terminal = self.terminal.try_borrow_mut().map_err(|_| busy())?;
            terminal.init(&mut *input).map_err(to_js)?
        };
        setup_event_listeners(&self.terminal, &self.input);
        self.started = true;
        Ok(first)
    }

    /// Run a line as if it had been submitted; returns the status code
    pub fn execute(&self, line: &str) -> Result<i32, JsValue> {
        let mut terminal = self
            .terminal
            .try_borrow_mut()
            .map_err(|_| busy())?;
        Ok(terminal.execute(line).status_code)
    }

    /// `callback({stream, data, timestamp})` for every stdout write
    #[wasm_bindgen(js_name = onStdout)]
    pub fn on_stdout(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let mut terminal = self.terminal.try_borrow_mut().map_err(|_| busy())?;
        terminal
            .events_mut()
            .on_stdout(move |event| call_js(&callback, &output_to_json(event)));
        Ok(())
    }

    /// `callback({stream, data, timestamp})` for every stderr write
    #[wasm_bindgen(js_name = onStderr)]
    pub fn on_stderr(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let mut terminal = self.terminal.try_borrow_mut().map_err(|_| busy())?;
        terminal
            .events_mut()
            .on_stderr(move |event| call_js(&callback, &output_to_json(event)));
        Ok(())
    }

    /// `callback(record)` once per completed submission
    #[wasm_bindgen(js_name = onExecuted)]
    pub fn on_executed(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let mut terminal = self.terminal.try_borrow_mut().map_err(|_| busy())?;
        terminal
            .events_mut()
            .on_executed(move |record| call_js(&callback, &record.to_json()));
        Ok(())
    }

    /// Focus the input and put the caret after the current text
    ///
    /// From inside a running command (a feed listener) the element is in
    /// use, so only the native focus call happens there.
    pub fn focus(&self) {
        let _ = self.element.focus();
        let Ok(mut input) = self.input.try_borrow_mut() else {
            console_log!("[runtime] Input busy, caret left in place");
            return;
        };
        let end = input.value().chars().count();
        input.set_selection(crate::shell::Selection::caret(end));
    }
}

fn config_from_js(config: &JsValue) -> Result<Config, ShellError> {
    if config.is_undefined() || config.is_null() {
        return Ok(Config::default());
    }
    let text = js_sys::JSON::stringify(config)
        .ok()
        .and_then(|s| s.as_string())
        .ok_or_else(|| ShellError::Config {
            reason: "configuration is not JSON-serializable".to_string(),
        })?;
    Config::from_json(&text)
}

fn busy() -> JsValue {
    JsValue::from_str("terminal is busy")
}

fn to_js(err: ShellError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn output_to_json(event: &OutputEvent) -> serde_json::Value {
    serde_json::json!({
        "stream": event.stream.as_str(),
        "data": event.data,
        "timestamp": event.timestamp,
    })
}

fn call_js(callback: &js_sys::Function, value: &serde_json::Value) {
    let arg = js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL);
    if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
        console_log!("[runtime] Listener failed: {:?}", e);
    }
}

/// Set up keydown and selectionchange listeners
fn setup_event_listeners(terminal: &Rc<RefCell<Terminal>>, input: &Rc<RefCell<DomInput>>) {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => {
            console_log!("[runtime] No document object");
            return;
        }
    };

    // Key down
    {
        let terminal = Rc::clone(terminal);
        let input_ref = Rc::clone(input);
        let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            let (Ok(mut term), Ok(mut surface)) = (terminal.try_borrow_mut(), input_ref.try_borrow_mut()) else {
                console_log!("[runtime] Key {:?} dropped while a command is running", event.key());
                return;
            };
            let key = KeyEvent {
                key: event.key(),
                ctrl: event.ctrl_key(),
                alt: event.alt_key(),
                meta: event.meta_key(),
            };
            let outcome = term.handle_keydown(&mut *surface, &key);
            if outcome.prevent_default {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);

        let _ = input
            .borrow()
            .element()
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget(); // Leak intentionally - lives for page lifetime
    }

    // Selection change
    {
        let terminal = Rc::clone(terminal);
        let input_ref = Rc::clone(input);
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let (Ok(mut term), Ok(mut surface)) = (terminal.try_borrow_mut(), input_ref.try_borrow_mut()) {
                term.handle_selection_change(&mut *surface);
            }
        }) as Box<dyn FnMut(_)>);

        let _ = document.add_event_listener_with_callback("selectionchange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    console_log!("[runtime] Event listeners installed");
}
