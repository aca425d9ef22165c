//! webshell - A shell-like command line for a browser text input
//!
//! A single text input becomes a command line:
//! - Input is tokenized (three quote styles, backslash escapes)
//! - Tokens split into typed positionals and flag-style options
//! - Named actions run against the terminal with isolated error capture
//! - Every run produces an execution record kept in a browsable history
//! - Keystrokes drive history recall, autocomplete and prompt protection
//!
//! Platform support:
//! - Browser (wasm32-unknown-unknown): DOM input element + output element
//! - Native: the whole pipeline, driven through an abstract editable surface

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod platform;
pub mod shell;

#[cfg(target_arch = "wasm32")]
pub mod runtime;

/// Initialize panic hook for better error messages in browser console
#[cfg(target_arch = "wasm32")]
fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM entry point. Mounting happens from JS through `WebTerminal`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    init_panic_hook();
    console_log!("[webshell] Module loaded");
}

/// Console logging helper
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Log to browser console (WASM)
#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::log(&format!($($t)*))
    };
}

/// Log to stderr (native)
#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        eprintln!($($t)*)
    };
}
