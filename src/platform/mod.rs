//! Platform Abstraction Layer
//!
//! Host services the shell needs but should not know the origin of:
//!
//! - Browser (via wasm-bindgen, web-sys): DOM input surface, DOM output sink
//! - Native: wall clock only; surfaces and sinks come from the caller
//!
//! The shell core is platform-agnostic. Only this module knows about the host.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
