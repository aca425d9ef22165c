//! Output sinks
//!
//! A sink receives rendered lines from the stdout/stderr feeds. The terminal
//! subscribes its sink on `init`; rendering into a real surface is the
//! sink's business.

use super::events::{EventBus, ListenerId, OutputEvent, Stream};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Maximum lines to keep in the in-memory scrollback.
/// When exceeded, oldest lines are discarded from the top (FIFO).
const MAX_LINES: usize = 1000;

/// Something that can display output lines
pub trait OutputSink {
    /// Append one rendered line
    fn append(&mut self, stream: Stream, text: &str);

    /// Remove everything shown so far
    fn clear(&mut self);
}

/// Shared handle to a sink
pub type SharedSink = Rc<RefCell<dyn OutputSink>>;

/// Strings print verbatim; other values print as compact JSON.
pub fn render_data(data: &serde_json::Value) -> String {
    match data {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Subscribe `sink` to both data feeds. Multi-line values become several lines.
pub fn attach(bus: &mut EventBus, sink: SharedSink) -> (ListenerId, ListenerId) {
    bus.on_output(move |event: &OutputEvent| {
        let text = render_data(&event.data);
        let mut sink = sink.borrow_mut();
        if text.is_empty() {
            sink.append(event.stream, "");
        }
        for line in text.lines() {
            sink.append(event.stream, line);
        }
    })
}

/// A line in the scrollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub stream: Stream,
}

/// In-memory bounded scrollback
#[derive(Debug, Default)]
pub struct Scrollback {
    lines: VecDeque<OutputLine>,
}

impl Scrollback {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(64),
        }
    }

    /// Convenience for building the shared handle a terminal expects
    pub fn shared() -> Rc<RefCell<Scrollback>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Texts of one stream, oldest first
    pub fn texts(&self, stream: Stream) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.stream == stream)
            .map(|l| l.text.as_str())
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

impl OutputSink for Scrollback {
    fn append(&mut self, stream: Stream, text: &str) {
        self.lines.push_back(OutputLine {
            text: text.to_string(),
            stream,
        });
        while self.lines.len() > MAX_LINES {
            self.lines.pop_front();
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emit(bus: &mut EventBus, stream: Stream, data: serde_json::Value) {
        bus.emit_output(&OutputEvent {
            stream,
            data,
            timestamp: 0.0,
        });
    }

    #[test]
    fn test_render_data() {
        assert_eq!(render_data(&json!("plain")), "plain");
        assert_eq!(render_data(&json!(3)), "3");
        assert_eq!(render_data(&json!({"a": [1, true]})), r#"{"a":[1,true]}"#);
        assert_eq!(render_data(&json!(null)), "null");
    }

    #[test]
    fn test_attach_splits_lines() {
        let sink = Scrollback::shared();
        let mut bus = EventBus::new();
        attach(&mut bus, sink.clone());

        emit(&mut bus, Stream::Stdout, json!("line1\nline2"));
        emit(&mut bus, Stream::Stderr, json!("oops"));
        emit(&mut bus, Stream::Stdout, json!(""));

        let sink = sink.borrow();
        assert_eq!(sink.texts(Stream::Stdout), vec!["line1", "line2", ""]);
        assert_eq!(sink.texts(Stream::Stderr), vec!["oops"]);
    }

    #[test]
    fn test_scrollback_max_lines_trimming() {
        let mut sink = Scrollback::new();
        for i in 0..(MAX_LINES + 100) {
            sink.append(Stream::Stdout, &format!("line {}", i));
        }
        assert_eq!(sink.line_count(), MAX_LINES);
        assert_eq!(sink.lines().next().unwrap().text, "line 100");
        assert!(sink.contains(&format!("line {}", MAX_LINES + 99)));
    }

    #[test]
    fn test_scrollback_clear() {
        let mut sink = Scrollback::new();
        sink.append(Stream::Stdout, "x");
        sink.clear();
        assert_eq!(sink.line_count(), 0);
    }
}
