//! Event feeds
//!
//! Three feeds leave the terminal:
//! - `stdout` / `stderr`: every value a handler writes, as it is written
//! - `executed`: one execution record per completed submission
//!
//! Listeners are called synchronously, in subscription order.

use super::action::ExecutionRecord;
use slab::Slab;

/// Which data feed a value was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// One value written to a data feed
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEvent {
    pub stream: Stream,
    pub data: serde_json::Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feed {
    Stdout,
    Stderr,
    Executed,
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId {
    feed: Feed,
    key: usize,
}

type OutputListener = Box<dyn FnMut(&OutputEvent)>;
type ExecutedListener = Box<dyn FnMut(&ExecutionRecord)>;

/// Listener tables for all three feeds
#[derive(Default)]
pub struct EventBus {
    stdout: Slab<OutputListener>,
    stderr: Slab<OutputListener>,
    executed: Slab<ExecutedListener>,
    /// Subscription order across slab slot reuse
    order: Vec<ListenerId>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_stdout(&mut self, listener: impl FnMut(&OutputEvent) + 'static) -> ListenerId {
        let key = self.stdout.insert(Box::new(listener));
        self.track(Feed::Stdout, key)
    }

    pub fn on_stderr(&mut self, listener: impl FnMut(&OutputEvent) + 'static) -> ListenerId {
        let key = self.stderr.insert(Box::new(listener));
        self.track(Feed::Stderr, key)
    }

    /// Subscribe one listener to both data feeds
    pub fn on_output(&mut self, listener: impl FnMut(&OutputEvent) + Clone + 'static) -> (ListenerId, ListenerId) {
        (self.on_stdout(listener.clone()), self.on_stderr(listener))
    }

    pub fn on_executed(&mut self, listener: impl FnMut(&ExecutionRecord) + 'static) -> ListenerId {
        let key = self.executed.insert(Box::new(listener));
        self.track(Feed::Executed, key)
    }

    /// Unsubscribe; false if the listener was already gone
    pub fn off(&mut self, id: ListenerId) -> bool {
        let removed = match id.feed {
            Feed::Stdout => self.stdout.try_remove(id.key).is_some(),
            Feed::Stderr => self.stderr.try_remove(id.key).is_some(),
            Feed::Executed => self.executed.try_remove(id.key).is_some(),
        };
        if removed {
            self.order.retain(|o| *o != id);
        }
        removed
    }

    pub fn emit_output(&mut self, event: &OutputEvent) {
        let feed = match event.stream {
            Stream::Stdout => Feed::Stdout,
            Stream::Stderr => Feed::Stderr,
        };
        let table = match feed {
            Feed::Stdout => &mut self.stdout,
            _ => &mut self.stderr,
        };
        for id in self.order.iter().filter(|id| id.feed == feed) {
            if let Some(listener) = table.get_mut(id.key) {
                listener(event);
            }
        }
    }

    pub fn emit_executed(&mut self, record: &ExecutionRecord) {
        for id in self.order.iter().filter(|id| id.feed == Feed::Executed) {
            if let Some(listener) = self.executed.get_mut(id.key) {
                listener(record);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.order.len()
    }

    fn track(&mut self, feed: Feed, key: usize) -> ListenerId {
        let id = ListenerId { feed, key };
        self.order.push(id);
        id
    }
}
