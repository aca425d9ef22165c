//! Command history
//!
//! Execution records, newest first, with an optional browsing cursor.
//! `index == None` means "at the live edge, not browsing". Whenever the
//! cursor is set it satisfies `0 <= index < len`.

use super::action::ExecutionRecord;
use std::collections::VecDeque;
use std::rc::Rc;

/// Result of stepping toward older records
#[derive(Debug, Clone)]
pub enum Previous {
    /// The cursor moved onto this record
    Record(Rc<ExecutionRecord>),
    /// Already at the oldest record; callers should leave the input alone
    AtOldest,
    /// History has no records
    Empty,
}

impl Previous {
    pub fn record(&self) -> Option<&Rc<ExecutionRecord>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

/// Execution history with a dual-ended browsing cursor
#[derive(Debug, Default)]
pub struct History {
    /// Newest at the front
    items: VecDeque<Rc<ExecutionRecord>>,
    index: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the newest end; returns the new length.
    /// A browsing cursor keeps pointing at the same record.
    pub fn push(&mut self, record: Rc<ExecutionRecord>) -> usize {
        self.items.push_front(record);
        if let Some(i) = self.index.as_mut() {
            *i += 1;
        }
        self.items.len()
    }

    /// Insert several records so that `records[0]` ends up newest.
    pub fn push_all(&mut self, records: Vec<Rc<ExecutionRecord>>) -> usize {
        let count = records.len();
        for record in records.into_iter().rev() {
            self.items.push_front(record);
        }
        if let Some(i) = self.index.as_mut() {
            *i += count;
        }
        self.items.len()
    }

    /// Remove the oldest record.
    ///
    /// A cursor at 0 is cleared; any other cursor is decremented.
    pub fn pop(&mut self) -> Option<Rc<ExecutionRecord>> {
        let removed = self.items.pop_back()?;
        self.index = match self.index {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
        Some(removed)
    }

    /// Record under the cursor
    pub fn current(&self) -> Option<Rc<ExecutionRecord>> {
        self.index.and_then(|i| self.items.get(i)).cloned()
    }

    /// Step toward older records. The first call after a reset lands on the
    /// newest record.
    pub fn previous(&mut self) -> Previous {
        if self.items.is_empty() {
            return Previous::Empty;
        }
        let next = match self.index {
            None => 0,
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(_) => return Previous::AtOldest,
        };
        self.index = Some(next);
        Previous::Record(Rc::clone(&self.items[next]))
    }

    /// Step toward newer records. Leaving the newest record (or not browsing
    /// at all) returns to the live edge and yields `None`.
    pub fn next(&mut self) -> Option<Rc<ExecutionRecord>> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                Some(Rc::clone(&self.items[i - 1]))
            }
            _ => {
                self.index = None;
                None
            }
        }
    }

    /// Back to the live edge
    pub fn reset_index(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Most recent record
    pub fn latest(&self) -> Option<Rc<ExecutionRecord>> {
        self.items.front().cloned()
    }

    pub fn get(&self, i: usize) -> Option<&Rc<ExecutionRecord>> {
        self.items.get(i)
    }

    /// Newest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rc<ExecutionRecord>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop oldest records until at most `limit` remain
    pub fn truncate_to(&mut self, limit: usize) {
        while self.items.len() > limit {
            self.pop();
        }
    }
}
