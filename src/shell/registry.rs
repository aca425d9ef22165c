//! Action registry
//!
//! Named actions in insertion order, with unique names, plus the fallback
//! that runs for an empty command line.

use super::action::Action;
use super::error::{ShellError, ShellResult};
use std::rc::Rc;

/// Registry of available actions
pub struct ActionRegistry {
    actions: Vec<Rc<Action>>,
    /// Runs for an empty command name. Never found by name.
    fallback: Rc<Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            fallback: Rc::new(Action::noop("")),
        }
    }

    /// Register one action; returns the new count.
    ///
    /// Fails with `DuplicateKey` if the name is taken, including by the
    /// very same action, and with `EmptyKey` for an unnamed action.
    pub fn add(&mut self, action: impl Into<Rc<Action>>) -> ShellResult<usize> {
        let action = action.into();
        if action.name().is_empty() {
            return Err(ShellError::EmptyKey);
        }
        if self.contains(action.name()) {
            return Err(ShellError::DuplicateKey {
                key: action.name().to_string(),
            });
        }
        self.actions.push(action);
        Ok(self.actions.len())
    }

    /// Register several actions in order. Stops at the first collision;
    /// the ones added before it stay registered.
    pub fn add_all<I, A>(&mut self, actions: I) -> ShellResult<usize>
    where
        I: IntoIterator<Item = A>,
        A: Into<Rc<Action>>,
    {
        for action in actions {
            self.add(action)?;
        }
        Ok(self.actions.len())
    }

    /// Replace the whole set. A collision inside `actions` leaves only the
    /// prefix inserted before it.
    pub fn set_actions<I, A>(&mut self, actions: I) -> ShellResult<usize>
    where
        I: IntoIterator<Item = A>,
        A: Into<Rc<Action>>,
    {
        self.actions.clear();
        self.add_all(actions)
    }

    /// First name in `names` that `add` would reject, as the error it
    /// would return. Nothing is inserted.
    pub fn check_available<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ShellResult<()> {
        let mut seen: Vec<&str> = Vec::new();
        for name in names {
            if name.is_empty() {
                return Err(ShellError::EmptyKey);
            }
            if self.contains(name) || seen.contains(&name) {
                return Err(ShellError::DuplicateKey {
                    key: name.to_string(),
                });
            }
            seen.push(name);
        }
        Ok(())
    }

    /// Look up by name. The empty name never matches (not even the fallback).
    pub fn find(&self, name: &str) -> Option<Rc<Action>> {
        if name.is_empty() {
            return None;
        }
        self.actions.iter().find(|a| a.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.iter().any(|a| a.name() == name)
    }

    /// Remove this exact action (by identity, not by name)
    pub fn remove(&mut self, action: &Rc<Action>) -> Option<Rc<Action>> {
        let idx = self.actions.iter().position(|a| Rc::ptr_eq(a, action))?;
        Some(self.actions.remove(idx))
    }

    /// Names in insertion order
    pub fn keys(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Names starting with `prefix`, in insertion order (all when empty)
    pub fn predict(&self, prefix: &str) -> Vec<String> {
        self.actions
            .iter()
            .map(|a| a.name())
            .filter(|name| name.starts_with(prefix))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Action>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn fallback(&self) -> Rc<Action> {
        Rc::clone(&self.fallback)
    }

    pub fn set_fallback(&mut self, action: impl Into<Rc<Action>>) {
        self.fallback = action.into();
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
