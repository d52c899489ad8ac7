//! Progress reporting
//!
//! Operator-facing progress messages go through a [`Reporter`] handed to the
//! deployer and the backends, so callers decide where they end up.

use std::cell::RefCell;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Sink for progress messages.
pub trait Reporter {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);
}

/// Forwards messages to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Records messages in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: RefCell<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.at_level(Level::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at_level(Level::Warn)
    }

    fn at_level(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Warn, message.to_string()));
    }
}
