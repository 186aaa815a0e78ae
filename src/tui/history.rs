//! Submitted-command history for the input line.

use std::collections::VecDeque;

/// Number of submitted lines kept per session.
pub const DEFAULT_CAPACITY: usize = 100;

/// Previously submitted lines with Up/Down navigation.
#[derive(Debug)]
pub struct InputHistory {
    /// Oldest first.
    entries: VecDeque<String>,
    capacity: usize,
    /// Index being shown, `None` while editing a fresh line.
    cursor: Option<usize>,
    /// The unsent line saved when navigation started.
    draft: String,
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            cursor: None,
            draft: String::new(),
        }
    }

    /// Records a submitted line.
    ///
    /// Blank lines and repeats of the latest entry are not stored. Navigation
    /// restarts from the newest entry either way.
    pub fn record(&mut self, line: &str) {
        self.cursor = None;
        self.draft.clear();

        let line = line.trim();
        if line.is_empty() || self.entries.back().is_some_and(|last| last == line) {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// Steps to an older entry. `current` is saved as the draft on the first step.
    ///
    /// Returns `None` when there is nothing older.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        let next = match self.cursor {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(index) => index - 1,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Steps to a newer entry, ending at the saved draft.
    ///
    /// Returns `None` when already editing a fresh line.
    pub fn newer(&mut self) -> Option<&str> {
        let index = self.cursor?;
        if index + 1 < self.entries.len() {
            self.cursor = Some(index + 1);
            self.entries.get(index + 1).map(String::as_str)
        } else {
            self.cursor = None;
            Some(self.draft.as_str())
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }
}
