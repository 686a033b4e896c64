//! Linear undo/redo history of buffer snapshots.

/// Snapshot list with a cursor into it.
///
/// Entry 0 is the text the edit session started with. Recording after an
/// undo drops every entry past the current index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Record `text` as the newest entry unless it equals the current one.
    ///
    /// Returns `true` if an entry was added.
    pub fn record(&mut self, text: &str) -> bool {
        if self.current() == text {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(text.to_string());
        self.index = self.entries.len() - 1;
        true
    }

    /// Step back one entry. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward one entry. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub const fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
