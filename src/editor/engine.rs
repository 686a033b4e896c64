//! The editing session for one text block: buffer, selection and history.

use super::buffer::{Direction, Selection, TextBuffer};
use super::format::{self, FormatAction};
use super::history::History;

/// Text editor state for a single edit session.
///
/// Every operation that changes the text records a history entry. Undo and
/// redo move through that history without recording.
#[derive(Debug)]
pub struct FormatEngine {
    buffer: TextBuffer,
    history: History,
}

impl FormatEngine {
    /// Start a session on `text`. The caret starts at the end.
    pub fn new(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from_text(text),
            history: History::new(text),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub const fn selection(&self) -> Selection {
        self.buffer.selection()
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn char_count(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.buffer.set_selection(selection);
    }

    // --- Typing ---

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert_char(ch);
        self.record();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.buffer.insert_str(s);
        self.record();
    }

    pub fn newline(&mut self) {
        self.buffer.split_line();
        self.record();
    }

    pub fn backspace(&mut self) {
        if self.buffer.delete_back() {
            self.record();
        }
    }

    pub fn delete(&mut self) {
        if self.buffer.delete_forward() {
            self.record();
        }
    }

    // --- Movement ---

    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        self.buffer.move_cursor(direction, extend);
    }

    pub fn move_word(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => self.buffer.move_word_left(extend),
            Direction::Right => self.buffer.move_word_right(extend),
            Direction::Up | Direction::Down => self.buffer.move_cursor(direction, extend),
        }
    }

    pub fn move_home(&mut self, extend: bool) {
        self.buffer.move_home(extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.buffer.move_end(extend);
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.buffer.move_to_start(extend);
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.buffer.move_to_end(extend);
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    // --- Formatting ---

    /// Apply an inline or block formatting action.
    pub fn apply(&mut self, action: FormatAction) {
        let edit = format::apply(&self.buffer.text(), self.buffer.selection(), action);
        self.buffer.set_text(&edit.text, edit.selection);
        self.record();
        tracing::trace!(action = %action.label(), "format applied");
    }

    /// Insert a link to `url`. Returns `false` and changes nothing if the
    /// url is blank.
    pub fn insert_link(&mut self, url: &str) -> bool {
        let Some(edit) = format::insert_link(&self.buffer.text(), self.buffer.selection(), url)
        else {
            return false;
        };
        self.buffer.set_text(&edit.text, edit.selection);
        self.record();
        true
    }

    // --- History ---

    /// Step back one history entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let selection = self.buffer.selection();
        match self.history.undo() {
            Some(text) => {
                let text = text.to_string();
                self.buffer.set_text(&text, selection);
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        let selection = self.buffer.selection();
        match self.history.redo() {
            Some(text) => {
                let text = text.to_string();
                self.buffer.set_text(&text, selection);
                true
            }
            None => false,
        }
    }

    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn record(&mut self) {
        self.history.record(&self.buffer.text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(engine: &mut FormatEngine, s: &str) {
        for ch in s.chars() {
            engine.insert_char(ch);
        }
    }

    #[test]
    fn test_new_session_starts_with_initial_entry() {
        let engine = FormatEngine::new("hi");
        assert_eq!(engine.history().entries(), ["hi"]);
        assert_eq!(engine.selection(), Selection::caret(2));
    }

    #[test]
    fn test_each_keystroke_is_recorded() {
        let mut engine = FormatEngine::new("");
        type_str(&mut engine, "abc");
        assert_eq!(engine.history().entries(), ["", "a", "ab", "abc"]);
    }

    #[test]
    fn test_new_edit_after_undo_discards_future() {
        let mut engine = FormatEngine::new("");
        type_str(&mut engine, "abc");
        assert!(engine.undo());
        assert_eq!(engine.text(), "ab");
        engine.insert_char('X');
        assert_eq!(engine.history().entries(), ["", "a", "ab", "abX"]);
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_undo_at_start_and_redo_at_end_are_noops() {
        let mut engine = FormatEngine::new("x");
        assert!(!engine.undo());
        assert!(!engine.redo());
        assert_eq!(engine.text(), "x");
    }

    #[test]
    fn test_undo_clamps_selection() {
        let mut engine = FormatEngine::new("");
        type_str(&mut engine, "hello");
        engine.undo();
        engine.undo();
        assert_eq!(engine.text(), "hel");
        assert_eq!(engine.selection(), Selection::caret(3));
    }

    #[test]
    fn test_undo_then_redo_restores_format() {
        let mut engine = FormatEngine::new("hello world");
        engine.set_selection(Selection::new(0, 5));
        engine.apply(FormatAction::Bold);
        assert_eq!(engine.text(), "**hello** world");
        assert_eq!(engine.selection(), Selection::new(2, 7));
        assert!(engine.undo());
        assert_eq!(engine.text(), "hello world");
        assert!(engine.redo());
        assert_eq!(engine.text(), "**hello** world");
    }

    #[test]
    fn test_noop_edits_do_not_record() {
        let mut engine = FormatEngine::new("abc");
        engine.move_to_start(false);
        engine.backspace();
        engine.apply(FormatAction::OrderedList);
        engine.apply(FormatAction::OrderedList);
        assert_eq!(engine.history().entries(), ["abc", "1. abc"]);
    }

    #[test]
    fn test_blank_link_leaves_history_alone() {
        let mut engine = FormatEngine::new("abc");
        assert!(!engine.insert_link(" "));
        assert_eq!(engine.history().entries().len(), 1);
        assert!(engine.insert_link("https://a.b"));
        assert_eq!(engine.text(), "abc[Link text](https://a.b)");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut engine = FormatEngine::new("hello world");
        engine.select_all();
        engine.insert_char('x');
        assert_eq!(engine.text(), "x");
    }
}
