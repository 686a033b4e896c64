use ropey::Rope;

/// A selection in character offsets.
///
/// `anchor` stays put while `head` moves. When they are equal the selection
/// is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    /// A collapsed selection at `pos`.
    pub const fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub const fn start(self) -> usize {
        if self.anchor < self.head {
            self.anchor
        } else {
            self.head
        }
    }

    pub const fn end(self) -> usize {
        if self.anchor > self.head {
            self.anchor
        } else {
            self.head
        }
    }

    pub const fn is_empty(self) -> bool {
        self.anchor == self.head
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope, with a selection.
///
/// Only `\n` separates lines. All positions are character offsets into the
/// whole buffer.
pub struct TextBuffer {
    rope: Rope,
    selection: Selection,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl TextBuffer {
    /// Create a new buffer from a string with the caret at the end.
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let end = rope.len_chars();
        let mut buf = Self {
            rope,
            selection: Selection::caret(end),
            col_memory: 0,
        };
        buf.remember_col();
        buf
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length of the buffer in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').to_string())
    }

    /// Length of a line in characters (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Character offset where `line_idx` begins, clamped to the buffer end.
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line_idx)
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Selected text, empty for a caret.
    pub fn selected_text(&self) -> String {
        let sel = self.selection;
        self.rope.slice(sel.start()..sel.end()).to_string()
    }

    /// Replace the selection, clamping both ends to the buffer.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.len_chars();
        self.selection = Selection::new(selection.anchor.min(len), selection.head.min(len));
        self.remember_col();
    }

    /// Cursor (selection head) as `(line, column)`.
    pub fn cursor_position(&self) -> (usize, usize) {
        let head = self.selection.head;
        let line = self.rope.char_to_line(head);
        (line, head - self.rope.line_to_char(line))
    }

    /// Replace the whole text and set a new selection.
    pub fn set_text(&mut self, text: &str, selection: Selection) {
        self.rope = Rope::from_str(text);
        self.set_selection(selection);
    }

    /// Replace the selected range with `s`, leaving the caret after it.
    pub fn replace_selection(&mut self, s: &str) {
        let start = self.selection.start();
        let end = self.selection.end();
        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, s);
        self.selection = Selection::caret(start + s.chars().count());
        self.remember_col();
    }

    /// Insert a character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.replace_selection(ch.encode_utf8(&mut tmp));
    }

    /// Insert a string at the cursor, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() && self.selection.is_empty() {
            return;
        }
        self.replace_selection(s);
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if !self.selection.is_empty() {
            self.replace_selection("");
            return true;
        }
        let head = self.selection.head;
        if head == 0 {
            return false;
        }
        self.rope.remove(head - 1..head);
        self.selection = Selection::caret(head - 1);
        self.remember_col();
        true
    }

    /// Delete the selection, or the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            self.replace_selection("");
            return true;
        }
        let head = self.selection.head;
        if head >= self.len_chars() {
            return false;
        }
        self.rope.remove(head..=head);
        true
    }

    /// Move the cursor in the given direction, extending the selection when
    /// `extend` is set.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => self.move_left(extend),
            Direction::Right => self.move_right(extend),
            Direction::Up => self.move_vertical(-1, extend),
            Direction::Down => self.move_vertical(1, extend),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub fn move_home(&mut self, extend: bool) {
        let (line, _) = self.cursor_position();
        let target = self.rope.line_to_char(line);
        self.place_head(target, extend);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self, extend: bool) {
        let (line, _) = self.cursor_position();
        let target = self.rope.line_to_char(line) + self.line_len(line);
        self.place_head(target, extend);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self, extend: bool) {
        let (line, col) = self.cursor_position();
        let line_start = self.rope.line_to_char(line);
        if col == 0 {
            if line > 0 {
                let prev = line - 1;
                let target = self.rope.line_to_char(prev) + self.line_len(prev);
                self.place_head(target, extend);
            }
            return;
        }

        let chars: Vec<char> = self.rope.slice(line_start..line_start + col).chars().collect();
        let mut idx = chars.len();
        while idx > 0 && chars[idx - 1].is_whitespace() {
            idx -= 1;
        }
        while idx > 0 && is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
        if idx == chars.len() {
            // Punctuation directly before the cursor counts as one step.
            idx -= 1;
        }
        self.place_head(line_start + idx, extend);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self, extend: bool) {
        let (line, col) = self.cursor_position();
        let line_len = self.line_len(line);
        let line_start = self.rope.line_to_char(line);

        if col >= line_len {
            if line + 1 < self.line_count() {
                let target = self.rope.line_to_char(line + 1);
                self.place_head(target, extend);
            }
            return;
        }

        let chars: Vec<char> = self
            .rope
            .slice(line_start + col..line_start + line_len)
            .chars()
            .collect();
        // Skip current word characters, then the gap after them.
        let word_end = chars
            .iter()
            .position(|c| !is_word_char(*c))
            .unwrap_or(chars.len());
        let gap_end = chars[word_end..]
            .iter()
            .position(|c| is_word_char(*c))
            .map_or(chars.len(), |i| word_end + i);
        self.place_head(line_start + col + gap_end, extend);
    }

    /// Move cursor to a specific line and column, collapsing the selection.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        let line = line.min(max_line);
        let target = self.rope.line_to_char(line) + col.min(self.line_len(line));
        self.place_head(target, false);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.place_head(0, extend);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self, extend: bool) {
        self.place_head(self.len_chars(), extend);
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.len_chars());
        self.remember_col();
    }

    // --- Private helpers ---

    fn place_head(&mut self, target: usize, extend: bool) {
        let target = target.min(self.len_chars());
        self.selection = if extend {
            Selection::new(self.selection.anchor, target)
        } else {
            Selection::caret(target)
        };
        self.remember_col();
    }

    fn remember_col(&mut self) {
        self.col_memory = self.cursor_position().1;
    }

    fn move_left(&mut self, extend: bool) {
        if !extend && !self.selection.is_empty() {
            self.place_head(self.selection.start(), false);
            return;
        }
        let target = self.selection.head.saturating_sub(1);
        self.place_head(target, extend);
    }

    fn move_right(&mut self, extend: bool) {
        if !extend && !self.selection.is_empty() {
            self.place_head(self.selection.end(), false);
            return;
        }
        self.place_head(self.selection.head + 1, extend);
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        let (line, _) = self.cursor_position();
        let Some(target_line) = line.checked_add_signed(delta) else {
            return;
        };
        if target_line >= self.line_count() {
            return;
        }
        let col = self.col_memory.min(self.line_len(target_line));
        let target = self.rope.line_to_char(target_line) + col;
        let memory = self.col_memory;
        self.place_head(target, extend);
        self.col_memory = memory;
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caret_at(text: &str, pos: usize) -> TextBuffer {
        let mut buf = TextBuffer::from_text(text);
        buf.set_selection(Selection::caret(pos));
        buf
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = TextBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = TextBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = TextBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buf = TextBuffer::from_text("a\rb");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_line_len_counts_chars() {
        let buf = TextBuffer::from_text("héllo\nhi");
        assert_eq!(buf.line_len(0), 5);
        assert_eq!(buf.line_len(1), 2);
        assert_eq!(buf.line_len(9), 0);
    }

    #[test]
    fn test_line_start_offsets() {
        let buf = TextBuffer::from_text("ab\ncde\n");
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_start(1), 3);
        assert_eq!(buf.line_start(2), 7);
        assert_eq!(buf.line_start(8), 7);
    }

    #[test]
    fn test_caret_starts_at_end() {
        let buf = TextBuffer::from_text("hello\nworld");
        assert_eq!(buf.selection(), Selection::caret(11));
        assert_eq!(buf.cursor_position(), (1, 5));
    }

    // --- Selection ---

    #[test]
    fn test_set_selection_clamps() {
        let mut buf = TextBuffer::from_text("abc");
        buf.set_selection(Selection::new(1, 99));
        assert_eq!(buf.selection(), Selection::new(1, 3));
        assert_eq!(buf.selected_text(), "bc");
    }

    #[test]
    fn test_selection_start_end_are_ordered() {
        let sel = Selection::new(7, 2);
        assert_eq!(sel.start(), 2);
        assert_eq!(sel.end(), 7);
        assert!(!sel.is_empty());
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = caret_at("hllo", 1);
        buf.insert_char('e');
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.set_selection(Selection::new(0, 5));
        buf.insert_str("bye");
        assert_eq!(buf.text(), "bye world");
        assert_eq!(buf.selection(), Selection::caret(3));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = caret_at("ab", 1);
        buf.insert_char('é');
        assert_eq!(buf.text(), "aéb");
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    #[test]
    fn test_split_line() {
        let mut buf = caret_at("hello", 2);
        buf.split_line();
        assert_eq!(buf.text(), "he\nllo");
        assert_eq!(buf.cursor_position(), (1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = caret_at("hello", 0);
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = caret_at("ab\ncd", 3);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    #[test]
    fn test_delete_back_removes_selection() {
        let mut buf = TextBuffer::from_text("hello");
        buf.set_selection(Selection::new(1, 4));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ho");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = TextBuffer::from_text("hi");
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_removes_char() {
        let mut buf = caret_at("hello", 0);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ello");
        assert_eq!(buf.selection(), Selection::caret(0));
    }

    // --- Cursor movement: left/right ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = caret_at("ab\ncd", 3);
        buf.move_cursor(Direction::Left, false);
        assert_eq!(buf.cursor_position(), (0, 2));
    }

    #[test]
    fn test_move_left_collapses_selection_to_start() {
        let mut buf = TextBuffer::from_text("hello");
        buf.set_selection(Selection::new(1, 4));
        buf.move_cursor(Direction::Left, false);
        assert_eq!(buf.selection(), Selection::caret(1));
    }

    #[test]
    fn test_shift_right_extends_selection() {
        let mut buf = caret_at("hello", 1);
        buf.move_cursor(Direction::Right, true);
        buf.move_cursor(Direction::Right, true);
        assert_eq!(buf.selection(), Selection::new(1, 3));
        assert_eq!(buf.selected_text(), "el");
    }

    #[test]
    fn test_move_right_at_end_is_noop() {
        let mut buf = TextBuffer::from_text("hi");
        buf.move_cursor(Direction::Right, false);
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    // --- Cursor movement: up/down ---

    #[test]
    fn test_move_up_at_first_line_is_noop() {
        let mut buf = caret_at("hello\nworld", 2);
        buf.move_cursor(Direction::Up, false);
        assert_eq!(buf.cursor_position(), (0, 2));
    }

    #[test]
    fn test_move_down_clamps_to_shorter_line() {
        let mut buf = caret_at("hello\nhi", 4);
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor_position(), (1, 2));
    }

    // --- Column memory (sticky column) ---

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = caret_at("hello\nhi\nworld", 4);
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor_position(), (1, 2));
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor_position(), (2, 4));
    }

    // --- Home / End ---

    #[test]
    fn test_home_and_end() {
        let mut buf = caret_at("one\ntwo three", 6);
        buf.move_home(false);
        assert_eq!(buf.cursor_position(), (1, 0));
        buf.move_end(true);
        assert_eq!(buf.selected_text(), "two three");
    }

    // --- Word movement ---

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = caret_at("hello world", 8);
        buf.move_word_left(false);
        assert_eq!(buf.selection(), Selection::caret(6));
    }

    #[test]
    fn test_move_word_left_skips_space_before_word() {
        let mut buf = caret_at("hello world", 6);
        buf.move_word_left(false);
        assert_eq!(buf.selection(), Selection::caret(0));
    }

    #[test]
    fn test_move_word_left_at_start_of_line_wraps() {
        let mut buf = caret_at("ab\ncd", 3);
        buf.move_word_left(false);
        assert_eq!(buf.cursor_position(), (0, 2));
    }

    #[test]
    fn test_move_word_right_from_start() {
        let mut buf = caret_at("hello world", 0);
        buf.move_word_right(false);
        assert_eq!(buf.selection(), Selection::caret(6));
    }

    #[test]
    fn test_move_word_right_at_end_of_line_wraps() {
        let mut buf = caret_at("ab\ncd", 2);
        buf.move_word_right(false);
        assert_eq!(buf.cursor_position(), (1, 0));
    }

    // --- Whole buffer ---

    #[test]
    fn test_select_all_and_buffer_ends() {
        let mut buf = caret_at("ab\ncd", 1);
        buf.select_all();
        assert_eq!(buf.selected_text(), "ab\ncd");
        buf.move_to_start(false);
        assert_eq!(buf.selection(), Selection::caret(0));
        buf.move_to_end(true);
        assert_eq!(buf.selection(), Selection::new(0, 5));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        buf.move_to(9, 9);
        assert_eq!(buf.cursor_position(), (1, 2));
    }
}
