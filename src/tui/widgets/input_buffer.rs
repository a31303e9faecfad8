//! Text input buffer with cursor management, shared by grid cell editing and
//! the library form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A text input buffer with cursor positioning. Cursor is a byte offset that
/// always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    multiline: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            content: text.to_string(),
            cursor: text.len(),
            multiline: false,
        }
    }

    /// Enter inserts a newline instead of being left to the caller.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        let Some((prev, _)) = self.content[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.content.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(c) = self.content[self.cursor..].chars().next() else {
            return false;
        };
        self.content.drain(self.cursor..self.cursor + c.len_utf8());
        true
    }

    pub fn move_left(&mut self) {
        if let Some((prev, _)) = self.content[..self.cursor].char_indices().next_back() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Apply an editing key. Returns true if the text changed.
    ///
    /// Keys that are not editing keys (Esc, Tab, Enter on a single-line
    /// buffer, Ctrl chords) are ignored and left to the caller.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
                true
            }
            (_, KeyCode::Enter) if self.multiline => {
                self.insert_char('\n');
                true
            }
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (_, KeyCode::Left) => {
                self.move_left();
                false
            }
            (_, KeyCode::Right) => {
                self.move_right();
                false
            }
            (_, KeyCode::Home) => {
                self.move_home();
                false
            }
            (_, KeyCode::End) => {
                self.move_end();
                false
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Whitespace-only counts as empty.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Text before and after the cursor, for rendering a caret between them.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.cursor)
    }
}
