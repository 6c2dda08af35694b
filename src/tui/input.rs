//! Input field handling for the terminal user interface.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

/// A single-line text input with a cursor. The cursor counts characters,
/// not bytes, so multi-byte input edits correctly.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let idx = self.byte_index(self.cursor - 1);
            self.value.remove(idx);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Spans for display; when `active`, the character under the cursor is reversed.
    pub fn spans(&self, active: bool) -> Vec<Span<'static>> {
        if !active {
            return vec![Span::raw(self.value.clone())];
        }
        let at = self.byte_index(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut chars = rest.chars();
        let under = chars.next().map_or_else(|| " ".to_string(), |c| c.to_string());
        vec![
            Span::raw(before.to_string()),
            Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(chars.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_in_the_middle() {
        let mut field = InputField::with_value("helo");
        field.move_cursor_left();
        field.handle_char('l');
        assert_eq!(field.value, "hello");
        field.move_home();
        field.handle_delete();
        assert_eq!(field.value, "ello");
        field.move_end();
        field.handle_backspace();
        assert_eq!(field.value, "ell");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut field = InputField::new();
        for c in "café".chars() {
            field.handle_char(c);
        }
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        field.handle_char('é');
        field.move_cursor_left();
        field.handle_char('x');
        assert_eq!(field.value, "cafxé");
    }
}
