use crate::render::visible_width;

/// Single-line text input used to edit a block in place. The cursor is a
/// character index into `text`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinePrompt {
    text: String,
    cursor: usize,
}

impl LinePrompt {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display column of the cursor, counting wide characters twice.
    pub fn cursor_column(&self) -> usize {
        visible_width(&self.text[..self.byte_offset(self.cursor)])
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return false;
        }
        let idx = self.byte_offset(self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = self.byte_offset(self.cursor);
        self.text.remove(idx);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let idx = self.byte_offset(self.cursor);
        self.text.remove(idx);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(prompt: &mut LinePrompt, text: &str) {
        for ch in text.chars() {
            assert!(prompt.insert_char(ch), "failed to insert char {ch}");
        }
    }

    #[test]
    fn starts_with_cursor_at_end() {
        let prompt = LinePrompt::new("héllo");
        assert_eq!(prompt.cursor(), 5);
        assert_eq!(prompt.cursor_column(), 5);
    }

    #[test]
    fn inserts_at_cursor_on_char_boundaries() {
        let mut prompt = LinePrompt::new("añb");
        assert!(prompt.move_left());
        type_text(&mut prompt, "ü");
        assert_eq!(prompt.text(), "añüb");
        assert_eq!(prompt.cursor(), 3);
    }

    #[test]
    fn backspace_and_delete_respect_bounds() {
        let mut prompt = LinePrompt::new("ab");
        assert!(!prompt.delete());
        assert!(prompt.backspace());
        assert_eq!(prompt.text(), "a");

        prompt.move_to_start();
        assert!(!prompt.backspace());
        assert!(prompt.delete());
        assert_eq!(prompt.text(), "");
        assert!(!prompt.move_right());
    }

    #[test]
    fn line_breaks_are_rejected() {
        let mut prompt = LinePrompt::default();
        assert!(!prompt.insert_char('\n'));
        assert!(!prompt.insert_char('\r'));
        assert_eq!(prompt.text(), "");
    }

    #[test]
    fn cursor_column_counts_wide_characters() {
        let mut prompt = LinePrompt::new("漢字x");
        prompt.move_left();
        assert_eq!(prompt.cursor_column(), 4);
    }
}
