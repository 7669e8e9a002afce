//! A single-line editable text field: the char/byte-index bookkeeping behind
//! every text input in the connect popup and the sidebar filter.

#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = char_len(&value);
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn into_value(self) -> String {
        self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = byte_index_for_char(&self.value, self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let end = byte_index_for_char(&self.value, self.cursor);
        let start = byte_index_for_char(&self.value, self.cursor - 1);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        let len = char_len(&self.value);
        if self.cursor >= len {
            return;
        }
        let start = byte_index_for_char(&self.value, self.cursor);
        let end = byte_index_for_char(&self.value, self.cursor + 1);
        self.value.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(char_len(&self.value));
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = char_len(&self.value);
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_index_for_char(text: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    let max = char_len(text);
    let clamped = char_index.min(max);
    if clamped == max {
        return text.len();
    }
    text.char_indices().nth(clamped).map_or(text.len(), |(byte_index, _)| byte_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_round_trip() {
        let mut field = TextField::new("");
        field.insert_char('h');
        field.insert_char('i');
        assert_eq!(field.value(), "hi");
        field.backspace();
        assert_eq!(field.value(), "h");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut field = TextField::new("café");
        field.move_home();
        field.move_right();
        field.move_right();
        field.move_right();
        field.move_right();
        field.backspace();
        assert_eq!(field.value(), "caf");
    }

    #[test]
    fn delete_removes_character_at_cursor() {
        let mut field = TextField::new("abc");
        field.move_home();
        field.delete();
        assert_eq!(field.value(), "bc");
        assert_eq!(field.cursor(), 0);
    }
}
