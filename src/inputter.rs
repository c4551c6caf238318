use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Single line text input used by the form fields.
#[derive(Default, Debug, Clone)]
pub struct Inputter {
    current_input: String,
    curser_pos: usize, // In chars, not bytes
}

impl Inputter {
    pub fn with_value(s: &str) -> Self {
        let mut input = Self::default();
        input.set(s);
        input
    }

    /// Applies a key to the input. Returns false if the key was not consumed.
    pub fn read(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, KeyModifiers::NONE) => self.left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.right(),
            (KeyCode::Home, _) => self.curser_pos = 0,
            (KeyCode::End, _) => self.curser_pos = self.char_len(),
            (KeyCode::Char(chr), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(chr),
            _ => {
                trace!("Input ignored key {key:?}");
                return false;
            }
        }
        true
    }

    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.curser_pos = self.char_len();
    }

    pub fn value(&self) -> &str {
        &self.current_input
    }

    pub fn curser_pos(&self) -> usize {
        self.curser_pos
    }

    fn char_len(&self) -> usize {
        self.current_input.chars().count()
    }

    fn insert(&mut self, chr: char) {
        let pos = self.getbytepos(self.curser_pos);
        self.current_input.insert(pos, chr);
        self.curser_pos += 1;
    }

    fn backspace(&mut self) {
        if self.curser_pos > 0 {
            let pos = self.getbytepos(self.curser_pos - 1);
            self.current_input.remove(pos);
            self.curser_pos -= 1;
        }
    }

    fn delete(&mut self) {
        if self.curser_pos < self.char_len() {
            let pos = self.getbytepos(self.curser_pos);
            self.current_input.remove(pos);
        }
    }

    fn left(&mut self) {
        self.curser_pos = self.curser_pos.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.curser_pos < self.char_len() {
            self.curser_pos += 1;
        }
    }

    fn getbytepos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
