use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::{TaskId, TaskRecord};

/// Single-line text buffer with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    value: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end
    pub fn from_text(text: &str) -> Self {
        Self {
            value: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    /// Apply an editing key; returns whether the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => {
                    self.clear();
                    true
                }
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    true
                }
                KeyCode::Char('e') => {
                    self.cursor = self.len();
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(ch) if !ch.is_control() => self.insert(ch),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

/// What a key press inside an edit session asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    None,
    Save,
    Cancel,
    /// Focus is leaving the field
    Blur,
}

/// How an edit session is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTrigger {
    Save,
    Cancel,
    Blur,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Commit { task_id: TaskId, text: String },
    Discard { task_id: TaskId },
}

/// A row's text temporarily replaced by an editable buffer
#[derive(Debug, Clone)]
pub struct EditSession {
    task_id: TaskId,
    original: String,
    buffer: LineBuffer,
}

impl EditSession {
    pub fn begin(task: &TaskRecord) -> Self {
        Self {
            task_id: task.id,
            original: task.text.clone(),
            buffer: LineBuffer::from_text(&task.text),
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditAction {
        match key.code {
            KeyCode::Enter => EditAction::Save,
            KeyCode::Esc => EditAction::Cancel,
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => EditAction::Blur,
            _ => {
                self.buffer.handle_key(key);
                EditAction::None
            }
        }
    }

    /// Close the session. Consuming `self` makes the outcome happen once.
    ///
    /// Save and blur commit only text that is non-blank and differs from
    /// the original; everything else discards.
    pub fn resolve(self, trigger: EditTrigger) -> Resolution {
        let text = self.buffer.value().trim();
        let changed = !text.is_empty() && text != self.original;
        match trigger {
            EditTrigger::Save | EditTrigger::Blur if changed => Resolution::Commit {
                task_id: self.task_id,
                text: text.to_string(),
            },
            _ => Resolution::Discard {
                task_id: self.task_id,
            },
        }
    }
}
