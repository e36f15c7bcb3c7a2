/// Rope-backed character storage for a document.
use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// Characters that end a line, as recognised by the rope.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Text storage with O(log n) line and offset lookups.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines. A trailing terminator opens a final empty line.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Start offset of a line. Out-of-range lines clamp to the last line.
    pub fn line_start(&self, line_idx: usize) -> usize {
        let last = self.rope.len_lines().saturating_sub(1);
        self.rope.line_to_char(line_idx.min(last))
    }

    /// Line containing `char_idx`. Offsets past the end resolve to the last line.
    pub fn line_of(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.rope.len_chars()))
    }

    /// Length of a line in characters, including its terminator.
    pub fn line_len_with_terminator(&self, line_idx: usize) -> Option<usize> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line(line_idx).len_chars())
    }

    /// Length of the terminator ending a line: 2 for `\r\n`, 1 for any
    /// other break, 0 for the last line.
    pub fn terminator_len(&self, line_idx: usize) -> Option<usize> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len == 0 || !is_line_break(line.char(len - 1)) {
            return Some(0);
        }
        if len > 1 && line.char(len - 1) == '\n' && line.char(len - 2) == '\r' {
            Some(2)
        } else {
            Some(1)
        }
    }

    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        (char_idx < self.rope.len_chars()).then(|| self.rope.char(char_idx))
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is past the end of the buffer.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "insert position {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the character range `[start..end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        if end > self.rope.len_chars() {
            anyhow::bail!(
                "range end {} out of bounds (buffer has {} chars)",
                end,
                self.rope.len_chars()
            );
        }
        self.rope.remove(start..end);
        Ok(())
    }

    /// Text of `[start..end)`, clamped to the buffer.
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }
}
