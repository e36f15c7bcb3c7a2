/// Editor options consumed by layout and rendering.
use serde::{Deserialize, Serialize};

/// Tab size, font metrics and display toggles for one text view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub tab_size: usize,
    /// Width of one fixed character cell in pixels.
    pub char_width: i32,
    /// Height of one line in pixels.
    pub line_height: i32,
    pub show_spaces: bool,
    pub show_tabs: bool,
    pub show_eol_markers: bool,
    pub show_ruler: bool,
    pub ruler_column: usize,
    pub show_invalid_lines: bool,
    pub enable_syntax_highlighting: bool,
    pub highlight_matching_bracket: bool,
    /// Full on/off period of the caret blink, in milliseconds.
    pub caret_blink_time_ms: u64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            char_width: 8,
            line_height: 16,
            show_spaces: false,
            show_tabs: false,
            show_eol_markers: false,
            show_ruler: true,
            ruler_column: 80,
            show_invalid_lines: true,
            enable_syntax_highlighting: true,
            highlight_matching_bracket: true,
            caret_blink_time_ms: 800,
        }
    }
}

impl EditorOptions {
    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.tab_size = self.tab_size.clamp(1, 16);
        self.char_width = self.char_width.clamp(1, 256);
        self.line_height = self.line_height.clamp(1, 512);
        self.ruler_column = self.ruler_column.clamp(1, 1000);
        self.caret_blink_time_ms = self.caret_blink_time_ms.clamp(100, 10_000);
    }
}
