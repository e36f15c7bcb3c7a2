//! Fixed-width layout: columns to pixels and back, with tab stops.
//!
//! Visual columns count character cells; a tab advances to the next
//! multiple of the tab size. Pixel X is `visual column * char width`.

use textview_config::EditorOptions;
use textview_core::{Document, DocumentLocation, LineSegment};

use crate::host::ScrollOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub tab_size: usize,
    pub char_width: i32,
    pub line_height: i32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::from_options(&EditorOptions::default())
    }
}

impl TextLayout {
    pub fn from_options(options: &EditorOptions) -> Self {
        Self {
            tab_size: options.tab_size.max(1),
            char_width: options.char_width.max(1),
            line_height: options.line_height.max(1),
        }
    }

    /// The next tab stop strictly after `visible_column`.
    pub fn next_tab_stop(&self, visible_column: usize) -> usize {
        (visible_column + self.tab_size) / self.tab_size * self.tab_size
    }

    /// Visual column after `c` and the pixel advance it takes.
    pub fn advance(&self, c: char, visible_column: usize) -> (usize, i32) {
        if c == '\t' {
            let next = self.next_tab_stop(visible_column);
            (next, (next - visible_column) as i32 * self.char_width)
        } else {
            (visible_column + 1, self.char_width)
        }
    }

    /// Left edge X of every column of the line, plus the end-of-line X.
    pub fn x_positions(&self, doc: &Document, line: &LineSegment) -> Vec<i32> {
        let mut positions = Vec::with_capacity(line.editable_length + 1);
        let mut x = 0;
        let mut visible = 0;
        let chars = doc.buffer().rope().chars_at(line.offset.min(doc.len()));
        for c in chars.take(line.editable_length) {
            positions.push(x);
            let (next, delta) = self.advance(c, visible);
            visible = next;
            x += delta;
        }
        positions.push(x);
        positions
    }

    /// X of `column` relative to the line start. Columns past the end of
    /// the line sit one cell after the end-of-line position.
    pub fn column_to_visual_x(&self, doc: &Document, line: &LineSegment, column: usize) -> i32 {
        let positions = self.x_positions(doc, line);
        let eol = positions.last().copied().unwrap_or(0);
        match positions.get(column) {
            Some(&x) => x,
            None => eol + self.char_width,
        }
    }

    /// Width in pixels of the line's editable text.
    pub fn line_width(&self, doc: &Document, line: &LineSegment) -> i32 {
        self.x_positions(doc, line).last().copied().unwrap_or(0)
    }

    /// Resolves a point in view coordinates (relative to the text origin)
    /// to a document location.
    ///
    /// The row goes through folding and is clamped to the last line. Within
    /// the line the nearer cell edge wins; a point exactly between two edges
    /// resolves to the lower column.
    pub fn visual_to_document_location(
        &self,
        doc: &Document,
        x: i32,
        y: i32,
        scroll: ScrollOffset,
    ) -> DocumentLocation {
        let row = (y + scroll.y).div_euclid(self.line_height).max(0) as usize;
        let last_line = doc.line_count().saturating_sub(1);
        let line_nr = doc.visual_to_logical_line(row).min(last_line);
        let Some(line) = doc.get_line(line_nr) else {
            return DocumentLocation::new(line_nr, 0);
        };

        let visual_x = x + scroll.x;
        let mut line_x = 0;
        let mut visible = 0;
        let mut column = 0;
        let chars = doc.buffer().rope().chars_at(line.offset);
        for c in chars.take(line.editable_length) {
            let (next, delta) = self.advance(c, visible);
            let next_x = line_x + delta;
            if next_x >= visual_x {
                if !is_near_left(visual_x, line_x, next_x) {
                    column += 1;
                }
                break;
            }
            visible = next;
            line_x = next_x;
            column += 1;
        }
        DocumentLocation::new(line_nr, column)
    }

    /// Y of the top of a visible row, relative to the view.
    pub fn row_to_y(&self, row: usize, scroll: ScrollOffset) -> i32 {
        row as i32 * self.line_height - scroll.y
    }
}

fn is_near_left(pos: i32, left: i32, right: i32) -> bool {
    (left - pos).abs() <= (right - pos).abs()
}
