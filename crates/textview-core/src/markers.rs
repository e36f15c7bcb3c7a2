/// Per-line text markers (squiggles, underlines, background tints).
use std::collections::BTreeMap;
use std::ops::Range;

use textview_config::HexColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Underline,
    Squiggle,
    Strikethrough,
    Background,
}

/// A decoration over a column range of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMarker {
    pub kind: MarkerKind,
    pub color: HexColor,
    pub start_column: usize,
    /// Exclusive end column; `None` runs to the end of the line.
    pub end_column: Option<usize>,
}

impl TextMarker {
    /// A marker covering the whole line.
    pub fn new(kind: MarkerKind, color: HexColor) -> Self {
        Self {
            kind,
            color,
            start_column: 0,
            end_column: None,
        }
    }

    pub fn with_columns(mut self, start: usize, end: usize) -> Self {
        self.start_column = start;
        self.end_column = Some(end.max(start));
        self
    }

    /// Background markers paint beneath the text, the rest above it.
    pub fn is_background(&self) -> bool {
        self.kind == MarkerKind::Background
    }

    /// The part of the drawn run `run` (document offsets) this marker covers
    /// on a line starting at `line_offset` with `editable_length` chars.
    pub fn clip(
        &self,
        line_offset: usize,
        editable_length: usize,
        run: Range<usize>,
    ) -> Option<Range<usize>> {
        let end_col = self.end_column.unwrap_or(editable_length).min(editable_length);
        let start = (line_offset + self.start_column).max(run.start);
        let end = (line_offset + end_col).min(run.end);
        (start < end).then_some(start..end)
    }
}

/// Markers keyed by line, in insertion order per line.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    lines: BTreeMap<usize, Vec<TextMarker>>,
}

impl MarkerStore {
    pub fn add(&mut self, line: usize, marker: TextMarker) {
        self.lines.entry(line).or_default().push(marker);
    }

    pub fn get(&self, line: usize) -> &[TextMarker] {
        self.lines.get(&line).map_or(&[], Vec::as_slice)
    }

    pub fn clear_line(&mut self, line: usize) -> usize {
        self.lines.remove(&line).map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Re-keys markers when lines are inserted or removed at `line`.
    /// Markers on removed lines are dropped.
    pub fn adjust_for_edit(&mut self, line: usize, lines_added: isize) {
        if lines_added == 0 {
            return;
        }
        let old = std::mem::take(&mut self.lines);
        for (marker_line, markers) in old {
            if marker_line < line {
                self.lines.insert(marker_line, markers);
            } else if lines_added > 0 {
                self.lines.insert(marker_line + lines_added as usize, markers);
            } else {
                let removed = lines_added.unsigned_abs();
                if marker_line >= line + removed {
                    self.lines.insert(marker_line - removed, markers);
                }
            }
        }
    }
}
