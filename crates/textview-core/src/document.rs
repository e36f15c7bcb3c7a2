//! The document model: text, line segments, folds and markers.
//!
//! Offsets are character offsets into the text. Line lookups go through the
//! rope and are O(log n).

use anyhow::{Context, Result};

use crate::buffer::TextBuffer;
use crate::events::{ListenerId, Listeners};
use crate::folding::{self, FoldId, FoldSegment, FoldingStore};
use crate::location::DocumentLocation;
use crate::markers::{MarkerStore, TextMarker};

/// One line of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    /// 0-indexed line number.
    pub number: usize,
    /// Offset of the first character.
    pub offset: usize,
    /// Length including the terminator.
    pub length: usize,
    /// Length excluding the terminator.
    pub editable_length: usize,
}

impl LineSegment {
    pub fn end_offset(&self) -> usize {
        self.offset + self.length
    }

    /// Offset just past the last editable character (where the terminator starts).
    pub fn editable_end_offset(&self) -> usize {
        self.offset + self.editable_length
    }

    pub fn delimiter_length(&self) -> usize {
        self.length - self.editable_length
    }
}

/// Notification sent to document subscribers after every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub offset: usize,
    pub removed: usize,
    pub inserted: usize,
    /// Line containing `offset` before the edit.
    pub first_line: usize,
    /// Change in line count caused by the edit.
    pub lines_delta: isize,
    pub version: u64,
}

#[derive(Debug, Default)]
pub struct Document {
    buffer: TextBuffer,
    foldings: FoldingStore,
    markers: MarkerStore,
    version: u64,
    listeners: Listeners<DocumentChange>,
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from(text),
            ..Default::default()
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Incremented on every edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    /// Text of `[offset, offset + len)`, clamped to the document.
    pub fn text_at(&self, offset: usize, len: usize) -> String {
        self.buffer.text_range(offset, offset.saturating_add(len))
    }

    /// Editable text of a line, without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        let seg = self.get_line(line)?;
        Some(self.text_at(seg.offset, seg.editable_length))
    }

    pub fn get_line(&self, line: usize) -> Option<LineSegment> {
        let length = self.buffer.line_len_with_terminator(line)?;
        let terminator = self.buffer.terminator_len(line)?;
        Some(LineSegment {
            number: line,
            offset: self.buffer.line_start(line),
            length,
            editable_length: length - terminator,
        })
    }

    /// Line containing `offset`. Offsets past the end resolve to the last line.
    pub fn get_line_by_offset(&self, offset: usize) -> LineSegment {
        let line = self.offset_to_line_number(offset);
        self.get_line(line).unwrap_or(LineSegment {
            number: line,
            offset: self.len(),
            length: 0,
            editable_length: 0,
        })
    }

    pub fn offset_to_line_number(&self, offset: usize) -> usize {
        self.buffer.line_of(offset)
    }

    /// Location of `offset`, clamped to the document end.
    pub fn offset_to_location(&self, offset: usize) -> DocumentLocation {
        let offset = offset.min(self.len());
        let line = self.get_line_by_offset(offset);
        DocumentLocation::new(line.number, offset - line.offset)
    }

    /// Offset of `location`, or `None` when the line does not exist or the
    /// column is past the line's editable length.
    pub fn location_to_offset(&self, location: DocumentLocation) -> Option<usize> {
        let line = self.get_line(location.line)?;
        (location.column <= line.editable_length).then_some(line.offset + location.column)
    }

    /// Clamps a location to an existing line and its editable length.
    pub fn clamp_location(&self, location: DocumentLocation) -> DocumentLocation {
        let line_nr = location.line.min(self.line_count().saturating_sub(1));
        let editable = self.get_line(line_nr).map_or(0, |l| l.editable_length);
        DocumentLocation::new(line_nr, location.column.min(editable))
    }

    /// Inserts `text` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is past the end of the document.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        let lines_before = self.line_count();
        let first_line = self.offset_to_line_number(offset);
        self.buffer.insert(offset, text)?;
        let inserted = text.chars().count();
        let lines_delta = self.line_count() as isize - lines_before as isize;

        self.foldings.adjust_for_insert(offset, inserted);
        self.markers.adjust_for_edit(first_line + 1, lines_delta);
        self.commit(DocumentChange {
            offset,
            removed: 0,
            inserted,
            first_line,
            lines_delta,
            version: 0,
        });
        Ok(())
    }

    /// Removes `len` characters starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range extends past the end of the document.
    pub fn remove(&mut self, offset: usize, len: usize) -> Result<()> {
        let lines_before = self.line_count();
        let first_line = self.offset_to_line_number(offset);
        self.buffer.remove(offset, offset + len)?;
        let lines_delta = self.line_count() as isize - lines_before as isize;

        self.foldings.adjust_for_remove(offset, len);
        self.markers.adjust_for_edit(first_line + 1, lines_delta);
        self.commit(DocumentChange {
            offset,
            removed: len,
            inserted: 0,
            first_line,
            lines_delta,
            version: 0,
        });
        Ok(())
    }

    /// Replaces `[offset, offset + len)` with `text`.
    pub fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<()> {
        if len > 0 {
            self.remove(offset, len)?;
        }
        if !text.is_empty() {
            self.insert(offset, text)?;
        }
        Ok(())
    }

    fn commit(&mut self, mut change: DocumentChange) {
        self.version = self.version.wrapping_add(1);
        change.version = self.version;
        tracing::trace!(
            offset = change.offset,
            removed = change.removed,
            inserted = change.inserted,
            "document changed"
        );
        self.listeners.emit(&change);
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&DocumentChange) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ── Folding ─────────────────────────────────────────────────────

    /// Adds a fold from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if either location is outside the document or
    /// `end` precedes `start`.
    pub fn add_folding(
        &mut self,
        start: DocumentLocation,
        end: DocumentLocation,
        description: impl Into<String>,
        is_folded: bool,
    ) -> Result<FoldId> {
        let offset = self
            .location_to_offset(start)
            .with_context(|| format!("fold start {start} is outside the document"))?;
        let end_offset = self
            .location_to_offset(end)
            .with_context(|| format!("fold end {end} is outside the document"))?;
        if end_offset < offset {
            anyhow::bail!("fold end {end} precedes fold start {start}");
        }
        Ok(self.foldings.add(offset, end_offset, description, is_folded))
    }

    pub fn remove_folding(&mut self, id: FoldId) -> bool {
        self.foldings.remove(id).is_some()
    }

    pub fn set_folded(&mut self, id: FoldId, folded: bool) -> bool {
        match self.foldings.get_mut(id) {
            Some(seg) => {
                seg.is_folded = folded;
                true
            }
            None => false,
        }
    }

    /// Flips the folded state. Returns the new state.
    pub fn toggle_folding(&mut self, id: FoldId) -> Option<bool> {
        let seg = self.foldings.get_mut(id)?;
        seg.is_folded = !seg.is_folded;
        Some(seg.is_folded)
    }

    pub fn folding(&self, id: FoldId) -> Option<&FoldSegment> {
        self.foldings.get(id)
    }

    pub fn foldings(&self) -> &[FoldSegment] {
        self.foldings.segments()
    }

    /// Foldings whose start lies on `line`, ordered by start offset.
    pub fn get_start_foldings(&self, line: usize) -> Vec<FoldSegment> {
        let Some(seg) = self.get_line(line) else {
            return Vec::new();
        };
        // The last line has no terminator; a fold may start at the very end
        let end = if seg.number + 1 == self.line_count() {
            seg.end_offset() + 1
        } else {
            seg.end_offset()
        };
        self.foldings.starting_in(seg.offset..end).to_vec()
    }

    pub fn fold_start_location(&self, fold: &FoldSegment) -> DocumentLocation {
        self.offset_to_location(fold.offset)
    }

    pub fn fold_end_location(&self, fold: &FoldSegment) -> DocumentLocation {
        self.offset_to_location(fold.end_offset)
    }

    fn hidden_lines(&self) -> Vec<(usize, usize)> {
        self.foldings
            .hidden_line_ranges(|offset| self.offset_to_line_number(offset))
    }

    /// Logical line drawn on visible row `row`. May exceed the line count.
    pub fn visual_to_logical_line(&self, row: usize) -> usize {
        folding::visual_to_logical(&self.hidden_lines(), row)
    }

    /// Visible row showing `line`; hidden lines map to their fold's row.
    pub fn logical_to_visual_line(&self, line: usize) -> usize {
        folding::logical_to_visual(&self.hidden_lines(), line)
    }

    /// Number of rows left visible after folding.
    pub fn visible_line_count(&self) -> usize {
        let hidden: usize = self.hidden_lines().iter().map(|&(a, b)| b - a + 1).sum();
        self.line_count() - hidden
    }

    // ── Markers ─────────────────────────────────────────────────────

    /// Attaches a marker to `line`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist.
    pub fn add_marker(&mut self, line: usize, marker: TextMarker) -> Result<()> {
        if line >= self.line_count() {
            anyhow::bail!(
                "line index {} out of bounds (document has {} lines)",
                line,
                self.line_count()
            );
        }
        self.markers.add(line, marker);
        Ok(())
    }

    pub fn line_markers(&self, line: usize) -> &[TextMarker] {
        self.markers.get(line)
    }

    pub fn clear_markers(&mut self, line: usize) -> usize {
        self.markers.clear_line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::MarkerKind;
    use std::cell::RefCell;
    use std::rc::Rc;
    use textview_config::HexColor;

    fn sample() -> Document {
        Document::from("ab\r\ncde\n\nfg")
    }

    #[test]
    fn test_line_segments_are_contiguous() {
        let doc = sample();
        assert_eq!(doc.line_count(), 4);
        let mut expected_offset = 0;
        for n in 0..doc.line_count() {
            let seg = doc.get_line(n).unwrap();
            assert_eq!(seg.offset, expected_offset);
            assert!(seg.editable_length <= seg.length);
            expected_offset = seg.end_offset();
        }
        assert_eq!(expected_offset, doc.len());
        assert_eq!(doc.get_line(0).unwrap().delimiter_length(), 2);
        assert_eq!(doc.get_line(3).unwrap().delimiter_length(), 0);
        assert!(doc.get_line(4).is_none());
    }

    #[test]
    fn test_get_line_by_offset_past_end_is_last_line() {
        let doc = sample();
        assert_eq!(doc.get_line_by_offset(5).number, 1);
        assert_eq!(doc.get_line_by_offset(9999).number, 3);
        let empty = Document::new();
        assert_eq!(empty.get_line_by_offset(4).number, 0);
    }

    #[test]
    fn test_location_offset_round_trip() {
        let doc = sample();
        for o in 0..=doc.len() {
            let loc = doc.offset_to_location(o);
            // Offsets inside a CRLF terminator have no location of their own
            if let Some(back) = doc.location_to_offset(loc) {
                assert_eq!(back, o, "offset {o} via {loc}");
            }
        }
        assert_eq!(doc.location_to_offset(DocumentLocation::new(1, 2)), Some(6));
        assert_eq!(doc.location_to_offset(DocumentLocation::new(1, 3)), Some(7));
        assert_eq!(doc.location_to_offset(DocumentLocation::new(1, 4)), None);
        assert_eq!(doc.location_to_offset(DocumentLocation::new(9, 0)), None);
    }

    #[test]
    fn test_clamp_location() {
        let doc = sample();
        assert_eq!(
            doc.clamp_location(DocumentLocation::new(1, 50)),
            DocumentLocation::new(1, 3)
        );
        assert_eq!(
            doc.clamp_location(DocumentLocation::new(50, 50)),
            DocumentLocation::new(3, 2)
        );
    }

    #[test]
    fn test_edits_bump_version_and_notify() {
        let mut doc = Document::from("hello");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = doc.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        doc.insert(5, "\nworld").unwrap();
        doc.remove(0, 1).unwrap();
        assert_eq!(doc.text(), "ello\nworld");
        assert_eq!(doc.version(), 2);

        let seen_now = seen.borrow().clone();
        assert_eq!(seen_now.len(), 2);
        assert_eq!(seen_now[0].lines_delta, 1);
        assert_eq!(seen_now[0].inserted, 6);
        assert_eq!(seen_now[1].removed, 1);
        assert_eq!(seen_now[1].version, 2);

        assert!(doc.unsubscribe(id));
        doc.insert(0, "h").unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert!(doc.insert(99, "x").is_err());
    }

    #[test]
    fn test_add_folding_validates_locations() {
        let mut doc = Document::from("one\ntwo\nthree");
        assert!(doc
            .add_folding(DocumentLocation::new(2, 0), DocumentLocation::new(0, 1), "", true)
            .is_err());
        assert!(doc
            .add_folding(DocumentLocation::new(0, 0), DocumentLocation::new(7, 0), "", true)
            .is_err());
        let id = doc
            .add_folding(DocumentLocation::new(0, 3), DocumentLocation::new(2, 2), "...", true)
            .unwrap();
        assert_eq!(doc.get_start_foldings(0).len(), 1);
        assert!(doc.get_start_foldings(1).is_empty());
        assert_eq!(doc.fold_end_location(doc.folding(id).unwrap()), DocumentLocation::new(2, 2));
        assert_eq!(doc.toggle_folding(id), Some(false));
    }

    #[test]
    fn test_folded_rows() {
        let mut doc = Document::from("0\n1\n2\n3\n4\n5\n6");
        doc.add_folding(DocumentLocation::new(1, 0), DocumentLocation::new(3, 1), "", true)
            .unwrap();
        assert_eq!(doc.visible_line_count(), 5);
        assert_eq!(doc.visual_to_logical_line(1), 1);
        assert_eq!(doc.visual_to_logical_line(2), 4);
        assert_eq!(doc.logical_to_visual_line(3), 1);
        assert_eq!(doc.logical_to_visual_line(6), 4);
    }

    #[test]
    fn test_fold_offsets_follow_edits() {
        let mut doc = Document::from("0\n1\n2\n3");
        let id = doc
            .add_folding(DocumentLocation::new(1, 0), DocumentLocation::new(2, 1), "", true)
            .unwrap();
        doc.insert(0, "xx\n").unwrap();
        let fold = doc.folding(id).unwrap();
        assert_eq!(doc.fold_start_location(fold), DocumentLocation::new(2, 0));
        assert_eq!(doc.fold_end_location(fold), DocumentLocation::new(3, 1));
    }

    #[test]
    fn test_markers_follow_line_edits() {
        let mut doc = Document::from("a\nb\nc");
        let marker = TextMarker::new(MarkerKind::Underline, HexColor::rgb(1, 1, 1));
        doc.add_marker(2, marker.clone()).unwrap();
        assert!(doc.add_marker(3, marker).is_err());

        doc.insert(0, "new\n").unwrap();
        assert_eq!(doc.line_markers(3).len(), 1);
        // Join lines 1..=2 into line 1
        doc.remove(4, 4).unwrap();
        assert_eq!(doc.text(), "new\nc");
        assert_eq!(doc.line_markers(1).len(), 1);
    }
}
