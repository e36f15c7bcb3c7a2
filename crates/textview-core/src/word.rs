/// Word boundaries for double-click selection.
use crate::document::Document;
use crate::selection::Segment;

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans from `offset` over whitespace, then over word characters, in one
/// direction without leaving the line. Returns an exclusive end when
/// scanning forward and an inclusive start when scanning backward.
pub fn scan_word(doc: &Document, offset: usize, forward: bool) -> usize {
    let line = doc.get_line_by_offset(offset);
    let lo = line.offset as isize;
    let hi = line.editable_end_offset() as isize;
    let step: isize = if forward { 1 } else { -1 };
    let char_at = |pos: isize| doc.char_at(pos as usize);

    let mut pos = offset as isize;
    while pos >= lo && pos < hi && char_at(pos).is_some_and(char::is_whitespace) {
        pos += step;
    }
    while pos >= lo && pos < hi && char_at(pos).is_some_and(is_word_char) {
        pos += step;
    }
    let result = if forward { pos } else { pos + 1 };
    result.max(0) as usize
}

/// The word range under `offset`. On a character that is neither
/// whitespace nor part of a word, the range is that single character.
/// An offset at the end of a line resolves to the last character; an empty
/// line gives an empty range. The terminator is never part of the range.
pub fn word_at(doc: &Document, offset: usize) -> Segment {
    let line = doc.get_line_by_offset(offset);
    let editable_end = line.editable_end_offset();
    if editable_end == line.offset {
        return Segment::new(line.offset, 0);
    }
    let offset = offset.clamp(line.offset, editable_end - 1);
    let start = scan_word(doc, offset, false);
    let end = scan_word(doc, offset, true);
    Segment::new(start.min(end), end.saturating_sub(start))
}
