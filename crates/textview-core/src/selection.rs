/// Selection range with an anchor for extension.
use crate::document::Document;

/// A half-open character range `[offset, offset + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Segment {
    pub offset: usize,
    pub length: usize,
}

impl Segment {
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Segment between two offsets in either order.
    pub fn from_bounds(a: usize, b: usize) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self::new(lo, hi - lo)
    }

    pub fn end_offset(&self) -> usize {
        self.offset + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.offset <= offset && offset < self.end_offset()
    }

    /// True when `other` lies entirely inside this segment.
    pub fn contains_segment(&self, other: Segment) -> bool {
        self.offset <= other.offset && other.end_offset() <= self.end_offset()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    range: Option<Segment>,
    anchor: Option<usize>,
}

impl Selection {
    pub fn range(&self) -> Option<Segment> {
        self.range
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_something_selected(&self) -> bool {
        self.range.is_some_and(|r| !r.is_empty())
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range.is_some_and(|r| r.contains(offset))
    }

    /// Selects `segment`, clamped to the document. The anchor moves to its start.
    pub fn set(&mut self, doc: &Document, segment: Segment) {
        let len = doc.len();
        let start = segment.offset.min(len);
        let end = segment.end_offset().min(len);
        self.range = Some(Segment::from_bounds(start, end));
        self.anchor = Some(start);
    }

    /// Starts a new, empty selection anchored at `offset`.
    pub fn start_at(&mut self, doc: &Document, offset: usize) {
        let offset = offset.min(doc.len());
        self.anchor = Some(offset);
        self.range = Some(Segment::new(offset, 0));
    }

    /// Extends from the anchor to `offset`. Without an anchor, `from`
    /// becomes the anchor.
    pub fn extend_to(&mut self, doc: &Document, from: usize, offset: usize) {
        let len = doc.len();
        let anchor = *self.anchor.get_or_insert(from.min(len));
        self.range = Some(Segment::from_bounds(anchor, offset.min(len)));
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.anchor = None;
    }

    pub fn selected_text(&self, doc: &Document) -> Option<String> {
        let r = self.range.filter(|r| !r.is_empty())?;
        Some(doc.text_at(r.offset, r.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_half_open() {
        let s = Segment::new(3, 4);
        assert!(s.contains(3));
        assert!(s.contains(6));
        assert!(!s.contains(7));
        assert_eq!(Segment::from_bounds(7, 3), s);
    }

    #[test]
    fn test_extend_from_anchor() {
        let doc = Document::from("hello world");
        let mut sel = Selection::default();
        sel.extend_to(&doc, 5, 2);
        assert_eq!(sel.range(), Some(Segment::new(2, 3)));
        sel.extend_to(&doc, 0, 99);
        assert_eq!(sel.range(), Some(Segment::new(5, 6)));
        assert_eq!(sel.selected_text(&doc).as_deref(), Some(" world"));
    }

    #[test]
    fn test_empty_selection_is_nothing() {
        let doc = Document::from("abc");
        let mut sel = Selection::default();
        assert!(!sel.is_something_selected());
        sel.start_at(&doc, 1);
        assert!(!sel.is_something_selected());
        assert!(sel.selected_text(&doc).is_none());
        sel.set(&doc, Segment::new(1, 10));
        assert_eq!(sel.range(), Some(Segment::new(1, 2)));
        sel.clear();
        assert_eq!(sel.range(), None);
    }
}
