//! The syntax chunker: styled, gap-free chunks for a range of a line.

use textview_config::ColorStyle;
use textview_core::{Document, LineSegment};

use crate::chunk::{Chunk, ChunkStyle};

/// Source of styled chunks for a line.
///
/// Implementations may return chunks that overlap, leave gaps, or reach
/// outside the requested range; [`SyntaxChunker`] repairs all of that.
pub trait HighlightProvider {
    fn chunks(
        &mut self,
        doc: &Document,
        line: &LineSegment,
        offset: usize,
        length: usize,
        style: &ColorStyle,
    ) -> Vec<Chunk>;

    /// Selects the named highlighting theme. Returns false if unknown.
    fn set_theme(&mut self, _name: &str) -> bool {
        false
    }

    /// Forgets any state derived from `line` and the lines after it.
    fn invalidate_from(&mut self, _line: usize) {}
}

/// Produces the chunks the margin draws, falling back to a single
/// default-styled chunk when highlighting is off or unavailable.
pub struct SyntaxChunker {
    provider: Option<Box<dyn HighlightProvider>>,
    enabled: bool,
}

impl Default for SyntaxChunker {
    fn default() -> Self {
        Self {
            provider: None,
            enabled: true,
        }
    }
}

impl SyntaxChunker {
    pub fn new(provider: Box<dyn HighlightProvider>) -> Self {
        Self {
            provider: Some(provider),
            enabled: true,
        }
    }

    pub fn set_provider(&mut self, provider: Option<Box<dyn HighlightProvider>>) {
        self.provider = provider;
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_theme(&mut self, name: &str) -> bool {
        self.provider.as_mut().is_some_and(|p| p.set_theme(name))
    }

    pub fn invalidate_from(&mut self, line: usize) {
        if let Some(provider) = self.provider.as_mut() {
            provider.invalidate_from(line);
        }
    }

    /// Chunks covering exactly `[offset, offset + length)`, ordered and
    /// non-overlapping.
    pub fn chunks(
        &mut self,
        doc: &Document,
        line: &LineSegment,
        offset: usize,
        length: usize,
        style: &ColorStyle,
    ) -> Vec<Chunk> {
        if length == 0 {
            return Vec::new();
        }
        let default = ChunkStyle::plain(style.text);
        let enabled = self.enabled;
        match self.provider.as_mut().filter(|_| enabled) {
            Some(provider) => {
                let raw = provider.chunks(doc, line, offset, length, style);
                normalize_chunks(raw, offset, length, default)
            }
            None => vec![Chunk::new(offset, length, default)],
        }
    }
}

/// Clamps, de-overlaps and gap-fills `raw` so it covers `[offset, offset + length)`.
pub fn normalize_chunks(
    mut raw: Vec<Chunk>,
    offset: usize,
    length: usize,
    default: ChunkStyle,
) -> Vec<Chunk> {
    let end = offset + length;
    raw.sort_by_key(|c| c.offset);

    let mut out = Vec::with_capacity(raw.len() + 1);
    let mut cursor = offset;
    for chunk in raw {
        let start = chunk.offset.max(cursor);
        let stop = chunk.end_offset().min(end);
        if start >= stop {
            continue;
        }
        if start > cursor {
            out.push(Chunk::new(cursor, start - cursor, default));
        }
        out.push(Chunk::new(start, stop - start, chunk.style));
        cursor = stop;
    }
    if cursor < end {
        out.push(Chunk::new(cursor, end - cursor, default));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use textview_config::HexColor;

    const RED: ChunkStyle = ChunkStyle::plain(HexColor::rgb(255, 0, 0));
    const DEF: ChunkStyle = ChunkStyle::plain(HexColor::rgb(1, 1, 1));

    fn spans(chunks: &[Chunk]) -> Vec<(usize, usize)> {
        chunks.iter().map(|c| (c.offset, c.end_offset())).collect()
    }

    #[test]
    fn test_normalize_fills_gaps_and_clamps() {
        let raw = vec![Chunk::new(12, 3, RED), Chunk::new(5, 4, RED)];
        let out = normalize_chunks(raw, 6, 10, DEF);
        assert_eq!(spans(&out), vec![(6, 9), (9, 12), (12, 15), (15, 16)]);
        assert_eq!(out[1].style, DEF);
        assert_eq!(out[2].style, RED);
    }

    #[test]
    fn test_normalize_drops_overlaps() {
        let raw = vec![Chunk::new(0, 5, RED), Chunk::new(3, 4, DEF), Chunk::new(4, 1, RED)];
        let out = normalize_chunks(raw, 0, 8, DEF);
        assert_eq!(spans(&out), vec![(0, 5), (5, 7), (7, 8)]);
    }

    #[test]
    fn test_normalize_empty_provider_output() {
        let out = normalize_chunks(Vec::new(), 3, 4, DEF);
        assert_eq!(out, vec![Chunk::new(3, 4, DEF)]);
    }

    struct Broken;

    impl HighlightProvider for Broken {
        fn chunks(&mut self, _: &Document, _: &LineSegment, _: usize, _: usize, _: &ColorStyle) -> Vec<Chunk> {
            vec![Chunk::new(100, 5, RED)]
        }
    }

    #[test]
    fn test_chunker_without_provider_is_single_chunk() {
        let doc = Document::from("hello world");
        let line = doc.get_line(0).unwrap();
        let style = ColorStyle::default();
        let mut chunker = SyntaxChunker::default();
        let out = chunker.chunks(&doc, &line, 2, 5, &style);
        assert_eq!(out, vec![Chunk::new(2, 5, ChunkStyle::plain(style.text))]);
        assert!(chunker.chunks(&doc, &line, 2, 0, &style).is_empty());
    }

    #[test]
    fn test_chunker_repairs_provider_and_honors_disable() {
        let doc = Document::from("hello world");
        let line = doc.get_line(0).unwrap();
        let style = ColorStyle::default();
        let mut chunker = SyntaxChunker::new(Box::new(Broken));
        assert_eq!(spans(&chunker.chunks(&doc, &line, 0, 11, &style)), vec![(0, 11)]);
        chunker.set_enabled(false);
        assert_eq!(chunker.chunks(&doc, &line, 0, 11, &style).len(), 1);
        assert!(!chunker.set_theme("anything"));
    }
}
