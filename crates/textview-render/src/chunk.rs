//! Styled chunks and their split against the selection.

use textview_config::HexColor;

/// Foreground style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStyle {
    pub color: HexColor,
    pub bold: bool,
    pub italic: bool,
}

impl ChunkStyle {
    pub const fn plain(color: HexColor) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }

    /// Same weight and slant with another color.
    pub fn with_color(self, color: HexColor) -> Self {
        Self { color, ..self }
    }
}

/// A styled run `[offset, offset + length)` of document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub offset: usize,
    pub length: usize,
    pub style: ChunkStyle,
}

impl Chunk {
    pub const fn new(offset: usize, length: usize, style: ChunkStyle) -> Self {
        Self {
            offset,
            length,
            style,
        }
    }

    pub fn end_offset(&self) -> usize {
        self.offset + self.length
    }
}

/// One piece of a chunk after splitting against the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRun {
    pub offset: usize,
    pub end_offset: usize,
    pub selected: bool,
}

impl SplitRun {
    const fn new(offset: usize, end_offset: usize, selected: bool) -> Self {
        Self {
            offset,
            end_offset,
            selected,
        }
    }
}

/// Splits `[start, end)` against the half-open selection `[sel_start, sel_end)`.
///
/// Yields at most three runs, in offset order:
/// 1. inside the selection: one selected run
/// 2. starts inside, ends after: selected prefix, normal suffix
/// 3. starts before, ends inside: normal prefix, selected suffix
/// 4. selection strictly inside: normal, selected, normal
/// 5. no overlap or no selection: one normal run
pub fn split_by_selection(
    start: usize,
    end: usize,
    selection: Option<(usize, usize)>,
) -> Vec<SplitRun> {
    let Some((s, e)) = selection.filter(|(s, e)| s < e) else {
        return vec![SplitRun::new(start, end, false)];
    };

    if start >= s && end <= e {
        vec![SplitRun::new(start, end, true)]
    } else if start >= s && start < e && end > e {
        vec![SplitRun::new(start, e, true), SplitRun::new(e, end, false)]
    } else if start < s && end > s && end <= e {
        vec![SplitRun::new(start, s, false), SplitRun::new(s, end, true)]
    } else if start < s && end > e {
        vec![
            SplitRun::new(start, s, false),
            SplitRun::new(s, e, true),
            SplitRun::new(e, end, false),
        ]
    } else {
        vec![SplitRun::new(start, end, false)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(start: usize, end: usize, sel: Option<(usize, usize)>) -> Vec<(usize, usize, bool)> {
        split_by_selection(start, end, sel)
            .into_iter()
            .map(|r| (r.offset, r.end_offset, r.selected))
            .collect()
    }

    #[test]
    fn test_selection_interior_gives_three_runs() {
        assert_eq!(
            runs(0, 10, Some((3, 7))),
            vec![(0, 3, false), (3, 7, true), (7, 10, false)]
        );
    }

    #[test]
    fn test_chunk_inside_selection() {
        assert_eq!(runs(3, 7, Some((3, 7))), vec![(3, 7, true)]);
        assert_eq!(runs(4, 5, Some((0, 10))), vec![(4, 5, true)]);
    }

    #[test]
    fn test_starts_inside_ends_after() {
        assert_eq!(runs(5, 12, Some((2, 8))), vec![(5, 8, true), (8, 12, false)]);
    }

    #[test]
    fn test_starts_before_ends_inside() {
        assert_eq!(runs(0, 5, Some((3, 8))), vec![(0, 3, false), (3, 5, true)]);
    }

    #[test]
    fn test_half_open_boundaries_do_not_overlap() {
        // Chunk ends exactly where the selection starts
        assert_eq!(runs(0, 3, Some((3, 7))), vec![(0, 3, false)]);
        // Chunk starts exactly where the selection ends
        assert_eq!(runs(7, 9, Some((3, 7))), vec![(7, 9, false)]);
    }

    #[test]
    fn test_no_selection_or_empty_selection() {
        assert_eq!(runs(0, 4, None), vec![(0, 4, false)]);
        assert_eq!(runs(0, 4, Some((2, 2))), vec![(0, 4, false)]);
    }

    #[test]
    fn test_with_color_keeps_weight() {
        let style = ChunkStyle {
            color: HexColor::rgb(1, 2, 3),
            bold: true,
            italic: false,
        };
        let recolored = style.with_color(HexColor::rgb(9, 9, 9));
        assert!(recolored.bold);
        assert_eq!(recolored.color, HexColor::rgb(9, 9, 9));
    }
}
