//! Fold segments and the visible-row mapping they induce.
//!
//! Segments are kept sorted by start offset. A folded segment hides every
//! line after its start line up to and including its end line; the text
//! after the fold end is drawn on the start line's row.

use std::ops::Range;

/// Stable identifier of a fold segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FoldId(u64);

/// A collapsible region `[offset, end_offset)` of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSegment {
    pub id: FoldId,
    pub offset: usize,
    pub end_offset: usize,
    pub is_folded: bool,
    /// Text shown in the placeholder box when folded.
    pub description: String,
}

impl FoldSegment {
    pub fn length(&self) -> usize {
        self.end_offset.saturating_sub(self.offset)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.offset <= offset && offset < self.end_offset
    }
}

/// Sorted store of fold segments.
#[derive(Debug, Clone, Default)]
pub struct FoldingStore {
    segments: Vec<FoldSegment>,
    next_id: u64,
}

impl FoldingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a segment, keeping start-offset order (ties keep insertion order).
    pub fn add(
        &mut self,
        offset: usize,
        end_offset: usize,
        description: impl Into<String>,
        is_folded: bool,
    ) -> FoldId {
        let id = FoldId(self.next_id);
        self.next_id += 1;
        let pos = self.segments.partition_point(|s| s.offset <= offset);
        self.segments.insert(
            pos,
            FoldSegment {
                id,
                offset,
                end_offset,
                is_folded,
                description: description.into(),
            },
        );
        id
    }

    pub fn remove(&mut self, id: FoldId) -> Option<FoldSegment> {
        let pos = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(pos))
    }

    pub fn get(&self, id: FoldId) -> Option<&FoldSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: FoldId) -> Option<&mut FoldSegment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    pub fn segments(&self) -> &[FoldSegment] {
        &self.segments
    }

    /// Segments whose start offset lies in `range`, in start order.
    pub fn starting_in(&self, range: Range<usize>) -> &[FoldSegment] {
        let lo = self.segments.partition_point(|s| s.offset < range.start);
        let hi = self.segments.partition_point(|s| s.offset < range.end);
        &self.segments[lo..hi.max(lo)]
    }

    /// Shifts segments after `len` chars were inserted at `offset`.
    pub fn adjust_for_insert(&mut self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        for seg in &mut self.segments {
            if seg.end_offset > offset || seg.offset >= offset {
                seg.end_offset += len;
            }
            if seg.offset >= offset {
                seg.offset += len;
            }
        }
    }

    /// Shifts segments after `[offset, offset + len)` was removed.
    /// Segments lying entirely inside the removed range are dropped.
    pub fn adjust_for_remove(&mut self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = offset + len;
        self.segments
            .retain(|s| !(s.offset >= offset && s.end_offset <= end));
        let map = |x: usize| {
            if x <= offset {
                x
            } else if x >= end {
                x - len
            } else {
                offset
            }
        };
        for seg in &mut self.segments {
            seg.offset = map(seg.offset);
            seg.end_offset = map(seg.end_offset);
        }
        // Removal never reorders starts, but equal starts may now interleave ids
        self.segments.sort_by_key(|s| s.offset);
    }

    /// Merged, sorted, inclusive line ranges hidden by folded segments.
    ///
    /// `line_of` maps an offset to its line number.
    pub fn hidden_line_ranges(&self, line_of: impl Fn(usize) -> usize) -> Vec<(usize, usize)> {
        let mut ranges: Vec<(usize, usize)> = self
            .segments
            .iter()
            .filter(|s| s.is_folded)
            .filter_map(|s| {
                let start = line_of(s.offset);
                let end = line_of(s.end_offset);
                (end > start).then_some((start + 1, end))
            })
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
        for (a, b) in ranges {
            match merged.last_mut() {
                Some(last) if a <= last.1 + 1 => last.1 = last.1.max(b),
                _ => merged.push((a, b)),
            }
        }
        merged
    }
}

/// Maps a visible row to the logical line drawn on it.
pub fn visual_to_logical(hidden: &[(usize, usize)], row: usize) -> usize {
    let mut line = row;
    for &(a, b) in hidden {
        if a <= line {
            line += b - a + 1;
        } else {
            break;
        }
    }
    line
}

/// Maps a logical line to the visible row showing it. A hidden line maps
/// to the row of the line owning the fold that hides it.
pub fn logical_to_visual(hidden: &[(usize, usize)], line: usize) -> usize {
    let line = hidden
        .iter()
        .find(|&&(a, b)| a <= line && line <= b)
        .map_or(line, |&(a, _)| a - 1);
    let hidden_before: usize = hidden
        .iter()
        .take_while(|&&(_, b)| b < line)
        .map(|&(a, b)| b - a + 1)
        .sum();
    line - hidden_before
}
