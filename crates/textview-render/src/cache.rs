//! Per-line style cache for the syntax highlighter.
//!
//! Entries are keyed by line number and validated against a hash of the
//! line's text, so an unchanged line skips re-highlighting on later paints.

use std::collections::HashMap;

use crate::chunk::ChunkStyle;

/// A styled column range `[start, end)` within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledColumns {
    pub start: usize,
    pub end: usize,
    pub style: ChunkStyle,
}

struct CachedLine {
    content_hash: u64,
    runs: Vec<StyledColumns>,
}

#[derive(Default)]
pub(crate) struct LineStyleCache {
    lines: HashMap<usize, CachedLine>,
}

impl LineStyleCache {
    pub fn get(&self, line: usize, content_hash: u64) -> Option<&[StyledColumns]> {
        self.lines
            .get(&line)
            .filter(|entry| entry.content_hash == content_hash)
            .map(|entry| entry.runs.as_slice())
    }

    pub fn insert(&mut self, line: usize, content_hash: u64, runs: Vec<StyledColumns>) {
        self.lines.insert(line, CachedLine { content_hash, runs });
    }

    /// Drops every entry at or after `line`.
    pub fn invalidate_from(&mut self, line: usize) {
        self.lines.retain(|&l, _| l < line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// FNV-1a hash of line content.
pub(crate) fn hash_str(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use textview_config::HexColor;

    fn run(start: usize, end: usize) -> StyledColumns {
        StyledColumns {
            start,
            end,
            style: ChunkStyle::plain(HexColor::rgb(0, 0, 0)),
        }
    }

    #[test]
    fn hash_str_distinguishes_content() {
        assert_eq!(hash_str(""), 0xcbf29ce484222325);
        assert_eq!(hash_str("café"), hash_str("café"));
        assert_ne!(hash_str("café"), hash_str("cafe"));
    }

    #[test]
    fn cache_hit_requires_matching_hash() {
        let mut cache = LineStyleCache::default();
        cache.insert(3, 42, vec![run(0, 4)]);
        assert_eq!(cache.get(3, 42), Some(&[run(0, 4)][..]));
        assert!(cache.get(3, 43).is_none());
        assert!(cache.get(2, 42).is_none());
    }

    #[test]
    fn invalidate_from_keeps_earlier_lines() {
        let mut cache = LineStyleCache::default();
        for line in 0..5 {
            cache.insert(line, 1, vec![run(0, 1)]);
        }
        cache.invalidate_from(2);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(1, 1).is_some());
        assert!(cache.get(2, 1).is_none());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
