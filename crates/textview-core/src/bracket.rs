/// Matching-bracket search over `()`, `[]` and `{}`.
use crate::document::Document;

const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

pub fn is_bracket(c: char) -> bool {
    PAIRS.iter().any(|&(open, close)| c == open || c == close)
}

pub fn is_open_bracket(c: char) -> bool {
    PAIRS.iter().any(|&(open, _)| c == open)
}

/// The bracket pairing with `c`, if `c` is a bracket.
pub fn partner(c: char) -> Option<char> {
    PAIRS.iter().find_map(|&(open, close)| {
        if c == open {
            Some(close)
        } else if c == close {
            Some(open)
        } else {
            None
        }
    })
}

/// Offset of the bracket matching the one at `offset`.
///
/// Only brackets of the same type count towards nesting. Scans forward
/// from an opening bracket and backward from a closing one.
pub fn find_matching_bracket(doc: &Document, offset: usize) -> Option<usize> {
    let ch = doc.char_at(offset)?;
    let target = partner(ch)?;
    let rope = doc.buffer().rope();
    let mut depth = 1usize;

    if is_open_bracket(ch) {
        for (i, c) in rope.chars_at(offset + 1).enumerate() {
            if c == ch {
                depth += 1;
            } else if c == target {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1 + i);
                }
            }
        }
    } else {
        let mut chars = rope.chars_at(offset);
        let mut pos = offset;
        while let Some(c) = chars.prev() {
            pos -= 1;
            if c == ch {
                depth += 1;
            } else if c == target {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
        }
    }
    None
}

/// The bracket to highlight for a caret at `caret_offset`.
///
/// Probes the character before the caret, falling back to the one at the
/// caret. A match landing on the caret itself is retried one position
/// further and dropped if it is still self-referential.
pub fn bracket_highlight_for_caret(doc: &Document, caret_offset: usize) -> Option<usize> {
    let len = doc.len();
    let mut probe = caret_offset.saturating_sub(1);
    if caret_offset == 0 || !doc.char_at(probe).is_some_and(is_bracket) {
        probe = caret_offset;
    }
    if probe >= len {
        return None;
    }

    let mut found = find_matching_bracket(doc, probe);
    if found == Some(caret_offset) && probe + 1 < len {
        found = find_matching_bracket(doc, probe + 1);
    }
    found.filter(|&m| m != caret_offset)
}
