//! Line/column positions inside a document.
use std::fmt;

/// A position as 0-indexed line and column (char index within the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentLocation {
    pub line: usize,
    pub column: usize,
}

impl DocumentLocation {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl PartialOrd for DocumentLocation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocumentLocation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<(usize, usize)> for DocumentLocation {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_line_then_column() {
        let a = DocumentLocation::new(1, 9);
        let b = DocumentLocation::new(2, 0);
        let c = DocumentLocation::new(2, 3);
        assert!(a < b && b < c);
        assert_eq!(DocumentLocation::from((2, 3)), c);
        assert_eq!(c.to_string(), "2:3");
    }
}
