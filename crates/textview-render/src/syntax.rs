/// Syntax highlighting integration using syntect.
use std::path::Path;

use syntect::highlighting::{
    FontStyle, HighlightIterator, HighlightState, Highlighter, Style, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use textview_config::{ColorStyle, HexColor};
use textview_core::{Document, LineSegment};

use crate::cache::{hash_str, LineStyleCache, StyledColumns};
use crate::chunk::{Chunk, ChunkStyle};
use crate::highlight::HighlightProvider;

/// Line-by-line syntect highlighter.
///
/// Parser state at the start of each line is checkpointed, so painting a
/// line only parses forward from the closest known state.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    current_theme: String,
    syntax_name: String,
    /// `checkpoints[i]` is the state at the start of line `i`.
    checkpoints: Vec<(ParseState, HighlightState)>,
    cache: LineStyleCache,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    /// Creates a highlighter with the default syntax definitions and themes,
    /// bound to plain text.
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let syntax_name = syntax_set.find_syntax_plain_text().name.clone();
        Self {
            syntax_set,
            theme_set: ThemeSet::load_defaults(),
            current_theme: "base16-eighties.dark".to_string(),
            syntax_name,
            checkpoints: Vec::new(),
            cache: LineStyleCache::default(),
        }
    }

    /// Syntax for `file_path`: by extension first, then by whole file name
    /// (`Makefile`), else plain text.
    pub fn detect_syntax(&self, file_path: Option<&Path>) -> &SyntaxReference {
        let by_token = |token: Option<&std::ffi::OsStr>| {
            token
                .and_then(|t| t.to_str())
                .and_then(|t| self.syntax_set.find_syntax_by_extension(t))
        };
        file_path
            .and_then(|path| by_token(path.extension()).or_else(|| by_token(path.file_name())))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Binds the syntax matching `path` and drops all cached state.
    pub fn set_syntax_for_path(&mut self, path: Option<&Path>) {
        let name = self.detect_syntax(path).name.clone();
        tracing::debug!("Using syntax {name}");
        self.syntax_name = name;
        self.reset();
    }

    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    pub fn current_theme(&self) -> &str {
        &self.current_theme
    }

    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    fn reset(&mut self) {
        self.checkpoints.clear();
        self.cache.clear();
    }

    /// Styled column ranges for one line, from cache when the text is unchanged.
    fn line_styles(&mut self, doc: &Document, line_nr: usize) -> Vec<StyledColumns> {
        let Some(text) = doc.line_text(line_nr) else {
            return Vec::new();
        };
        let content_hash = hash_str(&text);
        if let Some(runs) = self.cache.get(line_nr, content_hash) {
            return runs.to_vec();
        }

        let Some(theme) = self.theme_set.themes.get(&self.current_theme) else {
            return Vec::new();
        };
        let syntax = self
            .syntax_set
            .find_syntax_by_name(&self.syntax_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let highlighter = Highlighter::new(theme);

        if self.checkpoints.is_empty() {
            self.checkpoints.push((
                ParseState::new(syntax),
                HighlightState::new(&highlighter, ScopeStack::new()),
            ));
        }
        // Parse forward from the last checkpoint up to this line
        while self.checkpoints.len() <= line_nr {
            let prev = self.checkpoints.len() - 1;
            let (mut parse, mut highlight) = self.checkpoints[prev].clone();
            let prev_text = doc.line_text(prev).unwrap_or_default() + "\n";
            let ops = parse_ops(&mut parse, &prev_text, &self.syntax_set, prev);
            HighlightIterator::new(&mut highlight, &ops, &prev_text, &highlighter).for_each(drop);
            self.checkpoints.push((parse, highlight));
        }

        let (mut parse, mut highlight) = self.checkpoints[line_nr].clone();
        let line_with_nl = format!("{text}\n");
        let ops = parse_ops(&mut parse, &line_with_nl, &self.syntax_set, line_nr);
        let mut runs = Vec::new();
        let mut column = 0;
        for (style, piece) in HighlightIterator::new(&mut highlight, &ops, &line_with_nl, &highlighter) {
            let width = piece.chars().count();
            runs.push(StyledColumns {
                start: column,
                end: column + width,
                style: chunk_style(style),
            });
            column += width;
        }
        if self.checkpoints.len() == line_nr + 1 {
            self.checkpoints.push((parse, highlight));
        }

        self.cache.insert(line_nr, content_hash, runs.clone());
        runs
    }
}

fn parse_ops(
    parse: &mut ParseState,
    text: &str,
    syntax_set: &SyntaxSet,
    line_nr: usize,
) -> Vec<(usize, syntect::parsing::ScopeStackOp)> {
    parse.parse_line(text, syntax_set).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse line {line_nr}: {e}");
        Vec::new()
    })
}

/// Converts a syntect style to a chunk style.
fn chunk_style(style: Style) -> ChunkStyle {
    let fg = style.foreground;
    ChunkStyle {
        color: HexColor::rgba(fg.r, fg.g, fg.b, fg.a),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
    }
}

impl HighlightProvider for SyntectHighlighter {
    fn chunks(
        &mut self,
        doc: &Document,
        line: &LineSegment,
        offset: usize,
        length: usize,
        _style: &ColorStyle,
    ) -> Vec<Chunk> {
        let start = offset.saturating_sub(line.offset);
        let end = start + length;
        self.line_styles(doc, line.number)
            .into_iter()
            .filter_map(|run| {
                let s = run.start.max(start);
                let e = run.end.min(end).min(line.editable_length);
                (s < e).then(|| Chunk::new(line.offset + s, e - s, run.style))
            })
            .collect()
    }

    /// Sets the current theme.
    fn set_theme(&mut self, name: &str) -> bool {
        if !self.theme_set.themes.contains_key(name) {
            tracing::warn!("Unknown syntax theme {name:?}, keeping {}", self.current_theme);
            return false;
        }
        if self.current_theme != name {
            self.current_theme = name.to_string();
            self.reset();
        }
        true
    }

    fn invalidate_from(&mut self, line: usize) {
        self.checkpoints.truncate(line + 1);
        self.cache.invalidate_from(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_syntax_by_extension() {
        let hl = SyntectHighlighter::new();
        assert_eq!(hl.detect_syntax(Some(Path::new("main.rs"))).name, "Rust");
        assert_eq!(hl.detect_syntax(Some(Path::new("script.py"))).name, "Python");
        assert_eq!(hl.detect_syntax(Some(Path::new("noext"))).name, "Plain Text");
        assert_eq!(hl.detect_syntax(Some(Path::new("Makefile"))).name, "Makefile");
        assert_eq!(hl.detect_syntax(None).name, "Plain Text");
    }

    #[test]
    fn set_theme_rejects_unknown() {
        let mut hl = SyntectHighlighter::new();
        assert!(!hl.set_theme("does-not-exist"));
        assert_eq!(hl.current_theme(), "base16-eighties.dark");
        assert!(hl.set_theme("InspiredGitHub"));
        assert_eq!(hl.current_theme(), "InspiredGitHub");
    }

    #[test]
    fn chunks_cover_requested_columns() {
        let doc = Document::from("fn main() {\n    let x = 1;\n}\n");
        let mut hl = SyntectHighlighter::new();
        hl.set_syntax_for_path(Some(Path::new("main.rs")));
        let line = doc.get_line(1).unwrap();
        let chunks = hl.chunks(&doc, &line, line.offset + 4, 6, &ColorStyle::default());
        assert!(!chunks.is_empty());
        assert_eq!(chunks.first().unwrap().offset, line.offset + 4);
        assert_eq!(chunks.last().unwrap().end_offset(), line.offset + 10);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end_offset(), pair[1].offset);
        }
    }

    #[test]
    fn keyword_gets_distinct_color_from_identifier() {
        let doc = Document::from("fn main() {}");
        let mut hl = SyntectHighlighter::new();
        hl.set_syntax_for_path(Some(Path::new("a.rs")));
        let line = doc.get_line(0).unwrap();
        let chunks = hl.chunks(&doc, &line, 0, line.editable_length, &ColorStyle::default());
        let color_at = |off: usize| chunks.iter().find(|c| c.offset <= off && off < c.end_offset()).map(|c| c.style.color);
        assert_ne!(color_at(0), color_at(3));
    }

    #[test]
    fn invalidate_drops_later_state() {
        let doc = Document::from("a\nb\nc\nd");
        let mut hl = SyntectHighlighter::new();
        let line = doc.get_line(3).unwrap();
        hl.chunks(&doc, &line, line.offset, 1, &ColorStyle::default());
        assert_eq!(hl.checkpoints.len(), 5);
        hl.invalidate_from(1);
        assert_eq!(hl.checkpoints.len(), 2);
        assert!(hl.cache.get(3, hash_str("d")).is_none());
    }
}
