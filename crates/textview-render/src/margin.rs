//! The text margin: paints one document line at a time onto a [`Surface`].
//!
//! A line is drawn in this order: text up to each folded region and the
//! fold's placeholder box, the remaining text split into styled runs,
//! the end-of-line background, then the ruler. The caret is painted
//! wherever its offset falls inside the drawn range.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use textview_config::{ColorStyle, EditorOptions, HexColor};
use textview_core::{
    Caret, CaretChange, Document, DocumentChange, LineSegment, ListenerId, MarkerKind, Segment,
    Selection,
};
use tracing::{error, warn};

use crate::blink::CaretBlink;
use crate::chunk::{split_by_selection, ChunkStyle};
use crate::highlight::SyntaxChunker;
use crate::host::ViewHost;
use crate::layout::TextLayout;
use crate::surface::{Rect, Surface};

const SPACE_MARKER: &str = "\u{00B7}";
const TAB_MARKER: &str = "\u{2192}";
const EOL_MARKER: &str = "\u{00B6}";
const INVALID_LINE_MARKER: &str = "~";
const EMPTY_FOLD_DESCRIPTION: &str = "...";

/// Everything a draw call reads besides the margin's own state.
pub struct MarginContext<'a> {
    pub document: &'a Document,
    pub caret: &'a Caret,
    pub selection: &'a Selection,
    pub options: &'a EditorOptions,
    pub style: &'a ColorStyle,
}

type EventQueue<E> = Rc<RefCell<VecDeque<E>>>;

#[derive(Debug)]
pub struct TextViewMargin {
    /// Widest line width seen since the last document change.
    widest: Option<i32>,
    disabled: bool,
    blink: CaretBlink,
    bracket_offset: Option<usize>,
    caret_events: EventQueue<CaretChange>,
    document_events: EventQueue<DocumentChange>,
    caret_listener: Option<ListenerId>,
    document_listener: Option<ListenerId>,
}

impl TextViewMargin {
    /// Creates the margin and subscribes it to caret and document changes.
    /// Call [`detach`](Self::detach) before dropping either of them.
    pub fn new(caret: &mut Caret, document: &mut Document) -> Self {
        let caret_events: EventQueue<CaretChange> = Rc::default();
        let document_events: EventQueue<DocumentChange> = Rc::default();

        let queue = Rc::clone(&caret_events);
        let caret_listener = caret.subscribe(move |change| queue.borrow_mut().push_back(*change));
        let queue = Rc::clone(&document_events);
        let document_listener =
            document.subscribe(move |change| queue.borrow_mut().push_back(change.clone()));

        Self {
            widest: None,
            disabled: false,
            blink: CaretBlink::default(),
            bracket_offset: None,
            caret_events,
            document_events,
            caret_listener: Some(caret_listener),
            document_listener: Some(document_listener),
        }
    }

    pub fn detach(&mut self, caret: &mut Caret, document: &mut Document) {
        if let Some(id) = self.caret_listener.take() {
            caret.unsubscribe(id);
        }
        if let Some(id) = self.document_listener.take() {
            document.unsubscribe(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.caret_listener.is_some()
    }

    pub(crate) fn take_caret_events(&mut self) -> Vec<CaretChange> {
        self.caret_events.borrow_mut().drain(..).collect()
    }

    pub(crate) fn take_document_events(&mut self) -> Vec<DocumentChange> {
        self.document_events.borrow_mut().drain(..).collect()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Re-enables drawing after a surface failure and forgets the widest line.
    pub fn reset_pipeline(&mut self) {
        self.disabled = false;
        self.widest = None;
    }

    pub(crate) fn reset_widest_line(&mut self) {
        self.widest = None;
    }

    pub fn bracket_offset(&self) -> Option<usize> {
        self.bracket_offset
    }

    pub(crate) fn set_bracket_offset(&mut self, offset: Option<usize>) {
        self.bracket_offset = offset;
    }

    pub fn blink(&self) -> &CaretBlink {
        &self.blink
    }

    pub(crate) fn blink_mut(&mut self) -> &mut CaretBlink {
        &mut self.blink
    }

    /// Draws line `line_nr` with its text origin at `x` and its top at `y`.
    /// `area` is the region being repainted.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        ctx: &MarginContext<'_>,
        chunker: &mut SyntaxChunker,
        surface: &mut dyn Surface,
        host: &mut dyn ViewHost,
        area: Rect,
        line_nr: usize,
        x: i32,
        y: i32,
    ) {
        if self.disabled {
            return;
        }
        if let Err(err) = surface.prepare() {
            error!("Text surface is unusable, disabling drawing: {err:#}");
            host.report_error(&err);
            self.disabled = true;
            return;
        }

        let layout = TextLayout::from_options(ctx.options);
        let scroll = host.scroll_offset();
        let x_start = area.x.max(x);
        surface.set_clip(Rect::new(
            x_start,
            y,
            area.right() - x_start,
            layout.line_height,
        ));

        let text_x = x - scroll.x;
        let mut painter = LinePainter {
            ctx,
            surface,
            layout,
            y,
            x_pos: text_x,
            visible_column: 0,
            right: area.right(),
            ruler_x: ctx
                .options
                .show_ruler
                .then(|| text_x + ctx.options.ruler_column as i32 * layout.char_width),
            bracket_offset: self
                .bracket_offset
                .filter(|_| ctx.options.highlight_matching_bracket),
            caret_shown: ctx.caret.visible && self.blink.is_on() && host.has_focus(),
        };

        let Some(line) = ctx.document.get_line(line_nr) else {
            painter.draw_invalid_line(x);
            return;
        };

        let (line, offset) = painter.draw_folds(chunker, line);

        let width = layout.line_width(ctx.document, &line);
        if self.widest.is_none_or(|w| width > w) {
            self.widest = Some(width);
            host.recompute_horizontal_extent(width);
        }

        if line.end_offset() > offset {
            let length = line.editable_end_offset().saturating_sub(offset);
            painter.draw_line_text(chunker, &line, offset, length);
        }
        painter.draw_end_of_line(&line);
    }

    /// Draws `count` visible rows starting at `first_row`, mapping rows
    /// through folding. Rows past the document draw as absent lines.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rows(
        &mut self,
        ctx: &MarginContext<'_>,
        chunker: &mut SyntaxChunker,
        surface: &mut dyn Surface,
        host: &mut dyn ViewHost,
        area: Rect,
        x: i32,
        first_row: usize,
        count: usize,
    ) {
        let layout = TextLayout::from_options(ctx.options);
        let visible_rows = ctx.document.visible_line_count();
        let scroll = host.scroll_offset();
        for row in first_row..first_row + count {
            let line_nr = if row < visible_rows {
                ctx.document.visual_to_logical_line(row)
            } else {
                ctx.document.line_count() + (row - visible_rows)
            };
            let y = area.y + layout.row_to_y(row, scroll);
            self.draw(ctx, chunker, surface, host, area, line_nr, x, y);
        }
    }
}

/// Per-line drawing state.
struct LinePainter<'p, 'a> {
    ctx: &'p MarginContext<'a>,
    surface: &'p mut dyn Surface,
    layout: TextLayout,
    y: i32,
    x_pos: i32,
    /// Visual column of `x_pos`, for tab stops. Carried across folds.
    visible_column: usize,
    right: i32,
    ruler_x: Option<i32>,
    bracket_offset: Option<usize>,
    caret_shown: bool,
}

impl LinePainter<'_, '_> {
    fn cell_rect(&self, x: i32, width: i32) -> Rect {
        Rect::new(x, self.y, width, self.layout.line_height)
    }

    /// Fills `rect`, dimming the part right of the ruler.
    fn fill_with_ruler(&mut self, rect: Rect, color: HexColor) {
        if rect.is_empty() {
            return;
        }
        if let Some(ruler_x) = self.ruler_x {
            let divider = ruler_x.clamp(rect.x, rect.right());
            if divider < rect.right() {
                if divider > rect.x {
                    self.surface.fill_rect(
                        Rect::new(rect.x, rect.y, divider - rect.x, rect.height),
                        color,
                    );
                }
                self.surface.fill_rect(
                    Rect::new(divider, rect.y, rect.right() - divider, rect.height),
                    color.dim(),
                );
                return;
            }
        }
        self.surface.fill_rect(rect, color);
    }

    fn draw_ruler(&mut self) {
        if let Some(ruler_x) = self.ruler_x {
            let (y, color) = (self.y, self.ctx.style.ruler);
            self.surface
                .draw_line((ruler_x, y), (ruler_x, y + self.layout.line_height), color);
        }
    }

    fn draw_invalid_line(&mut self, x: i32) {
        if self.ctx.options.show_invalid_lines {
            let rect = self.cell_rect(x, self.right - x);
            self.fill_with_ruler(rect, self.ctx.style.background);
            let style = ChunkStyle::plain(self.ctx.style.invalid_line_marker);
            self.surface.draw_text(x, self.y, INVALID_LINE_MARKER, style);
        }
        self.draw_ruler();
    }

    fn draw_caret(&mut self, ch: char, x: i32) {
        if !self.caret_shown {
            return;
        }
        let caret = self.ctx.style.caret;
        if self.ctx.caret.insert_mode {
            self.surface
                .draw_line((x, self.y), (x, self.y + self.layout.line_height), caret);
        } else {
            let rect = self.cell_rect(x, self.layout.char_width);
            self.surface.fill_rect(rect, caret);
            let style = ChunkStyle::plain(self.ctx.style.caret_foreground);
            self.surface
                .draw_text(x, self.y, ch.encode_utf8(&mut [0; 4]), style);
        }
    }

    /// Walks the folded regions starting on `line`, following regions that
    /// end on later lines. Returns the line and offset where plain text
    /// drawing resumes.
    fn draw_folds(
        &mut self,
        chunker: &mut SyntaxChunker,
        mut line: LineSegment,
    ) -> (LineSegment, usize) {
        let doc = self.ctx.document;
        let mut offset = line.offset;
        let mut foldings = doc.get_start_foldings(line.number);
        let mut index = 0;
        let mut hops = 0;
        let max_hops = doc.line_count();

        while let Some(fold) = foldings.get(index).cloned() {
            index += 1;
            if !fold.is_folded || fold.offset < offset {
                continue;
            }
            if fold.end_offset <= fold.offset {
                warn!(
                    "Skipping fold at offset {} with non-increasing end {}",
                    fold.offset, fold.end_offset
                );
                continue;
            }

            self.draw_line_text(chunker, &line, offset, fold.offset - offset);
            offset = fold.end_offset;
            self.draw_fold_placeholder(&fold.description, fold.offset, fold.end_offset);

            let end_line = doc.offset_to_line_number(fold.end_offset);
            if end_line != line.number {
                hops += 1;
                if hops > max_hops {
                    warn!("Fold chain from line {} did not terminate", line.number);
                    break;
                }
                let Some(next) = doc.get_line(end_line) else {
                    break;
                };
                line = next;
                foldings = doc.get_start_foldings(end_line);
                index = 0;
            }
        }
        (line, offset)
    }

    fn draw_fold_placeholder(&mut self, description: &str, start: usize, end: usize) {
        let text = if description.is_empty() {
            EMPTY_FOLD_DESCRIPTION
        } else {
            description
        };
        let chars = text.chars().count();
        let width = chars as i32 * self.layout.char_width;
        let selected = self
            .ctx
            .selection
            .range()
            .filter(|r| !r.is_empty())
            .is_some_and(|r| r.contains_segment(Segment::from_bounds(start, end)));

        let style = self.ctx.style;
        let (fill, border) = if selected {
            (style.selection_bg, style.selection_fg)
        } else {
            (style.fold_placeholder_bg, style.fold_line)
        };
        let rect = Rect::new(self.x_pos, self.y, width - 1, self.layout.line_height - 1);
        self.surface.fill_rect(rect, fill);
        self.surface.stroke_rect(rect, border);
        self.surface
            .draw_text(self.x_pos, self.y, text, ChunkStyle::plain(border));

        if self.ctx.caret.offset() == start {
            let ch = text.chars().next().unwrap_or(' ');
            self.draw_caret(ch, self.x_pos);
        }
        self.x_pos += width;
        self.visible_column += chars;
    }

    /// Draws `[offset, offset + length)` of `line` through the chunker and
    /// the selection split.
    fn draw_line_text(
        &mut self,
        chunker: &mut SyntaxChunker,
        line: &LineSegment,
        offset: usize,
        length: usize,
    ) {
        let selection = self
            .ctx
            .selection
            .range()
            .filter(|r| !r.is_empty())
            .map(|r| (r.offset, r.end_offset()));
        let chunks = chunker.chunks(self.ctx.document, line, offset, length, self.ctx.style);
        for chunk in chunks {
            for run in split_by_selection(chunk.offset, chunk.end_offset(), selection) {
                self.draw_run(line, run.offset, run.end_offset, run.selected, chunk.style);
            }
        }
    }

    /// Draws one uniformly styled run character by character. Plain
    /// characters are batched into a single text call.
    fn draw_run(
        &mut self,
        line: &LineSegment,
        start: usize,
        end: usize,
        selected: bool,
        style: ChunkStyle,
    ) {
        let doc = self.ctx.document;
        let caret_offset = self.ctx.caret.offset();
        let mut word = Word::default();
        let mut caret_at = None;

        let chars = doc.buffer().rope().chars_at(start.min(doc.len()));
        for (offset, ch) in (start..end).zip(chars) {
            if self.bracket_offset == Some(offset) {
                self.flush_word(line, &mut word, selected, style, offset);
                self.draw_bracket_box(line, ch, offset, selected, style);
            } else if ch == ' ' {
                self.flush_word(line, &mut word, selected, style, offset);
                self.draw_whitespace(line, offset, 1, selected, SPACE_MARKER, self.ctx.options.show_spaces);
                if offset == caret_offset {
                    let marker = if self.ctx.options.show_spaces { '\u{00B7}' } else { ' ' };
                    self.draw_caret(marker, self.x_pos);
                }
                self.x_pos += self.layout.char_width;
                self.visible_column += 1;
            } else if ch == '\t' {
                self.flush_word(line, &mut word, selected, style, offset);
                let (next, delta) = self.layout.advance('\t', self.visible_column);
                let cells = next - self.visible_column;
                self.draw_whitespace(line, offset, cells, selected, TAB_MARKER, self.ctx.options.show_tabs);
                if offset == caret_offset {
                    let marker = if self.ctx.options.show_tabs { '\u{2192}' } else { ' ' };
                    self.draw_caret(marker, self.x_pos);
                }
                self.x_pos += delta;
                self.visible_column = next;
            } else {
                if offset == caret_offset {
                    caret_at = Some((self.x_pos + word.width(self.layout.char_width), ch));
                }
                word.push(ch);
            }
        }
        self.flush_word(line, &mut word, selected, style, end);

        if let Some((x, ch)) = caret_at {
            self.draw_caret(ch, x);
        }
    }

    /// Draws the batched characters ending just before `end`.
    fn flush_word(
        &mut self,
        line: &LineSegment,
        word: &mut Word,
        selected: bool,
        style: ChunkStyle,
        end: usize,
    ) {
        if word.is_empty() {
            return;
        }
        let width = word.width(self.layout.char_width);
        let start = end - word.len;
        let (bg, fg) = if selected {
            (self.ctx.style.selection_bg, style.with_color(self.ctx.style.selection_fg))
        } else {
            (self.ctx.style.background, style)
        };
        let x = self.x_pos;
        self.fill_with_ruler(self.cell_rect(x, width), bg);
        self.draw_markers(line, start, end, x, x + width, true);
        self.surface.draw_text(x, self.y, &word.text, fg);
        self.draw_markers(line, start, end, x, x + width, false);

        self.x_pos += width;
        self.visible_column += word.len;
        word.clear();
    }

    fn draw_bracket_box(
        &mut self,
        line: &LineSegment,
        ch: char,
        offset: usize,
        selected: bool,
        style: ChunkStyle,
    ) {
        let cw = self.layout.char_width;
        let x = self.x_pos;
        let rect = Rect::new(x, self.y, cw - 1, self.layout.line_height - 1);
        let (fill, fg) = if selected {
            (self.ctx.style.selection_bg, style.with_color(self.ctx.style.selection_fg))
        } else {
            (self.ctx.style.bracket_highlight_bg, style)
        };
        self.surface.fill_rect(rect, fill);
        self.surface
            .stroke_rect(rect, self.ctx.style.bracket_highlight_border);
        self.draw_markers(line, offset, offset + 1, x, x + cw, true);
        self.surface
            .draw_text(x, self.y, ch.encode_utf8(&mut [0; 4]), fg);
        self.draw_markers(line, offset, offset + 1, x, x + cw, false);

        self.x_pos += cw;
        self.visible_column += 1;
    }

    /// Background and optional marker glyph for a space or tab spanning
    /// `cells` character cells.
    fn draw_whitespace(
        &mut self,
        line: &LineSegment,
        offset: usize,
        cells: usize,
        selected: bool,
        marker: &str,
        show_marker: bool,
    ) {
        let x = self.x_pos;
        let width = cells as i32 * self.layout.char_width;
        let bg = if selected {
            self.ctx.style.selection_bg
        } else {
            self.ctx.style.background
        };
        self.fill_with_ruler(self.cell_rect(x, width), bg);
        self.draw_markers(line, offset, offset + 1, x, x + width, true);
        if show_marker {
            let color = if selected {
                self.ctx.style.selection_fg
            } else {
                self.ctx.style.whitespace_marker
            };
            self.surface
                .draw_text(x, self.y, marker, ChunkStyle::plain(color));
        }
        self.draw_markers(line, offset, offset + 1, x, x + width, false);
    }

    /// Draws the line's markers over the run `[start, end)` occupying
    /// pixels `[x_start, x_end)`. `background` selects which layer.
    fn draw_markers(
        &mut self,
        line: &LineSegment,
        start: usize,
        end: usize,
        x_start: i32,
        x_end: i32,
        background: bool,
    ) {
        let markers = self.ctx.document.line_markers(line.number);
        if markers.is_empty() || end <= start {
            return;
        }
        let cell = (x_end - x_start) / (end - start) as i32;
        let bottom = self.y + self.layout.line_height - 1;
        for marker in markers.iter().filter(|m| m.is_background() == background) {
            let Some(range) = marker.clip(line.offset, line.editable_length, start..end) else {
                continue;
            };
            let xs = x_start + (range.start - start) as i32 * cell;
            let xe = xs + range.len() as i32 * cell;
            match marker.kind {
                MarkerKind::Background => {
                    let rect = self.cell_rect(xs, xe - xs);
                    self.surface.fill_rect(rect, marker.color);
                }
                MarkerKind::Underline => {
                    self.surface.draw_line((xs, bottom), (xe, bottom), marker.color);
                }
                MarkerKind::Strikethrough => {
                    let mid = self.y + self.layout.line_height / 2;
                    self.surface.draw_line((xs, mid), (xe, mid), marker.color);
                }
                MarkerKind::Squiggle => {
                    let mut px = xs;
                    let mut up = false;
                    while px < xe {
                        let nx = (px + 2).min(xe);
                        let (y0, y1) = if up {
                            (bottom - 2, bottom)
                        } else {
                            (bottom, bottom - 2)
                        };
                        self.surface.draw_line((px, y0), (nx, y1), marker.color);
                        up = !up;
                        px = nx;
                    }
                }
            }
        }
    }

    fn draw_end_of_line(&mut self, line: &LineSegment) {
        let eol_offset = line.editable_end_offset();
        let selected = self.ctx.selection.contains(eol_offset);
        let bg = if selected {
            self.ctx.style.selection_bg
        } else {
            self.ctx.style.background
        };
        let x = self.x_pos;
        self.fill_with_ruler(self.cell_rect(x, self.right - x), bg);

        if self.ctx.options.show_eol_markers {
            let color = if selected {
                self.ctx.style.selection_fg
            } else {
                self.ctx.style.whitespace_marker
            };
            self.surface
                .draw_text(x, self.y, EOL_MARKER, ChunkStyle::plain(color));
        }
        self.draw_ruler();

        if self.ctx.caret.offset() == eol_offset {
            let marker = if self.ctx.options.show_eol_markers { '\u{00B6}' } else { ' ' };
            self.draw_caret(marker, x);
        }
    }
}

/// Characters batched for a single text call.
#[derive(Default)]
struct Word {
    text: String,
    len: usize,
}

impl Word {
    fn push(&mut self, ch: char) {
        self.text.push(ch);
        self.len += 1;
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn width(&self, char_width: i32) -> i32 {
        self.len as i32 * char_width
    }

    fn clear(&mut self) {
        self.text.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::surface::{DrawOp, RecordingSurface};
    use textview_core::{DocumentLocation, TextMarker};

    struct Fixture {
        doc: Document,
        caret: Caret,
        selection: Selection,
        options: EditorOptions,
        style: ColorStyle,
        margin: TextViewMargin,
        chunker: SyntaxChunker,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let mut doc = Document::from(text);
            let mut caret = Caret::new();
            let margin = TextViewMargin::new(&mut caret, &mut doc);
            let options = EditorOptions {
                char_width: 10,
                line_height: 20,
                show_ruler: false,
                ..EditorOptions::default()
            };
            Self {
                doc,
                caret,
                selection: Selection::default(),
                options,
                style: ColorStyle::default(),
                margin,
                chunker: SyntaxChunker::default(),
            }
        }

        fn draw(&mut self, line: usize) -> (RecordingSurface, RecordingHost) {
            let mut surface = RecordingSurface::new();
            let mut host = RecordingHost::new();
            let ctx = MarginContext {
                document: &self.doc,
                caret: &self.caret,
                selection: &self.selection,
                options: &self.options,
                style: &self.style,
            };
            self.margin.draw(
                &ctx,
                &mut self.chunker,
                &mut surface,
                &mut host,
                Rect::new(0, 0, 400, 20),
                line,
                0,
                0,
            );
            (surface, host)
        }
    }

    #[test]
    fn test_plain_line_is_one_text_call() {
        let mut f = Fixture::new("hello\nworld");
        f.caret.visible = false;
        let (surface, _) = f.draw(0);
        assert_eq!(surface.texts(), vec!["hello"]);
        assert!(matches!(surface.ops[0], DrawOp::Clip(_)));
    }

    #[test]
    fn test_spaces_split_words_and_show_markers() {
        let mut f = Fixture::new("a b");
        f.options.show_spaces = true;
        f.caret.visible = false;
        let (surface, _) = f.draw(0);
        assert_eq!(surface.texts(), vec!["a", "\u{00B7}", "b"]);
    }

    #[test]
    fn test_tab_expands_to_next_stop() {
        let mut f = Fixture::new("a\tb");
        f.caret.visible = false;
        let (surface, _) = f.draw(0);
        let b = surface
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "b" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(b, 40);
    }

    #[test]
    fn test_insert_caret_is_vertical_line() {
        let mut f = Fixture::new("abc");
        f.caret.set_location(&f.doc, DocumentLocation::new(0, 2));
        let (surface, _) = f.draw(0);
        let caret = f.style.caret;
        assert!(surface
            .lines()
            .iter()
            .any(|&(from, to, c)| from == (20, 0) && to == (20, 20) && c == caret));
    }

    #[test]
    fn test_overwrite_caret_fills_cell() {
        let mut f = Fixture::new("abc");
        f.caret.insert_mode = false;
        f.caret.set_location(&f.doc, DocumentLocation::new(0, 1));
        let (surface, _) = f.draw(0);
        assert!(surface
            .fills()
            .contains(&(Rect::new(10, 0, 10, 20), f.style.caret)));
        assert_eq!(surface.texts(), vec!["abc", "b"]);
    }

    #[test]
    fn test_caret_hidden_without_focus() {
        let mut f = Fixture::new("abc");
        let mut surface = RecordingSurface::new();
        let mut host = RecordingHost {
            focused: false,
            ..RecordingHost::default()
        };
        let ctx = MarginContext {
            document: &f.doc,
            caret: &f.caret,
            selection: &f.selection,
            options: &f.options,
            style: &f.style,
        };
        f.margin.draw(
            &ctx,
            &mut f.chunker,
            &mut surface,
            &mut host,
            Rect::new(0, 0, 400, 20),
            0,
            0,
            0,
        );
        assert!(surface.lines().is_empty());
    }

    #[test]
    fn test_selection_splits_runs() {
        let mut f = Fixture::new("abcdef");
        f.caret.visible = false;
        f.selection.set(&f.doc, Segment::new(2, 2));
        let (surface, _) = f.draw(0);
        assert_eq!(surface.texts(), vec!["ab", "cd", "ef"]);
        assert!(surface
            .fills()
            .contains(&(Rect::new(20, 0, 20, 20), f.style.selection_bg)));
    }

    #[test]
    fn test_markers_layer_around_text() {
        let mut f = Fixture::new("abcdef");
        f.caret.visible = false;
        let red = HexColor::rgb(255, 0, 0);
        let tint = HexColor::rgb(0, 0, 80);
        f.doc
            .add_marker(0, TextMarker::new(MarkerKind::Underline, red).with_columns(1, 3))
            .unwrap();
        f.doc
            .add_marker(0, TextMarker::new(MarkerKind::Background, tint))
            .unwrap();
        let (surface, _) = f.draw(0);
        let tint_at = surface
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Fill(_, c) if *c == tint))
            .unwrap();
        let text_at = surface
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { .. }))
            .unwrap();
        let underline = surface
            .lines()
            .into_iter()
            .find(|l| l.2 == red)
            .unwrap();
        assert!(tint_at < text_at);
        assert_eq!(underline.0, (10, 19));
        assert_eq!(underline.1, (30, 19));
    }

    #[test]
    fn test_widest_line_reported_once() {
        let mut f = Fixture::new("abcd\nab");
        let (_, host) = f.draw(0);
        assert_eq!(
            host.requests,
            vec![crate::host::HostRequest::HorizontalExtent(40)]
        );
        let (_, host) = f.draw(1);
        assert!(host.requests.is_empty());
        f.margin.reset_widest_line();
        let (_, host) = f.draw(1);
        assert_eq!(host.requests.len(), 1);
    }

    #[test]
    fn test_detach_unsubscribes() {
        let mut f = Fixture::new("abc");
        f.caret.set_location(&f.doc, DocumentLocation::new(0, 1));
        assert_eq!(f.margin.take_caret_events().len(), 1);
        f.margin.detach(&mut f.caret, &mut f.doc);
        assert!(!f.margin.is_attached());
        f.caret.set_location(&f.doc, DocumentLocation::new(0, 2));
        f.doc.insert(0, "x").unwrap();
        assert!(f.margin.take_caret_events().is_empty());
        assert!(f.margin.take_document_events().is_empty());
    }
}
