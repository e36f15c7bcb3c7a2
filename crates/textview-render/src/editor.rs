//! The text editor controller: owns the document, caret and selection,
//! turns input into caret and selection changes, and tells the host what
//! to redraw.

use std::time::Duration;

use textview_config::{ColorStyle, EditorOptions};
use textview_core::bracket::bracket_highlight_for_caret;
use textview_core::word::word_at;
use textview_core::{Caret, Document, DocumentLocation, FoldId, LineSegment, Segment, Selection};
use tracing::{debug, warn};

use crate::blink::CaretBlink;
use crate::highlight::{HighlightProvider, SyntaxChunker};
use crate::host::{CursorShape, ViewHost};
use crate::input::{CaretMove, Modifiers, MouseButton};
use crate::layout::TextLayout;
use crate::margin::{MarginContext, TextViewMargin};
use crate::redraw::RedrawQueue;
use crate::surface::{Rect, Surface};

/// Mouse gesture in progress between press and release.
#[derive(Debug, Default)]
struct MouseState {
    /// Pressed inside the selection: a possible drag-to-move.
    in_drag: bool,
    /// Pressed outside the selection: dragging extends it.
    in_selection_drag: bool,
    click_location: DocumentLocation,
    drop_location: Option<DocumentLocation>,
}

pub struct TextEditor {
    document: Document,
    caret: Caret,
    selection: Selection,
    options: EditorOptions,
    style: ColorStyle,
    chunker: SyntaxChunker,
    margin: TextViewMargin,
    redraws: RedrawQueue,
    mouse: MouseState,
    /// Selection as of the last sync, to redraw what it covered.
    drawn_selection: Option<Segment>,
}

impl TextEditor {
    pub fn new(mut document: Document, mut options: EditorOptions, style: ColorStyle) -> Self {
        options.sanitize();
        let mut caret = Caret::new();
        let margin = TextViewMargin::new(&mut caret, &mut document);
        let mut chunker = SyntaxChunker::default();
        chunker.set_enabled(options.enable_syntax_highlighting);

        let mut editor = Self {
            document,
            caret,
            selection: Selection::default(),
            options,
            style,
            chunker,
            margin,
            redraws: RedrawQueue::default(),
            mouse: MouseState::default(),
            drawn_selection: None,
        };
        editor.update_bracket_highlight();
        editor
    }

    /// Installs a syntax highlighter and selects the style's theme on it.
    pub fn with_highlighter(mut self, provider: Box<dyn HighlightProvider>) -> Self {
        self.chunker.set_provider(Some(provider));
        if !self.chunker.set_theme(&self.style.syntax_theme) {
            debug!(
                "Highlighter has no theme '{}', keeping its default",
                self.style.syntax_theme
            );
        }
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Changes are picked up by the next
    /// [`sync`](Self::sync).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn style(&self) -> &ColorStyle {
        &self.style
    }

    pub fn margin(&self) -> &TextViewMargin {
        &self.margin
    }

    /// Offset of the bracket matching the one at the caret, if highlighted.
    pub fn bracket_offset(&self) -> Option<usize> {
        self.margin.bracket_offset()
    }

    pub fn layout(&self) -> TextLayout {
        TextLayout::from_options(&self.options)
    }

    pub fn column_to_visual_x(&self, line: &LineSegment, column: usize) -> i32 {
        self.layout().column_to_visual_x(&self.document, line, column)
    }

    /// Resolves a point relative to the text origin, honoring the host's scroll.
    pub fn visual_to_document_location(
        &self,
        host: &dyn ViewHost,
        x: i32,
        y: i32,
    ) -> DocumentLocation {
        self.layout()
            .visual_to_document_location(&self.document, x, y, host.scroll_offset())
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Applies new options, re-enables a disabled pipeline and redraws everything.
    pub fn set_options(&mut self, host: &mut dyn ViewHost, mut options: EditorOptions) {
        options.sanitize();
        self.options = options;
        self.options_changed(host);
    }

    pub fn options_changed(&mut self, host: &mut dyn ViewHost) {
        self.chunker.set_enabled(self.options.enable_syntax_highlighting);
        self.margin.reset_pipeline();
        self.margin.blink_mut().reset();
        self.update_bracket_highlight();
        self.redraw_all();
        self.sync(host);
    }

    pub fn set_color_style(&mut self, host: &mut dyn ViewHost, style: ColorStyle) {
        if self.chunker.has_provider() && !self.chunker.set_theme(&style.syntax_theme) {
            debug!("No syntax theme '{}' for style '{}'", style.syntax_theme, style.name);
        }
        self.chunker.invalidate_from(0);
        self.style = style;
        self.redraw_all();
        self.sync(host);
    }

    fn redraw_all(&mut self) {
        let last = self.document.line_count().saturating_sub(1);
        self.redraws.lines(0, last);
    }

    // ── Drawing ──────────────────────────────────────────────────────

    fn margin_parts(
        &mut self,
    ) -> (MarginContext<'_>, &mut SyntaxChunker, &mut TextViewMargin) {
        (
            MarginContext {
                document: &self.document,
                caret: &self.caret,
                selection: &self.selection,
                options: &self.options,
                style: &self.style,
            },
            &mut self.chunker,
            &mut self.margin,
        )
    }

    /// Draws one logical line at `(x, y)`.
    pub fn draw_line(
        &mut self,
        surface: &mut dyn Surface,
        host: &mut dyn ViewHost,
        area: Rect,
        line_nr: usize,
        x: i32,
        y: i32,
    ) {
        let (ctx, chunker, margin) = self.margin_parts();
        margin.draw(&ctx, chunker, surface, host, area, line_nr, x, y);
    }

    /// Draws `count` visible rows from `first_row`.
    pub fn draw_rows(
        &mut self,
        surface: &mut dyn Surface,
        host: &mut dyn ViewHost,
        area: Rect,
        first_row: usize,
        count: usize,
    ) {
        let (ctx, chunker, margin) = self.margin_parts();
        margin.draw_rows(&ctx, chunker, surface, host, area, area.x, first_row, count);
    }

    /// Draws every row of the host viewport at its current scroll position.
    pub fn draw_visible(&mut self, surface: &mut dyn Surface, host: &mut dyn ViewHost) {
        let (width, height) = host.viewport_size();
        let line_height = self.options.line_height.max(1);
        let scroll_y = host.scroll_offset().y.max(0);
        let first_row = (scroll_y / line_height) as usize;
        // A partly scrolled top row pushes one more row into view
        let count = (scroll_y % line_height + height.max(0) + line_height - 1) / line_height;
        self.draw_rows(
            surface,
            host,
            Rect::new(0, 0, width, height),
            first_row,
            count as usize,
        );
    }

    // ── Change propagation ───────────────────────────────────────────

    /// Applies queued document and caret changes: revalidates the caret,
    /// scrolls, updates the bracket match and flushes redraw requests.
    pub fn sync(&mut self, host: &mut dyn ViewHost) {
        let doc_events = self.margin.take_document_events();
        if let Some(first) = doc_events.iter().map(|e| e.first_line).min() {
            self.chunker.invalidate_from(first);
            self.margin.reset_widest_line();
            let last_line = self.document.line_count().saturating_sub(1);
            for event in &doc_events {
                if event.lines_delta == 0 {
                    self.redraws.line(event.first_line);
                } else {
                    // Rows that fell off the end must repaint as absent lines
                    let removed = event.lines_delta.min(0).unsigned_abs();
                    self.redraws.lines(event.first_line, last_line + removed);
                }
            }
            self.caret.revalidate(&self.document);
            if let Some(range) = self.selection.range() {
                if range.end_offset() > self.document.len() {
                    self.selection.clear();
                }
            }
        }

        let caret_events = self.margin.take_caret_events();
        for event in &caret_events {
            let old_line = event.old_location.line;
            let new_line = event.new_location.line;
            if event.auto_scroll {
                host.scroll_to_caret(event.new_location);
                self.margin.blink_mut().reset();
            }
            if old_line != new_line {
                self.redraws.line(old_line);
            }
            self.redraws.line(new_line);
        }

        if !doc_events.is_empty() || !caret_events.is_empty() {
            self.update_bracket_highlight();
        }

        let current = self.selection.range().filter(|r| !r.is_empty());
        if current != self.drawn_selection {
            for range in [self.drawn_selection, current].into_iter().flatten() {
                let first = self.document.offset_to_line_number(range.offset);
                let last = self.document.offset_to_line_number(range.end_offset());
                self.redraws.lines(first, last);
            }
            self.drawn_selection = current;
        }

        self.redraws.flush(host);
    }

    fn update_bracket_highlight(&mut self) {
        let new = if self.options.highlight_matching_bracket {
            bracket_highlight_for_caret(&self.document, self.caret.offset())
        } else {
            None
        };
        let old = self.margin.bracket_offset();
        if new == old {
            return;
        }
        self.margin.set_bracket_offset(new);
        let old_line = old.map(|o| self.document.offset_to_line_number(o));
        let new_line = new.map(|o| self.document.offset_to_line_number(o));
        if let Some(line) = old_line {
            self.redraws.line(line);
        }
        if let Some(line) = new_line.filter(|&l| Some(l) != old_line) {
            self.redraws.line(line);
        }
    }

    /// Moves the caret, collapsing the selection unless the caret is
    /// preserving it.
    fn place_caret(&mut self, location: DocumentLocation, keep_column: bool) {
        if !self.caret.preserve_selection {
            self.selection.clear();
        }
        if keep_column {
            self.caret.set_location_keep_column(&self.document, location);
        } else {
            self.caret.set_location(&self.document, location);
        }
    }

    /// Moves the caret while extending the selection from its anchor.
    fn extend_caret(&mut self, location: DocumentLocation, keep_column: bool) {
        let from = self.caret.offset();
        self.caret.preserve_selection = true;
        self.place_caret(location, keep_column);
        self.caret.preserve_selection = false;
        self.selection
            .extend_to(&self.document, from, self.caret.offset());
    }

    // ── Mouse ────────────────────────────────────────────────────────

    pub fn mouse_pressed(
        &mut self,
        host: &mut dyn ViewHost,
        button: MouseButton,
        x: i32,
        y: i32,
        double_click: bool,
        modifiers: Modifiers,
    ) {
        self.mouse = MouseState::default();
        if button == MouseButton::Secondary {
            return;
        }

        let location = self.visual_to_document_location(host, x, y);
        self.mouse.click_location = location;
        let Some(offset) = self.document.location_to_offset(location) else {
            self.place_caret(self.document.offset_to_location(self.document.len()), false);
            self.sync(host);
            return;
        };

        if double_click {
            let word = word_at(&self.document, offset);
            let repeated =
                self.selection.is_something_selected() && self.selection.range() == Some(word);
            let target = if repeated {
                let line = self.document.get_line_by_offset(offset);
                Segment::new(line.offset, line.length)
            } else {
                word
            };
            self.selection.set(&self.document, target);
            self.sync(host);
            return;
        }

        if self.selection.contains(offset) {
            self.mouse.in_drag = true;
        } else {
            self.mouse.in_selection_drag = true;
            if modifiers.shift {
                self.extend_caret(location, false);
            } else {
                self.place_caret(location, false);
            }
        }

        if button == MouseButton::Middle {
            host.paste_primary(self.caret.offset());
        }
        self.sync(host);
    }

    /// Pointer movement. With the button held after a press outside the
    /// selection, extends the selection to the pointer.
    pub fn mouse_hover(&mut self, host: &mut dyn ViewHost, x: i32, y: i32, button_pressed: bool) {
        host.set_cursor_shape(CursorShape::Text);
        if !button_pressed {
            return;
        }
        let location = self.visual_to_document_location(host, x, y);
        if self.mouse.in_selection_drag {
            self.caret.auto_scroll_to_caret = false;
            self.extend_caret(location, false);
            self.caret.auto_scroll_to_caret = true;
            host.scroll_to_caret(self.caret.location());
            self.sync(host);
        } else if self.mouse.in_drag {
            self.mouse.drop_location = Some(location);
        }
    }

    /// Ends a press. Dragging a selection drops its text at the pointer;
    /// a plain click inside the selection places the caret there.
    pub fn mouse_released(&mut self, host: &mut dyn ViewHost) {
        if self.mouse.in_drag {
            match self.mouse.drop_location.take() {
                Some(drop) => self.move_selection_to(drop),
                None => self.place_caret(self.mouse.click_location, false),
            }
        }
        self.mouse.in_drag = false;
        self.mouse.in_selection_drag = false;
        self.sync(host);
    }

    pub fn mouse_left(&mut self, host: &mut dyn ViewHost) {
        host.set_cursor_shape(CursorShape::Default);
    }

    fn move_selection_to(&mut self, drop: DocumentLocation) {
        let Some(range) = self.selection.range().filter(|r| !r.is_empty()) else {
            return;
        };
        let Some(drop_offset) = self.document.location_to_offset(drop) else {
            return;
        };
        if drop_offset >= range.offset && drop_offset <= range.end_offset() {
            self.place_caret(drop, false);
            return;
        }
        let text = self.document.text_at(range.offset, range.length);
        let target = if drop_offset > range.end_offset() {
            drop_offset - range.length
        } else {
            drop_offset
        };
        let moved = self
            .document
            .remove(range.offset, range.length)
            .and_then(|()| self.document.insert(target, &text));
        match moved {
            Ok(()) => {
                self.selection.clear();
                self.caret.set_offset(&self.document, target + range.length);
                self.selection
                    .set(&self.document, Segment::new(target, range.length));
            }
            Err(err) => warn!("Failed to move selection to {drop}: {err:#}"),
        }
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    pub fn move_caret(&mut self, host: &mut dyn ViewHost, movement: CaretMove, extend: bool) {
        let Some((target, keep_column)) = self.caret_target(movement) else {
            if !extend && self.selection.is_something_selected() {
                self.selection.clear();
                self.sync(host);
            }
            return;
        };
        if extend {
            self.extend_caret(target, keep_column);
        } else {
            self.place_caret(target, keep_column);
        }
        self.sync(host);
    }

    fn caret_target(&self, movement: CaretMove) -> Option<(DocumentLocation, bool)> {
        let doc = &self.document;
        let here = self.caret.location();
        let line = doc.get_line(here.line)?;
        let target = match movement {
            CaretMove::Left if here.column > 0 => {
                DocumentLocation::new(here.line, here.column - 1)
            }
            CaretMove::Left if here.line > 0 => {
                let prev = doc.get_line(here.line - 1)?;
                DocumentLocation::new(prev.number, prev.editable_length)
            }
            CaretMove::Right if here.column < line.editable_length => {
                DocumentLocation::new(here.line, here.column + 1)
            }
            CaretMove::Right if here.line + 1 < doc.line_count() => {
                DocumentLocation::new(here.line + 1, 0)
            }
            CaretMove::Up | CaretMove::Down => {
                let row = doc.logical_to_visual_line(here.line);
                let row = if movement == CaretMove::Up {
                    row.checked_sub(1)?
                } else if row + 1 < doc.visible_line_count() {
                    row + 1
                } else {
                    return None;
                };
                let target_line = doc.visual_to_logical_line(row);
                return Some((
                    DocumentLocation::new(target_line, self.caret.desired_column()),
                    true,
                ));
            }
            CaretMove::LineStart => DocumentLocation::new(here.line, 0),
            CaretMove::LineEnd => DocumentLocation::new(here.line, line.editable_length),
            CaretMove::DocumentStart => DocumentLocation::default(),
            CaretMove::DocumentEnd => doc.offset_to_location(doc.len()),
            CaretMove::Left | CaretMove::Right => return None,
        };
        (target != here).then_some((target, false))
    }

    pub fn toggle_insert_mode(&mut self, host: &mut dyn ViewHost) {
        self.caret.insert_mode = !self.caret.insert_mode;
        self.redraws.line(self.caret.line());
        self.sync(host);
    }

    pub fn select_all(&mut self, host: &mut dyn ViewHost) {
        self.selection
            .set(&self.document, Segment::new(0, self.document.len()));
        self.caret.preserve_selection = true;
        self.caret.set_to_document_end(&self.document);
        self.caret.preserve_selection = false;
        self.sync(host);
    }

    /// Types `text` at the caret, replacing the selection. In overwrite
    /// mode it replaces as many characters as it inserts, up to the end of
    /// the line.
    pub fn insert_text(&mut self, host: &mut dyn ViewHost, text: &str) {
        if text.is_empty() {
            return;
        }
        let (offset, removed) = match self.selection.range().filter(|r| !r.is_empty()) {
            Some(range) => (range.offset, range.length),
            None if !self.caret.insert_mode => {
                let offset = self.caret.offset();
                let line = self.document.get_line_by_offset(offset);
                let available = line.editable_end_offset().saturating_sub(offset);
                (offset, text.chars().count().min(available))
            }
            None => (self.caret.offset(), 0),
        };
        self.apply_edit(offset, removed, text);
        self.sync(host);
    }

    /// Deletes the selection, or the character (or line break) before the caret.
    pub fn backspace(&mut self, host: &mut dyn ViewHost) {
        if !self.delete_selection() {
            let here = self.caret.location();
            if here.column > 0 {
                self.apply_edit(self.caret.offset() - 1, 1, "");
            } else if let Some(prev) = here
                .line
                .checked_sub(1)
                .and_then(|l| self.document.get_line(l))
            {
                self.apply_edit(prev.editable_end_offset(), prev.delimiter_length(), "");
            }
        }
        self.sync(host);
    }

    /// Deletes the selection, or the character (or line break) after the caret.
    pub fn delete_forward(&mut self, host: &mut dyn ViewHost) {
        if !self.delete_selection() {
            let offset = self.caret.offset();
            let line = self.document.get_line_by_offset(offset);
            if offset < line.editable_end_offset() {
                self.apply_edit(offset, 1, "");
            } else if line.delimiter_length() > 0 {
                self.apply_edit(offset, line.delimiter_length(), "");
            }
        }
        self.sync(host);
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection.range().filter(|r| !r.is_empty()) {
            Some(range) => {
                self.apply_edit(range.offset, range.length, "");
                true
            }
            None => false,
        }
    }

    /// Replaces `[offset, offset + removed)` with `text` and leaves the
    /// caret after the inserted text.
    fn apply_edit(&mut self, offset: usize, removed: usize, text: &str) {
        match self.document.replace(offset, removed, text) {
            Ok(()) => {
                self.selection.clear();
                let caret_offset = offset + text.chars().count();
                self.caret.set_offset(&self.document, caret_offset);
            }
            Err(err) => warn!("Edit at offset {offset} failed: {err:#}"),
        }
    }

    /// Programmatic caret placement; collapses the selection.
    pub fn set_caret_location(&mut self, host: &mut dyn ViewHost, location: DocumentLocation) {
        self.place_caret(location, false);
        self.sync(host);
    }

    // ── Folding ──────────────────────────────────────────────────────

    /// Flips a fold and redraws from its first line down.
    pub fn toggle_folding(&mut self, host: &mut dyn ViewHost, id: FoldId) -> Option<bool> {
        let folded = self.document.toggle_folding(id)?;
        if let Some(fold) = self.document.folding(id) {
            let first = self.document.offset_to_line_number(fold.offset);
            let last = self.document.line_count().saturating_sub(1);
            self.redraws.lines(first, last);
        }
        self.margin.reset_widest_line();
        self.sync(host);
        Some(folded)
    }

    // ── Blink timer ──────────────────────────────────────────────────

    pub fn caret_blink_interval(&self) -> Duration {
        CaretBlink::interval(self.options.caret_blink_time_ms)
    }

    /// One blink timer tick. Redraws the caret line only when the caret
    /// flips between shown and hidden. Returns whether it flipped.
    pub fn caret_tick(&mut self, host: &mut dyn ViewHost) -> bool {
        let changed = self.margin.blink_mut().tick();
        if changed {
            host.redraw_line(self.caret.line());
        }
        changed
    }
}

impl Drop for TextEditor {
    fn drop(&mut self) {
        self.margin.detach(&mut self.caret, &mut self.document);
    }
}

impl std::fmt::Debug for TextEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEditor")
            .field("lines", &self.document.line_count())
            .field("caret", &self.caret.location())
            .field("selection", &self.selection.range())
            .finish_non_exhaustive()
    }
}
