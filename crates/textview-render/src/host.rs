//! The view host: scrolling, focus and redraw requests.

use textview_core::DocumentLocation;

/// Scroll position of the view in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Default,
    Text,
}

/// Services the text view needs from the widget that hosts it.
pub trait ViewHost {
    fn scroll_offset(&self) -> ScrollOffset;

    /// Width and height of the visible area in pixels.
    fn viewport_size(&self) -> (i32, i32);

    fn has_focus(&self) -> bool;

    fn redraw_line(&mut self, line: usize);

    /// Redraws lines `first..=last`.
    fn redraw_lines(&mut self, first: usize, last: usize);

    /// A line wider than any seen before was drawn.
    fn recompute_horizontal_extent(&mut self, widest: i32);

    fn scroll_to_caret(&mut self, location: DocumentLocation);

    fn set_cursor_shape(&mut self, shape: CursorShape);

    /// Middle-click paste of the primary selection at `offset`.
    fn paste_primary(&mut self, _offset: usize) {}

    fn report_error(&mut self, error: &anyhow::Error);
}

/// A request received by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    RedrawLine(usize),
    RedrawLines(usize, usize),
    HorizontalExtent(i32),
    ScrollToCaret(DocumentLocation),
    CursorShape(CursorShape),
    PastePrimary(usize),
    Error(String),
}

/// Host that records requests; used headless and in tests.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub scroll: ScrollOffset,
    pub viewport: (i32, i32),
    pub focused: bool,
    pub requests: Vec<HostRequest>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            scroll: ScrollOffset::default(),
            viewport: (800, 600),
            focused: true,
            requests: Vec::new(),
        }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `line` was requested individually or within a range.
    pub fn was_redrawn(&self, line: usize) -> bool {
        self.requests.iter().any(|r| match *r {
            HostRequest::RedrawLine(l) => l == line,
            HostRequest::RedrawLines(a, b) => a <= line && line <= b,
            _ => false,
        })
    }
}

impl ViewHost for RecordingHost {
    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    fn viewport_size(&self) -> (i32, i32) {
        self.viewport
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn redraw_line(&mut self, line: usize) {
        self.requests.push(HostRequest::RedrawLine(line));
    }

    fn redraw_lines(&mut self, first: usize, last: usize) {
        self.requests.push(HostRequest::RedrawLines(first, last));
    }

    fn recompute_horizontal_extent(&mut self, widest: i32) {
        self.requests.push(HostRequest::HorizontalExtent(widest));
    }

    fn scroll_to_caret(&mut self, location: DocumentLocation) {
        self.requests.push(HostRequest::ScrollToCaret(location));
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.requests.push(HostRequest::CursorShape(shape));
    }

    fn paste_primary(&mut self, offset: usize) {
        self.requests.push(HostRequest::PastePrimary(offset));
    }

    fn report_error(&mut self, error: &anyhow::Error) {
        self.requests.push(HostRequest::Error(format!("{error:#}")));
    }
}
