//! The drawing capability the margin paints through.

use std::fmt;

use anyhow::Result;
use textview_config::HexColor;

use crate::chunk::ChunkStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Backend-neutral drawing primitives.
pub trait Surface {
    /// Acquires whatever the backend needs before drawing. A failure
    /// disables the margin until its options change.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_clip(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: HexColor);

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: HexColor);

    /// Draws `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: ChunkStyle);

    /// Outlines `rect` with its right and bottom edges inclusive.
    fn stroke_rect(&mut self, rect: Rect, color: HexColor) {
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.draw_line((l, t), (r, t), color);
        self.draw_line((r, t), (r, b), color);
        self.draw_line((r, b), (l, b), color);
        self.draw_line((l, b), (l, t), color);
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clip(Rect),
    Fill(Rect, HexColor),
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: HexColor,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        style: ChunkStyle,
    },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::Clip(r) => write!(f, "clip  {},{} {}x{}", r.x, r.y, r.width, r.height),
            DrawOp::Fill(r, c) => write!(
                f,
                "fill  {},{} {}x{} {}",
                r.x,
                r.y,
                r.width,
                r.height,
                c.to_hex()
            ),
            DrawOp::Line { from, to, color } => write!(
                f,
                "line  {},{} -> {},{} {}",
                from.0,
                from.1,
                to.0,
                to.1,
                color.to_hex()
            ),
            DrawOp::Text { x, y, text, style } => {
                write!(f, "text  {x},{y} {text:?} {}", style.color.to_hex())?;
                if style.bold {
                    write!(f, " bold")?;
                }
                if style.italic {
                    write!(f, " italic")?;
                }
                Ok(())
            }
        }
    }
}

/// A surface that records every call, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    /// When set, `prepare` fails with this message.
    pub fail_prepare: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Text of every `draw_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(Rect, HexColor)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill(r, c) => Some((*r, *c)),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<((i32, i32), (i32, i32), HexColor)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, color } => Some((*from, *to, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn prepare(&mut self) -> Result<()> {
        match &self.fail_prepare {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok(()),
        }
    }

    fn set_clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: HexColor) {
        self.ops.push(DrawOp::Fill(rect, color));
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: HexColor) {
        self.ops.push(DrawOp::Line { from, to, color });
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: ChunkStyle) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
        });
    }
}
