//! Drawing and interaction for the text view: syntax chunks, fixed-width
//! layout, the line-by-line margin renderer and the editor controller that
//! ties caret, selection and bracket matching to a host widget.

pub mod blink;
mod cache;
pub mod chunk;
pub mod editor;
pub mod highlight;
pub mod host;
pub mod input;
pub mod layout;
pub mod margin;
pub mod redraw;
pub mod surface;
pub mod syntax;

pub use chunk::{Chunk, ChunkStyle};
pub use editor::TextEditor;
pub use highlight::{HighlightProvider, SyntaxChunker};
pub use host::{CursorShape, HostRequest, RecordingHost, ScrollOffset, ViewHost};
pub use input::{CaretMove, Modifiers, MouseButton};
pub use layout::TextLayout;
pub use margin::{MarginContext, TextViewMargin};
pub use surface::{DrawOp, RecordingSurface, Rect, Surface};
pub use syntax::SyntectHighlighter;
