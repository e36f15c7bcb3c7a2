//! Document and interaction model for the text view: rope-backed text with
//! line segments, folds and markers, plus the caret and selection state.

pub mod bracket;
pub mod buffer;
pub mod caret;
pub mod document;
pub mod events;
pub mod folding;
pub mod location;
pub mod markers;
pub mod selection;
pub mod word;

pub use caret::{Caret, CaretChange};
pub use document::{Document, DocumentChange, LineSegment};
pub use events::{ListenerId, Listeners};
pub use folding::{FoldId, FoldSegment};
pub use location::DocumentLocation;
pub use markers::{MarkerKind, TextMarker};
pub use selection::{Segment, Selection};
