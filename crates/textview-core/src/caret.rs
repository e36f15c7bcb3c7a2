/// The insertion caret and its change notifications.
use crate::document::Document;
use crate::events::{ListenerId, Listeners};
use crate::location::DocumentLocation;

/// Sent to caret subscribers whenever the location changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretChange {
    pub old_location: DocumentLocation,
    pub new_location: DocumentLocation,
    pub old_offset: usize,
    pub new_offset: usize,
    /// Whether the view should scroll the caret into sight for this move.
    pub auto_scroll: bool,
}

#[derive(Debug)]
pub struct Caret {
    location: DocumentLocation,
    offset: usize,
    /// Column kept while moving vertically across shorter lines.
    desired_column: Option<usize>,
    pub insert_mode: bool,
    pub visible: bool,
    /// While set, caret moves must not collapse the selection.
    pub preserve_selection: bool,
    pub auto_scroll_to_caret: bool,
    listeners: Listeners<CaretChange>,
}

impl Default for Caret {
    fn default() -> Self {
        Self {
            location: DocumentLocation::default(),
            offset: 0,
            desired_column: None,
            insert_mode: true,
            visible: true,
            preserve_selection: false,
            auto_scroll_to_caret: true,
            listeners: Listeners::default(),
        }
    }
}

impl Caret {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> DocumentLocation {
        self.location
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn desired_column(&self) -> usize {
        self.desired_column.unwrap_or(self.location.column)
    }

    /// Moves the caret, clamping to the document. Emits a [`CaretChange`]
    /// if the location actually changed.
    pub fn set_location(&mut self, doc: &Document, location: DocumentLocation) {
        self.desired_column = None;
        self.move_to(doc, location);
    }

    /// Like [`set_location`](Self::set_location) but keeps the desired
    /// column, for vertical movement.
    pub fn set_location_keep_column(&mut self, doc: &Document, location: DocumentLocation) {
        let desired = self.desired_column();
        self.move_to(doc, location);
        self.desired_column = Some(desired);
    }

    pub fn set_offset(&mut self, doc: &Document, offset: usize) {
        self.set_location(doc, doc.offset_to_location(offset));
    }

    pub fn set_to_document_end(&mut self, doc: &Document) {
        self.set_offset(doc, doc.len());
    }

    /// Re-clamps after the document changed underneath the caret.
    pub fn revalidate(&mut self, doc: &Document) {
        let location = doc.clamp_location(self.location);
        self.move_to(doc, location);
    }

    fn move_to(&mut self, doc: &Document, location: DocumentLocation) {
        let location = doc.clamp_location(location);
        let offset = doc.location_to_offset(location).unwrap_or(doc.len());
        if location == self.location && offset == self.offset {
            return;
        }
        let change = CaretChange {
            old_location: self.location,
            new_location: location,
            old_offset: self.offset,
            new_offset: offset,
            auto_scroll: self.auto_scroll_to_caret,
        };
        self.location = location;
        self.offset = offset;
        self.listeners.emit(&change);
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&CaretChange) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
