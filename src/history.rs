use crate::element::{Mark, MarkId};

/// What an undo, redo or clear actually did.
///
/// Nothing-to-do cases are reported here rather than as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryReport {
    /// An in-progress stroke or sticker drag was discarded; history untouched
    DiscardedConstruction,
    /// The last committed mark moved onto the redo buffer
    SteppedBack,
    /// The last undone mark moved back into the document
    SteppedForward,
    NothingToUndo,
    NothingToRedo,
    Cleared,
}

impl HistoryReport {
    /// Whether the report describes a change the user can see
    pub fn changed_anything(self) -> bool {
        !matches!(self, Self::NothingToUndo | Self::NothingToRedo)
    }
}

/// The ordered list of committed marks plus the marks undone since the last commit.
///
/// Undo and redo move whole marks between two LIFO stacks. Marks are never
/// mutated once committed (a dragged sticker is the one exception, and its
/// drag ends before anything else can touch history), so no inverse
/// operations are needed.
#[derive(Debug, Clone, Default)]
pub struct DocumentHistory {
    /// Insertion order is z-order: later marks are drawn on top
    committed: Vec<Mark>,
    /// Marks that can be redone, most recently undone last
    redo_buffer: Vec<Mark>,
}

impl DocumentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly drawn mark and drop any stale redo entries
    pub fn commit(&mut self, mark: Mark) {
        log::debug!("Committing {} {}", mark.kind(), mark.id());
        self.committed.push(mark);
        self.redo_buffer.clear();
    }

    /// Move the last committed mark onto the redo buffer
    pub fn undo(&mut self) -> HistoryReport {
        match self.committed.pop() {
            Some(mark) => {
                log::info!("Undo {} {}", mark.kind(), mark.id());
                self.redo_buffer.push(mark);
                HistoryReport::SteppedBack
            }
            None => HistoryReport::NothingToUndo,
        }
    }

    /// Move the most recently undone mark back into the document.
    ///
    /// This bypasses [`Self::commit`] so the remaining redo entries survive.
    pub fn redo(&mut self) -> HistoryReport {
        match self.redo_buffer.pop() {
            Some(mark) => {
                log::info!("Redo {} {}", mark.kind(), mark.id());
                self.committed.push(mark);
                HistoryReport::SteppedForward
            }
            None => HistoryReport::NothingToRedo,
        }
    }

    /// Forget everything, including the redo buffer
    pub fn clear(&mut self) {
        log::info!(
            "Clearing history ({} committed, {} redoable)",
            self.committed.len(),
            self.redo_buffer.len()
        );
        self.committed.clear();
        self.redo_buffer.clear();
    }

    pub fn committed(&self) -> &[Mark] {
        &self.committed
    }

    pub fn redo_buffer(&self) -> &[Mark] {
        &self.redo_buffer
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.committed.iter().find(|mark| mark.id() == id)
    }

    /// In-place access for dragging a sticker that is already committed
    pub(crate) fn mark_mut(&mut self, id: MarkId) -> Option<&mut Mark> {
        self.committed.iter_mut().rev().find(|mark| mark.id() == id)
    }
}
