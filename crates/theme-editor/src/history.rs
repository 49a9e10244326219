//! Edit history
//!
//! Linear undo/redo over [`EditOperation`]s. `applied` is the undo stack and
//! is replayed over the stored theme on every read; `undone` is the redo
//! stack. Any new edit clears the redo stack. Discarding all edits moves the
//! whole undo stack onto the redo stack as one batch, so a single redo
//! restores everything.

use crate::edit::{replay, EditOperation, ThemeProjection};

/// An entry of the redo stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// One undone operation
    Single(EditOperation),
    /// Every operation dropped by one discard, in original order
    Batch(Vec<EditOperation>),
}

impl HistoryEntry {
    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            HistoryEntry::Single(op) => op.description(),
            HistoryEntry::Batch(ops) if ops.len() == 1 => ops[0].description(),
            HistoryEntry::Batch(ops) => format!("Restore {} discarded edits", ops.len()),
        }
    }
}

/// Whether there are pending edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// No pending edits
    Clean,
    /// At least one pending edit
    Dirty,
}

/// Undo and redo stacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditHistory {
    applied: Vec<EditOperation>,
    undone: Vec<HistoryEntry>,
}

impl EditHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new edit; clears the redo stack
    pub fn apply_edit(&mut self, op: EditOperation) {
        tracing::debug!(edit = %op, "applied edit");
        self.applied.push(op);
        self.undone.clear();
    }

    /// Undo the most recent edit. Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.applied.pop() {
            Some(op) => {
                self.undone.push(HistoryEntry::Single(op));
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone entry. Returns false when there is
    /// nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(HistoryEntry::Single(op)) => {
                self.applied.push(op);
                true
            }
            Some(HistoryEntry::Batch(ops)) => {
                self.applied.extend(ops);
                true
            }
            None => false,
        }
    }

    /// Move every pending edit onto the redo stack as one batch
    pub fn discard_all(&mut self) -> bool {
        if self.applied.is_empty() {
            return false;
        }
        let batch = std::mem::take(&mut self.applied);
        self.undone.push(HistoryEntry::Batch(batch));
        true
    }

    /// Forget both stacks (after a successful save)
    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    /// Current state
    pub fn state(&self) -> EditState {
        if self.applied.is_empty() {
            EditState::Clean
        } else {
            EditState::Dirty
        }
    }

    /// Whether there is anything to undo
    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Whether there is anything to redo
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Description of the edit `undo` would revert
    pub fn undo_description(&self) -> Option<String> {
        self.applied.last().map(EditOperation::description)
    }

    /// Description of the entry `redo` would restore
    pub fn redo_description(&self) -> Option<String> {
        self.undone.last().map(HistoryEntry::description)
    }

    /// Pending edits in application order
    pub fn applied(&self) -> &[EditOperation] {
        &self.applied
    }

    /// Redo stack, most recent last
    pub fn undone(&self) -> &[HistoryEntry] {
        &self.undone
    }

    /// Replay pending edits over a stored projection
    pub fn project(&self, base: &ThemeProjection) -> ThemeProjection {
        replay(base, &self.applied)
    }
}
