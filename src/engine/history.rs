use crate::domain::{ActionLabel, Task};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Default number of undo steps kept
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// One mutation of the task list as independent before/after copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: ActionLabel,
    pub before: Vec<Task>,
    pub after: Vec<Task>,
}

/// Undo/redo collaborator notified after every mutation
pub trait History {
    fn record(&mut self, entry: HistoryEntry);

    /// Take the most recent entry to revert, if the collaborator keeps one
    fn undo(&mut self) -> Option<HistoryEntry> {
        None
    }

    /// Take the most recently reverted entry to re-apply
    fn redo(&mut self) -> Option<HistoryEntry> {
        None
    }
}

/// Bounded undo/redo stacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoHistory {
    limit: usize,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Label of the step `undo` would revert
    pub fn undo_label(&self) -> Option<ActionLabel> {
        self.undo_stack.last().map(|e| e.label)
    }

    fn trim(&mut self) {
        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl History for UndoHistory {
    fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        self.trim();
    }

    fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        self.trim();
        Some(entry)
    }
}

/// Shared handle to an [`UndoHistory`]; clones see the same stacks
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Rc<RefCell<UndoHistory>>,
}

impl SharedHistory {
    pub fn new(history: UndoHistory) -> Self {
        Self {
            inner: Rc::new(RefCell::new(history)),
        }
    }

    /// Copy of the current stacks (for saving)
    pub fn snapshot(&self) -> UndoHistory {
        self.inner.borrow().clone()
    }

    pub fn undo_label(&self) -> Option<ActionLabel> {
        self.inner.borrow().undo_label()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.borrow().undo_stack.clone()
    }
}

impl History for SharedHistory {
    fn record(&mut self, entry: HistoryEntry) {
        self.inner.borrow_mut().record(entry);
    }

    fn undo(&mut self) -> Option<HistoryEntry> {
        self.inner.borrow_mut().undo()
    }

    fn redo(&mut self) -> Option<HistoryEntry> {
        self.inner.borrow_mut().redo()
    }
}
