//! Snapshot-based undo/redo.

use crate::node::{Edge, Node};
use crate::store::NodeStore;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A deep copy of the board's nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Undo and redo stacks of snapshots.
///
/// Callers checkpoint once before an operation starts (delete, paste, shape
/// creation), never on intermediate pointer moves. Gestures that may end
/// without changing anything stage their snapshot with
/// [`History::stage`] and only push it through [`History::commit_staged`].
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest first.
    past: VecDeque<HistorySnapshot>,
    /// Next redo first.
    future: VecDeque<HistorySnapshot>,
    /// Snapshot taken at the start of an edit that has not changed anything yet.
    staged: Option<HistorySnapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo states.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            staged: None,
            limit: limit.max(1),
        }
    }

    /// Record the current state before a change. Clears the redo stack.
    pub fn checkpoint<S: NodeStore + ?Sized>(&mut self, store: &S) {
        self.push(store.snapshot());
    }

    fn push(&mut self, snapshot: HistorySnapshot) {
        self.past.push_back(snapshot);
        self.future.clear();
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        log::debug!("History checkpoint ({} undo states)", self.past.len());
    }

    /// Remember the current state without touching either stack. Replaces
    /// any earlier staged snapshot.
    pub fn stage<S: NodeStore + ?Sized>(&mut self, store: &S) {
        self.staged = Some(store.snapshot());
    }

    /// Push the staged snapshot as a checkpoint, clearing the redo stack.
    /// Returns false if nothing was staged.
    pub fn commit_staged(&mut self) -> bool {
        match self.staged.take() {
            Some(snapshot) => {
                self.push(snapshot);
                true
            }
            None => false,
        }
    }

    /// Forget the staged snapshot.
    pub fn drop_staged(&mut self) {
        self.staged = None;
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Restore the previous state.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo<S: NodeStore + ?Sized>(&mut self, store: &mut S) -> bool {
        let Some(snapshot) = self.past.pop_back() else {
            return false;
        };
        self.future.push_front(store.snapshot());
        store.restore(snapshot);
        log::debug!("Undo ({} left)", self.past.len());
        true
    }

    /// Re-apply the last undone state.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo<S: NodeStore + ?Sized>(&mut self, store: &mut S) -> bool {
        let Some(snapshot) = self.future.pop_front() else {
            return false;
        };
        self.past.push_back(store.snapshot());
        store.restore(snapshot);
        log::debug!("Redo ({} left)", self.future.len());
        true
    }

    /// Drop the most recent checkpoint without restoring it.
    ///
    /// Used when a gesture is cancelled after its state was already reverted.
    pub fn discard_last(&mut self) -> Option<HistorySnapshot> {
        self.past.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget all undo and redo states.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.staged = None;
    }
}
