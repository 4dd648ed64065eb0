//! Linear undo/redo over whole-collection snapshots.
//!
//! `History` owns the authoritative element list for an editing session.
//! Every discrete edit goes through [`History::push`], which files the
//! previous collection under `past` and drops any redo branch. Undo and redo
//! shuttle snapshots between the two stacks; neither ever loses one, so
//! `past.len() + 1 + future.len()` is constant across them.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::doc::Element;

/// Past/present/future snapshots of the element collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    past: Vec<Vec<Element>>,
    present: Vec<Element>,
    /// Front is the next state `redo` restores.
    future: VecDeque<Vec<Element>>,
}

impl History {
    /// Start a history at `present` with nothing to undo or redo.
    #[must_use]
    pub fn new(present: Vec<Element>) -> Self {
        Self { past: Vec::new(), present, future: VecDeque::new() }
    }

    /// The current collection.
    #[must_use]
    pub fn present(&self) -> &[Element] {
        &self.present
    }

    /// Record an edit: the current collection moves to `past` and
    /// `new_present` takes its place. Clears the redo branch.
    pub fn push(&mut self, new_present: Vec<Element>) {
        let previous = std::mem::replace(&mut self.present, new_present);
        self.past.push(previous);
        self.future.clear();
    }

    /// Step back one edit. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Re-apply the most recently undone edit. Returns `false` if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Replace everything with a fresh collection and empty stacks.
    pub fn reset(&mut self, present: Vec<Element>) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }
}
