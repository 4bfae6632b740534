//! Linear undo/redo over snapshots.
//!
//! `History<T>` keeps three pieces of state: the snapshots before the current
//! one (`past`, oldest first), the current snapshot (`present`) and the
//! snapshots that were undone (`future`, nearest first). Committing a new
//! snapshot clears `future`; there is no redo tree.
//!
//! Snapshots are owned values. Everything handed out is a clone, so a caller
//! mutating what it got back can never reach into the stored chain. For
//! `EventCollection` a clone is a full structural copy, dates included.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    present: T,
    future: VecDeque<T>,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        History {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    /// Commit a new snapshot as the result of a fresh user action.
    ///
    /// `past` grows without bound.
    pub fn push(&mut self, state: T) {
        let previous = std::mem::replace(&mut self.present, state);
        self.past.push(previous);
        self.future.clear();
    }

    /// Step back one snapshot. `None` (and no change) when there is nothing to undo.
    pub fn undo(&mut self) -> Option<T> {
        let previous = self.past.pop()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        Some(self.present.clone())
    }

    /// Step forward one snapshot. `None` (and no change) when there is nothing to redo.
    pub fn redo(&mut self) -> Option<T> {
        let next = self.future.pop_front()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        Some(self.present.clone())
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
