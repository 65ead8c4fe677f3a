use std::collections::VecDeque;

use crate::models::settings::DEFAULT_HISTORY_CAPACITY;

/// Bounded undo/redo stacks over opaque snapshots.
///
/// Both stacks hold at most `capacity` snapshots; pushing onto a full stack
/// drops its oldest entry. A capacity of zero disables history entirely.
#[derive(Debug, Clone)]
pub struct History<S> {
    past: VecDeque<S>,
    future: VecDeque<S>,
    capacity: usize,
}

impl<S> History<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            capacity,
        }
    }

    /// Remember `previous` as the state before a committed change.
    /// Any redo history is discarded.
    pub fn record(&mut self, previous: S) {
        push_bounded(&mut self.past, previous, self.capacity);
        self.future.clear();
    }

    /// Step back: returns the snapshot to restore and keeps `current` for redo.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.past.pop_back()?;
        push_bounded(&mut self.future, current, self.capacity);
        Some(previous)
    }

    /// Step forward again: returns the snapshot to restore and keeps
    /// `current` for undo.
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.future.pop_back()?;
        push_bounded(&mut self.past, current, self.capacity);
        Some(next)
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
    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

fn push_bounded<S>(stack: &mut VecDeque<S>, item: S, capacity: usize) {
    if capacity == 0 {
        return;
    }
    while stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(item);
}
