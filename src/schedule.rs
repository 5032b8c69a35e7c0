//! Refit scheduling: coalesce bursts of container resizes into one recompute.
//!
//! The host owns the real frame clock. It implements [`Scheduler`] (or uses
//! the manual [`TaskQueue`]) and reports fired tasks back; the debouncer only
//! tracks which task is the live one.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::collections::VecDeque;

use crate::projection::Size;

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Something that can run a task on a later frame and cancel it before then.
pub trait Scheduler {
    /// Queue a task for the next frame.
    fn schedule(&mut self) -> TaskId;

    /// Cancel a queued task. Returns `false` if it already ran or never existed.
    fn cancel(&mut self, id: TaskId) -> bool;
}

/// FIFO task queue driven by explicit [`TaskQueue::drain`] calls.
#[derive(Debug, Default)]
pub struct TaskQueue {
    next_id: u64,
    pending: VecDeque<TaskId>,
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued task, oldest first, as one frame would run them.
    pub fn drain(&mut self) -> Vec<TaskId> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push_back(id);
        id
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| *t != id);
        self.pending.len() != before
    }
}

/// Keeps at most one refit pending and remembers the latest container size.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefitDebouncer {
    pending: Option<TaskId>,
    container: Option<Size>,
}

impl RefitDebouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resize to `container`, replacing any refit already queued.
    pub fn request<S: Scheduler>(&mut self, scheduler: &mut S, container: Size) {
        if let Some(old) = self.pending.take() {
            scheduler.cancel(old);
        }
        self.pending = Some(scheduler.schedule());
        self.container = Some(container);
    }

    /// A task ran. Returns the container size to refit for if it was the live one.
    pub fn fire(&mut self, id: TaskId) -> Option<Size> {
        if self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        self.container
    }

    /// Drop the pending refit, if any.
    pub fn cancel<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(old) = self.pending.take() {
            scheduler.cancel(old);
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
