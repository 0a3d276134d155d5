//! Owned handles for a single pending callback.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::scheduler::{ScheduledTaskId, Scheduler};

/// A handle owning at most one pending callback on a [`Scheduler`].
///
/// Debounce timers, start delays and frame loops each keep one of these.
/// Scheduling through a handle that is already pending replaces the previous
/// callback, so two copies of the same loop can never run side by side.
/// Dropping the handle does not cancel the callback; owners cancel
/// explicitly on disposal.
pub struct CancelableTask {
    scheduler: Arc<dyn Scheduler>,
    id: Option<ScheduledTaskId>,
}

impl CancelableTask {
    /// Creates an idle handle.
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            id: None,
        }
    }

    /// Schedules `task` after `delay` unless a callback is already pending.
    ///
    /// Returns `false` (and drops `task`) if one was pending.
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_pending() {
            return false;
        }
        self.id = Some(self.scheduler.schedule(delay, Box::new(task)));
        true
    }

    /// Cancels any pending callback and schedules `task` after `delay`.
    pub fn reschedule<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.id = Some(self.scheduler.schedule(delay, Box::new(task)));
    }

    /// Cancels any pending callback and runs `task` on the next frame.
    pub fn request_frame<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.id = Some(self.scheduler.request_frame(Box::new(task)));
    }

    /// Cancels the pending callback, if any.
    ///
    /// Returns `true` if a callback was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.id.take() {
            Some(id) => self.scheduler.cancel(id),
            None => false,
        }
    }

    /// Returns true if a callback is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.id.is_some_and(|id| self.scheduler.is_scheduled(id))
    }

    /// The ID of the most recently scheduled callback.
    pub fn id(&self) -> Option<ScheduledTaskId> {
        self.id
    }
}

impl fmt::Debug for CancelableTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelableTask")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}
