//! Delayed and per-frame callback scheduling.
//!
//! The browse-mode controller never talks to timers or animation frames
//! directly. It schedules boxed callbacks through the [`Scheduler`] trait so
//! hosts can plug in their own event loop, and tests can drive time by hand
//! with [`ManualScheduler`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//!
//! use lattice_browse_core::{ManualScheduler, Scheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let flag = fired.clone();
//!
//! let id = scheduler.schedule(
//!     Duration::from_millis(50),
//!     Box::new(move || flag.store(true, Ordering::SeqCst)),
//! );
//! assert!(scheduler.is_scheduled(id));
//!
//! scheduler.advance(Duration::from_millis(50));
//! assert!(fired.load(Ordering::SeqCst));
//! assert!(!scheduler.is_scheduled(id));
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::clock::Clock;
use crate::error::{Result, SchedulerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled callback.
    pub struct ScheduledTaskId;
}

/// Nominal interval between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A boxed one-shot callback.
pub type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules one-shot callbacks.
///
/// Implementations must not hold internal locks while a callback runs:
/// callbacks routinely schedule or cancel other callbacks.
pub trait Scheduler: Send + Sync {
    /// Runs `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: BoxedTask) -> ScheduledTaskId;

    /// Runs `task` on the next animation frame.
    fn request_frame(&self, task: BoxedTask) -> ScheduledTaskId {
        self.schedule(FRAME_INTERVAL, task)
    }

    /// Cancels a pending callback.
    ///
    /// Returns `true` if the callback was still pending.
    fn cancel(&self, id: ScheduledTaskId) -> bool;

    /// Returns true if the callback has neither fired nor been cancelled.
    fn is_scheduled(&self, id: ScheduledTaskId) -> bool;
}

/// Internal pending-callback data.
struct PendingTask {
    /// Virtual time at which the task runs.
    run_at: Duration,
    task: BoxedTask,
}

/// An entry in the run queue (min-heap by run time, then insertion order).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: ScheduledTaskId,
    run_at: Duration,
    sequence: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_at == other.run_at && self.sequence == other.sequence
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct ManualInner {
    /// Instant corresponding to virtual time zero.
    origin: Instant,
    /// Virtual time elapsed since `origin`.
    elapsed: Duration,
    tasks: SlotMap<ScheduledTaskId, PendingTask>,
    queue: BinaryHeap<QueueEntry>,
    next_sequence: u64,
}

/// A deterministic virtual-time scheduler.
///
/// Nothing runs until [`advance`](Self::advance) is called. Time only moves
/// forward through `advance`, and the scheduler doubles as the [`Clock`] so
/// elapsed-time measurements observe the same virtual timeline.
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

impl ManualScheduler {
    /// Creates a scheduler whose virtual clock starts now.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ManualInner {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                tasks: SlotMap::with_key(),
                queue: BinaryHeap::new(),
                next_sequence: 0,
            }),
        }
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }

    /// Number of callbacks still pending.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Time remaining until a pending callback runs.
    pub fn remaining(&self, id: ScheduledTaskId) -> Result<Duration> {
        let inner = self.inner.lock();
        inner
            .tasks
            .get(id)
            .map(|task| task.run_at.saturating_sub(inner.elapsed))
            .ok_or(SchedulerError::InvalidTaskId)
    }

    /// Runs every callback that is due at the current virtual time.
    pub fn run_pending(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Moves virtual time forward by `by`, running due callbacks in order.
    ///
    /// Callbacks scheduled while advancing run in the same call if they fall
    /// due before the target time. Returns the number of callbacks run.
    #[tracing::instrument(skip(self), target = "lattice_browse_core::scheduler", level = "trace")]
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.lock().elapsed + by;
        let mut ran = 0;

        loop {
            let task = {
                let mut inner = self.inner.lock();
                let Some(entry) = inner.queue.peek().copied() else {
                    break;
                };
                if entry.run_at > target {
                    break;
                }
                inner.queue.pop();

                // Cancelled tasks leave stale queue entries behind.
                let Some(pending) = inner.tasks.remove(entry.id) else {
                    continue;
                };
                if pending.run_at > inner.elapsed {
                    inner.elapsed = pending.run_at;
                }
                pending.task
            };

            tracing::trace!(target: targets::SCHEDULER, "running scheduled task");
            task();
            ran += 1;
        }

        let mut inner = self.inner.lock();
        if target > inner.elapsed {
            inner.elapsed = target;
        }
        ran
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: BoxedTask) -> ScheduledTaskId {
        let mut inner = self.inner.lock();
        let run_at = inner.elapsed + delay;
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;

        let id = inner.tasks.insert(PendingTask { run_at, task });
        inner.queue.push(QueueEntry {
            id,
            run_at,
            sequence,
        });
        id
    }

    fn cancel(&self, id: ScheduledTaskId) -> bool {
        self.inner.lock().tasks.remove(id).is_some()
    }

    fn is_scheduled(&self, id: ScheduledTaskId) -> bool {
        self.inner.lock().tasks.contains_key(id)
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> Instant {
        let inner = self.inner.lock();
        inner.origin + inner.elapsed
    }
}

static_assertions::assert_impl_all!(ManualScheduler: Send, Sync);
