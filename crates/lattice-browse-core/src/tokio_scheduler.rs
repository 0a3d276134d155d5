//! Tokio-backed scheduler.
//!
//! Requires the `tokio` feature. Each callback becomes a spawned task that
//! sleeps for its delay; cancelling aborts the spawned task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::SlotMap;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Result, SchedulerError};
use crate::scheduler::{BoxedTask, ScheduledTaskId, Scheduler};

/// A [`Scheduler`] that runs callbacks on a Tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tasks: Arc<Mutex<SlotMap<ScheduledTaskId, Option<JoinHandle<()>>>>>,
}

impl TokioScheduler {
    /// Creates a scheduler bound to the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Creates a scheduler bound to the runtime of the calling context.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| SchedulerError::NoRuntime(err.to_string()))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxedTask) -> ScheduledTaskId {
        // Reserve the slot first so the spawned task can remove itself.
        let id = self.tasks.lock().insert(None);
        let tasks = self.tasks.clone();

        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if tasks.lock().remove(id).is_some() {
                task();
            }
        });

        if let Some(slot) = self.tasks.lock().get_mut(id) {
            *slot = Some(join);
        }
        id
    }

    fn cancel(&self, id: ScheduledTaskId) -> bool {
        match self.tasks.lock().remove(id) {
            Some(join) => {
                if let Some(join) = join {
                    join.abort();
                }
                true
            }
            None => false,
        }
    }

    fn is_scheduled(&self, id: ScheduledTaskId) -> bool {
        self.tasks.lock().contains_key(id)
    }
}
