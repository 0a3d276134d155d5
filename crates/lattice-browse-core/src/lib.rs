//! Core systems for lattice-browse.
//!
//! This crate provides the runtime-independent building blocks the browse-mode
//! controller is written against:
//!
//! - **Scheduling**: the [`Scheduler`] trait for delayed and per-frame
//!   callbacks, and [`CancelableTask`], an owned handle that can schedule,
//!   reschedule and cancel one pending callback
//! - **Clocks**: the [`Clock`] trait used to measure real elapsed time
//! - **Manual scheduling**: [`ManualScheduler`], a deterministic virtual-time
//!   scheduler for tests and headless hosts
//! - **Geometry**: the small value types shared with collaborators
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! use lattice_browse_core::{CancelableTask, ManualScheduler};
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let fired = Arc::new(AtomicUsize::new(0));
//!
//! let mut debounce = CancelableTask::new(scheduler.clone());
//! let counter = fired.clone();
//! debounce.schedule(Duration::from_millis(40), move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! scheduler.advance(Duration::from_millis(39));
//! assert_eq!(fired.load(Ordering::SeqCst), 0);
//! scheduler.advance(Duration::from_millis(1));
//! assert_eq!(fired.load(Ordering::SeqCst), 1);
//! ```

mod clock;
mod error;
pub mod geometry;
pub mod logging;
mod scheduler;
mod task;
#[cfg(feature = "tokio")]
mod tokio_scheduler;

pub use clock::{Clock, SystemClock};
pub use error::{GeometryError, Result, SchedulerError};
pub use geometry::{Extent, Point, Size};
pub use scheduler::{BoxedTask, FRAME_INTERVAL, ManualScheduler, ScheduledTaskId, Scheduler};
pub use task::CancelableTask;
#[cfg(feature = "tokio")]
pub use tokio_scheduler::TokioScheduler;
