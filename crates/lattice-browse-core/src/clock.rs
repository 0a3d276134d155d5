//! Time sources.

use std::time::Instant;

/// A monotonic time source.
///
/// Loops that must track real elapsed time (autoscroll) read the clock on
/// every tick instead of trusting the nominal callback interval.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
