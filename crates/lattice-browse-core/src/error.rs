//! Error types for lattice-browse-core.

/// Result type alias for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors raised by [`Scheduler`](crate::Scheduler) implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The task ID is invalid, has already fired, or was cancelled.
    #[error("invalid or expired scheduled task id")]
    InvalidTaskId,

    /// No async runtime was available to drive the scheduler.
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
}

/// A geometry query (offset, extent, adjacency) failed.
///
/// Produced by the host's layout collaborators. The browse-mode controller
/// still applies focus changes on a best-effort basis before forwarding it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("geometry query failed: {message}")]
pub struct GeometryError {
    message: String,
}

impl GeometryError {
    /// Creates a geometry error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
