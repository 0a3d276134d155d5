//! Tracing targets used by lattice-browse.
//!
//! The crates log through `tracing` and never install a subscriber. Use these
//! targets in `EnvFilter` directives to narrow output to one subsystem:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_browse::drag=trace,lattice_browse::focus=debug")
//!     .init();
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Scheduler and cancelable-task target.
    pub const SCHEDULER: &str = "lattice_browse_core::scheduler";
    /// Keyboard focus navigation target.
    pub const FOCUS: &str = "lattice_browse::focus";
    /// Selection protocol target.
    pub const SELECTION: &str = "lattice_browse::selection";
    /// Drag, drop and reorder target.
    pub const DRAG: &str = "lattice_browse::drag";
    /// Autoscroll loop target.
    pub const AUTOSCROLL: &str = "lattice_browse::autoscroll";
    /// Host event dispatch target.
    pub const EVENTS: &str = "lattice_browse::events";
}
