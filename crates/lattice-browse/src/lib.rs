//! Browse-mode interaction controller for virtualized list views.
//!
//! This crate turns normalized pointer, keyboard and drag input into focus
//! changes, selection changes and drag-and-drop reordering. It renders
//! nothing and stores no data: layout, the data source, the selection
//! storage and the host's event handlers are injected as collaborators
//! (see [`site`]).
//!
//! # Architecture
//!
//! - [`BrowseMode`]: the facade the host feeds input into
//! - [`FocusNavigator`]: arrow, page, Home and End navigation across items,
//!   group headers and the list header and footer
//! - [`SelectionController`]: the cancelable, confirmable selection-changing
//!   protocol, range selection and select-all
//! - [`DragReorderController`]: drag lifecycle, insert-point tracking,
//!   drag-leave debounce and batched reorder commits
//! - autoscroll: edge-driven scrolling while dragging, timed by a
//!   [`Scheduler`](lattice_browse_core::Scheduler)
//! - [`EventGateway`]: logged dispatch of host notifications
//!
//! Timers and animation frames go through the scheduler abstraction in
//! `lattice-browse-core`, so tests drive time with a
//! [`ManualScheduler`](lattice_browse_core::ManualScheduler).
//!
//! # Logging
//!
//! Everything logs through `tracing` under the targets in
//! [`logging::targets`].

pub mod autoscroll;
mod browse;
pub mod config;
pub mod drag;
pub mod entity;
mod error;
pub mod events;
pub mod focus;
pub mod input;
pub mod payload;
pub mod select;
pub mod selection;
pub mod site;
mod state;

pub use lattice_browse_core::logging;

pub use browse::BrowseMode;
pub use config::{BrowseConfig, Orientation, TapBehavior};
pub use drag::{DRAG_LEAVE_DEBOUNCE, DragReorderController, find_first_available_insert_point};
pub use entity::{Entity, EntityKind, InsertPoint, RawTarget};
pub use error::{BrowseError, Result};
pub use events::{BrowseEvents, Decision, EventGateway, NoEvents, Rejected, Verdict};
pub use focus::{CommitOptions, FocusNavigator, NavigationOutcome};
pub use input::{Key, KeyEvent, KeyboardModifiers, NavKey, PointerEvent};
pub use payload::{DragData, DragEvent};
pub use select::{SelectIntent, SelectionController, SelectionPermission};
pub use selection::{IndexSelection, ItemKey, SelectionMode, SelectionRange};
pub use site::{
    Collaborators, DropLayout, EditBatch, FocusChange, GroupSource, ItemFlags, ItemSource,
    ListSite, SelectionStore, Ungrouped,
};
pub use state::PressedState;

static_assertions::assert_impl_all!(EventGateway: Send, Sync);
static_assertions::assert_impl_all!(IndexSelection: Send, Sync);
