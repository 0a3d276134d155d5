//! Controller-owned state and the shared context every sub-controller reads.
//!
//! All mutable interaction state lives in one [`BrowseState`] behind a
//! mutex. Sub-controllers lock it briefly, copy out what they need and
//! release it before calling the host, so host callbacks can never observe
//! a half-applied transition or deadlock on re-entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures_util::future::AbortHandle;
use lattice_browse_core::{CancelableTask, Clock, Point, Scheduler};
use parking_lot::{Mutex, RwLock};

use crate::config::{BrowseConfig, Orientation};
use crate::entity::{Entity, InsertPoint};
use crate::events::EventGateway;
use crate::payload::DragData;
use crate::selection::IndexSelection;
use crate::site::{Collaborators, DropLayout, GroupSource, ItemSource, ListSite, SelectionStore};

/// The entity under a pointer press that has not been released yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressedState {
    /// The pressed entity.
    pub entity: Entity,
    /// Pointer-down position in viewport coordinates.
    pub position: Point,
    /// The press started inside an interactive subtree of the item.
    pub in_interactive_subtree: bool,
}

/// A drag that originated in this list.
#[derive(Debug, Clone)]
pub(crate) struct DragSource {
    /// The items being moved.
    pub drag_set: IndexSelection,
    /// The pressed item was not selected; `drag_set` is synthetic.
    pub dragging_unselected: bool,
    /// Realized items currently carrying the drag-source visual.
    pub marked: Vec<usize>,
}

/// Per-entry hover bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HoverState {
    /// The one-shot enter probe has run for this entry.
    pub entered: bool,
    /// Movement over the list is acted upon.
    pub understood: bool,
    /// Last insert point reported to the host.
    pub last_insert_point: Option<InsertPoint>,
}

/// A drag in progress over (or out of) this list.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    /// Present when the drag started in this list.
    pub source: Option<DragSource>,
    /// The native payload.
    pub data: Arc<DragData>,
    pub hover: HoverState,
}

/// The pointer and drag lifecycle.
#[derive(Debug, Clone, Default)]
pub(crate) enum Interaction {
    #[default]
    Idle,
    Pressed(PressedState),
    Dragging(DragSession),
    /// A drag from this list was dropped; waiting for the drag to end.
    Dropped(Option<(DragSource, Arc<DragData>)>),
}

impl Interaction {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

/// Autoscroll loop bookkeeping.
#[derive(Debug)]
pub(crate) struct AutoScrollState {
    /// Signed rate in units per second; zero when idle.
    pub rate: f32,
    pub start_delay: CancelableTask,
    pub frame: CancelableTask,
    pub last_tick: Option<Instant>,
}

impl AutoScrollState {
    fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            rate: 0.0,
            start_delay: CancelableTask::new(scheduler.clone()),
            frame: CancelableTask::new(scheduler),
            last_tick: None,
        }
    }

    /// Stops the loop and any pending start.
    pub fn stop(&mut self) {
        self.rate = 0.0;
        self.start_delay.cancel();
        self.frame.cancel();
        self.last_tick = None;
    }
}

/// An in-flight focus navigation.
#[derive(Debug)]
pub(crate) struct PendingNavigation {
    pub generation: u64,
    pub handle: AbortHandle,
}

/// Everything the controller mutates.
#[derive(Debug)]
pub(crate) struct BrowseState {
    pub interaction: Interaction,
    pub navigation: Option<PendingNavigation>,
    pub navigation_generation: u64,
    pub drag_generation: u64,
    pub autoscroll: AutoScrollState,
    pub leave_timer: CancelableTask,
}

impl BrowseState {
    fn new(scheduler: &Arc<dyn Scheduler>) -> Self {
        Self {
            interaction: Interaction::Idle,
            navigation: None,
            navigation_generation: 0,
            drag_generation: 0,
            autoscroll: AutoScrollState::new(scheduler.clone()),
            leave_timer: CancelableTask::new(scheduler.clone()),
        }
    }
}

/// Collaborators, configuration and state shared by the sub-controllers.
pub(crate) struct Shared {
    config: RwLock<BrowseConfig>,
    pub site: Arc<dyn ListSite>,
    pub groups: Arc<dyn GroupSource>,
    pub selection: Arc<dyn SelectionStore>,
    pub items: Arc<dyn ItemSource>,
    pub layout: Arc<dyn DropLayout>,
    pub events: EventGateway,
    pub scheduler: Arc<dyn Scheduler>,
    pub clock: Arc<dyn Clock>,
    pub state: Mutex<BrowseState>,
    disposed: AtomicBool,
}

impl Shared {
    pub fn new(config: BrowseConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            site,
            groups,
            selection,
            items,
            layout,
            events,
            scheduler,
            clock,
        } = collaborators;
        Self {
            config: RwLock::new(config),
            site,
            groups,
            selection,
            items,
            layout,
            events: EventGateway::new(events),
            state: Mutex::new(BrowseState::new(&scheduler)),
            scheduler,
            clock,
            disposed: AtomicBool::new(false),
        }
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> BrowseConfig {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: BrowseConfig) {
        *self.config.write() = config;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Marks the controller disposed. Returns false if it already was.
    pub fn mark_disposed(&self) -> bool {
        !self.disposed.swap(true, Ordering::AcqRel)
    }

    /// Length of the viewport along the scrolling axis.
    pub fn viewport_length(&self) -> f32 {
        let size = self.site.viewport_size();
        match self.layout_direction().0 {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    /// Projects a viewport point onto the scrolling axis.
    ///
    /// Right-to-left layouts measure horizontal positions from the right
    /// edge.
    pub fn axis_position(&self, position: Point) -> f32 {
        match self.layout_direction() {
            (Orientation::Vertical, _) => position.y,
            (Orientation::Horizontal, true) => self.site.viewport_size().width - position.x,
            (Orientation::Horizontal, false) => position.x,
        }
    }

    /// Translates a viewport point into list coordinates.
    pub fn to_list_point(&self, position: Point) -> Point {
        let (orientation, rtl) = self.layout_direction();
        let mut x = position.x;
        let mut y = position.y;
        if rtl {
            x = self.site.viewport_size().width - x;
        }
        let scroll = self.site.scroll_position();
        match orientation {
            Orientation::Vertical => y += scroll,
            Orientation::Horizontal => x += scroll,
        }
        Point::new(x, y)
    }

    /// Orientation and right-to-left flag, copied out of the config lock.
    fn layout_direction(&self) -> (Orientation, bool) {
        let config = self.config.read();
        (config.orientation, config.right_to_left)
    }

    /// Inclusive upper bound of the item index space; -1 when empty.
    pub fn last_item_index(&self) -> i64 {
        self.site.item_count() as i64 - 1
    }
}
