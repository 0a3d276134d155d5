//! Collaborator interfaces consumed by the browse-mode controller.
//!
//! The controller owns no layout, rendering, data or selection storage. It
//! reaches all of them through the narrow traits in this module, injected
//! once through [`Collaborators`]:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`ListSite`] | counts, adjacency, extents, scroll position, focus primitive, realized-item flags |
//! | [`GroupSource`] | group count and item to group lookup |
//! | [`SelectionStore`] | the live selection, pivot and focused entity |
//! | [`ItemSource`] | item keys and batched move transactions |
//! | [`DropLayout`] | insert-point hit testing and the insertion indicator |
//!
//! Every method is synchronous except the geometry queries, which return
//! boxed futures because layouts may need to realize items first.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use lattice_browse_core::{Clock, Extent, GeometryError, Point, Scheduler, Size};

use crate::entity::{Entity, InsertPoint, RawTarget};
use crate::events::BrowseEvents;
use crate::input::NavKey;
use crate::selection::{IndexSelection, ItemKey, SelectionRange};

/// A pending geometry query.
pub type GeometryFuture<T> = BoxFuture<'static, Result<T, GeometryError>>;

/// How the host should apply a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusChange {
    /// Scroll to this position along the scrolling axis before focusing.
    pub scroll_to: Option<f32>,
    /// The change came from the keyboard (show the focus rectangle).
    pub keyboard: bool,
    /// Bring the entity into view.
    pub ensure_visible: bool,
}

/// Per-item flags only known for realized items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// The item opts out of selection.
    pub non_selectable: bool,
    /// The item opts out of dragging.
    pub non_draggable: bool,
}

/// The view: geometry, scrolling, focus and realized items.
pub trait ListSite: Send + Sync {
    /// Number of items in the list.
    fn item_count(&self) -> usize;

    /// Returns true if the list has a header.
    fn has_list_header(&self) -> bool {
        false
    }

    /// Returns true if the list has a footer.
    fn has_list_footer(&self) -> bool {
        false
    }

    /// The geometric neighbour of `from` in `direction`.
    ///
    /// Only called for arrow and page keys. The result may be out of range.
    fn adjacent(&self, from: Entity, direction: NavKey) -> GeometryFuture<RawTarget>;

    /// The extent of `entity` along the scrolling axis, in canvas coordinates.
    fn entity_extent(&self, entity: Entity) -> GeometryFuture<Extent>;

    /// Current scroll position.
    fn scroll_position(&self) -> f32;

    /// Largest valid scroll position.
    fn max_scroll_position(&self) -> f32;

    /// Moves the scroll position.
    fn set_scroll_position(&self, position: f32);

    /// Size of the scrolling viewport.
    fn viewport_size(&self) -> Size;

    /// Moves visual focus to `entity`.
    fn change_focus(&self, entity: Entity, change: FocusChange);

    /// Scrolls `entity` into view.
    fn ensure_visible(&self, entity: Entity);

    /// Indices of the currently realized items.
    fn realized_items(&self) -> Vec<usize>;

    /// Flags of a realized item, or `None` if the item is not realized.
    fn item_flags(&self, index: usize) -> Option<ItemFlags>;

    /// Adds or removes the drag-source visual on a realized item.
    fn set_drag_source(&self, index: usize, marked: bool);

    /// Returns true while a transition animation is running.
    fn is_animating(&self) -> bool {
        false
    }
}

/// Group structure of the list.
pub trait GroupSource: Send + Sync {
    /// Number of groups; 0 for an ungrouped list.
    fn group_count(&self) -> usize;

    /// The group holding item `index`.
    fn group_of_item(&self, index: usize) -> Option<usize>;

    /// Returns true if the list is grouped.
    fn is_grouped(&self) -> bool {
        self.group_count() > 0
    }
}

/// A [`GroupSource`] for lists without groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ungrouped;

impl GroupSource for Ungrouped {
    fn group_count(&self) -> usize {
        0
    }

    fn group_of_item(&self, _index: usize) -> Option<usize> {
        None
    }
}

/// The live selection, pivot and focused entity.
pub trait SelectionStore: Send + Sync {
    /// A detached copy of the current selection.
    fn snapshot(&self) -> IndexSelection;

    /// Checks if an item is selected.
    fn is_included(&self, index: usize) -> bool {
        self.snapshot().contains(index)
    }

    /// Returns true for the select-all state.
    fn is_everything(&self) -> bool {
        self.snapshot().is_everything()
    }

    /// Adds ranges to the selection in one operation.
    fn add_ranges(&self, ranges: &[SelectionRange]);

    /// Replaces the selection with `ranges` in one operation.
    fn set_ranges(&self, ranges: &[SelectionRange]);

    /// Removes indices from the selection.
    fn remove_indices(&self, indices: &[usize]);

    /// Removes the item identified by `key`.
    fn remove_key(&self, key: &ItemKey);

    /// Replaces the selection with the items from `first` to `last` by key.
    fn set_key_range(&self, first: &ItemKey, last: &ItemKey);

    /// Deselects everything.
    fn clear(&self);

    /// Selects everything.
    fn select_all(&self);

    /// The shift-range anchor.
    fn pivot(&self) -> Option<usize>;

    /// Sets or clears the shift-range anchor.
    fn set_pivot(&self, pivot: Option<usize>);

    /// The focused entity.
    fn focused(&self) -> Entity;

    /// Records the focused entity.
    fn set_focused(&self, entity: Entity);
}

/// The ordered data source.
pub trait ItemSource: Send + Sync {
    /// The stable key of the item at `index`.
    fn key_at(&self, index: usize) -> Option<ItemKey>;

    /// Opens a batched edit transaction.
    fn begin_edits(&self) -> Box<dyn EditBatch + '_>;
}

/// A batched edit transaction on the data source.
///
/// Moves are keyed by item identity and take effect as one change when the
/// batch ends.
pub trait EditBatch {
    /// Moves `key` to the start of the list.
    fn move_to_start(&mut self, key: &ItemKey);

    /// Moves `key` directly before `anchor`.
    fn move_before(&mut self, key: &ItemKey, anchor: &ItemKey);

    /// Moves `key` directly after `anchor`.
    fn move_after(&mut self, key: &ItemKey, anchor: &ItemKey);

    /// Commits the batch.
    fn end_edits(self: Box<Self>);
}

/// Insert-point hit testing and the insertion indicator.
pub trait DropLayout: Send + Sync {
    /// The insert point nearest `position` (list coordinates).
    fn hit_test(&self, position: Point) -> InsertPoint;

    /// Shows the insertion indicator for `insert_point`.
    fn drag_over(&self, position: Point, insert_point: InsertPoint);

    /// Hides the insertion indicator.
    fn drag_leave(&self);
}

/// Everything the controller is wired to.
#[derive(Clone)]
pub struct Collaborators {
    /// The view.
    pub site: Arc<dyn ListSite>,
    /// Group structure.
    pub groups: Arc<dyn GroupSource>,
    /// Live selection storage.
    pub selection: Arc<dyn SelectionStore>,
    /// The ordered data source.
    pub items: Arc<dyn ItemSource>,
    /// Drop hit testing.
    pub layout: Arc<dyn DropLayout>,
    /// Host notification sink.
    pub events: Arc<dyn BrowseEvents>,
    /// Timers and animation frames.
    pub scheduler: Arc<dyn Scheduler>,
    /// Elapsed-time source for autoscroll.
    pub clock: Arc<dyn Clock>,
}
