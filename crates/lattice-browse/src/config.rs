//! Configuration for the browse-mode controller.
//!
//! [`BrowseConfig`] carries the behavioural switches a list view exposes to
//! its host. It can be built in code or loaded from any serde format:
//!
//! ```
//! use lattice_browse::config::{BrowseConfig, Orientation, TapBehavior};
//! use lattice_browse::selection::SelectionMode;
//!
//! let config = BrowseConfig::new()
//!     .with_selection_mode(SelectionMode::ExtendedSelection)
//!     .with_tap_behavior(TapBehavior::ToggleSelect)
//!     .with_items_reorderable(true)
//!     .with_orientation(Orientation::Horizontal);
//!
//! assert!(config.items_reorderable);
//! ```

use serde::{Deserialize, Serialize};

use crate::selection::SelectionMode;

/// What a tap (click without modifiers) on an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TapBehavior {
    /// Taps do nothing.
    None,
    /// Taps invoke the item without touching the selection.
    InvokeOnly,
    /// Taps invoke and toggle the item's selection.
    #[default]
    ToggleSelect,
    /// Taps invoke and select the item; selection also follows keyboard focus.
    DirectSelect,
}

impl TapBehavior {
    /// Returns true if a tap should fire the invoked notification.
    pub fn invokes(self) -> bool {
        self != Self::None
    }
}

/// The list's scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Items flow top to bottom; the list scrolls vertically.
    #[default]
    Vertical,
    /// Items flow along the inline direction; the list scrolls horizontally.
    Horizontal,
}

/// Behavioural configuration for [`BrowseMode`](crate::BrowseMode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// How items can be selected.
    pub selection_mode: SelectionMode,
    /// What a plain tap does.
    pub tap_behavior: TapBehavior,
    /// Items can be dragged out of the list.
    pub items_draggable: bool,
    /// Items can be reordered inside the list.
    pub items_reorderable: bool,
    /// The scrolling axis.
    pub orientation: Orientation,
    /// Right-to-left layout; mirrors horizontal coordinates and arrow keys.
    pub right_to_left: bool,
    /// Scroll the focused item into view after a reorder commits.
    pub ensure_visible_after_reorder: bool,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            tap_behavior: TapBehavior::default(),
            items_draggable: false,
            items_reorderable: false,
            orientation: Orientation::default(),
            right_to_left: false,
            ensure_visible_after_reorder: true,
        }
    }
}

impl BrowseConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the tap behavior.
    pub fn with_tap_behavior(mut self, behavior: TapBehavior) -> Self {
        self.tap_behavior = behavior;
        self
    }

    /// Enables or disables dragging items out.
    pub fn with_items_draggable(mut self, draggable: bool) -> Self {
        self.items_draggable = draggable;
        self
    }

    /// Enables or disables reordering.
    pub fn with_items_reorderable(mut self, reorderable: bool) -> Self {
        self.items_reorderable = reorderable;
        self
    }

    /// Sets the scrolling axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enables right-to-left layout.
    pub fn with_right_to_left(mut self, rtl: bool) -> Self {
        self.right_to_left = rtl;
        self
    }

    /// Sets whether reorders scroll the moved items into view.
    pub fn with_ensure_visible_after_reorder(mut self, ensure: bool) -> Self {
        self.ensure_visible_after_reorder = ensure;
        self
    }

    /// Returns true if a drag can start from this list.
    pub fn drag_allowed(&self) -> bool {
        self.items_draggable || self.items_reorderable
    }
}
