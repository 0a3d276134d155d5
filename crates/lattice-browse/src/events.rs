//! Host notifications and the event gateway.
//!
//! The controller reports every interesting transition to the host through
//! the [`BrowseEvents`] trait. Cancelable notifications return a [`Verdict`];
//! the selection-changing notification may additionally attach an
//! asynchronous confirmation, which turns the outcome into a
//! [`Decision::Pending`] that the controller awaits before committing.
//!
//! Every hook has a default implementation, so hosts only override the
//! notifications they care about.
//!
//! # Example
//!
//! ```
//! use lattice_browse::events::{BrowseEvents, NavigatingEvent, Verdict};
//! use lattice_browse::Entity;
//!
//! /// Keeps focus away from the list footer.
//! struct NoFooter;
//!
//! impl BrowseEvents for NoFooter {
//!     fn keyboard_navigating(&self, event: &NavigatingEvent) -> Verdict {
//!         if event.new == Entity::ListFooter {
//!             Verdict::Deny
//!         } else {
//!             Verdict::Allow
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::entity::{Entity, InsertPoint};
use crate::logging::targets;
use crate::payload::DragData;
use crate::selection::{IndexSelection, ItemKey};
use crate::site::ItemSource;

/// The host's answer to a cancelable notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// Let the default action proceed.
    #[default]
    Allow,
    /// Veto the default action.
    Deny,
}

impl Verdict {
    /// Returns true for [`Verdict::Allow`].
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

impl From<bool> for Verdict {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// A host confirmation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, thiserror::Error)]
#[error("selection change rejected by host")]
pub struct Rejected;

/// An asynchronous host confirmation.
pub type Confirmation = BoxFuture<'static, Result<(), Rejected>>;

/// Outcome of a notification that supports asynchronous confirmation.
pub enum Decision {
    /// The default action may proceed now.
    Allowed,
    /// The host vetoed the default action.
    Denied,
    /// The host attached a confirmation that must settle first.
    Pending(Confirmation),
}

impl Decision {
    /// Waits for the decision to settle.
    ///
    /// A pending confirmation that never completes never settles.
    pub async fn settle(self) -> bool {
        match self {
            Self::Allowed => true,
            Self::Denied => false,
            Self::Pending(confirmation) => confirmation.await.is_ok(),
        }
    }

    /// Returns true for [`Decision::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("Allowed"),
            Self::Denied => f.write_str("Denied"),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Keyboard focus is about to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatingEvent {
    /// The entity losing focus.
    pub old: Entity,
    /// The entity about to receive focus.
    pub new: Entity,
}

/// The selection is about to change.
///
/// The host sees the hypothetical next selection and may edit it, suppress
/// tap-specific behaviour, or attach a confirmation the controller awaits.
pub struct SelectionChangingEvent {
    new_selection: IndexSelection,
    tap_prevented: bool,
    confirmation: Option<Confirmation>,
}

impl SelectionChangingEvent {
    /// Creates a notification for a hypothetical selection.
    pub fn new(new_selection: IndexSelection) -> Self {
        Self {
            new_selection,
            tap_prevented: false,
            confirmation: None,
        }
    }

    /// The selection that would result.
    pub fn new_selection(&self) -> &IndexSelection {
        &self.new_selection
    }

    /// Mutable access to the hypothetical selection.
    pub fn new_selection_mut(&mut self) -> &mut IndexSelection {
        &mut self.new_selection
    }

    /// Suppresses tap-specific behaviour (the tap still invokes).
    pub fn prevent_tap_behavior(&mut self) {
        self.tap_prevented = true;
    }

    /// Returns true if tap-specific behaviour was suppressed.
    pub fn is_tap_behavior_prevented(&self) -> bool {
        self.tap_prevented
    }

    /// Attaches a confirmation the controller awaits before committing.
    pub fn set_promise(&mut self, confirmation: Confirmation) {
        self.confirmation = Some(confirmation);
    }

    fn take_confirmation(&mut self) -> Option<Confirmation> {
        self.confirmation.take()
    }
}

impl fmt::Debug for SelectionChangingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionChangingEvent")
            .field("new_selection", &self.new_selection)
            .field("tap_prevented", &self.tap_prevented)
            .field("has_confirmation", &self.confirmation.is_some())
            .finish()
    }
}

/// An item or group header was invoked.
pub struct InvokedEvent<'a> {
    /// The invoked entity.
    pub entity: Entity,
    items: &'a dyn ItemSource,
}

impl<'a> InvokedEvent<'a> {
    pub(crate) fn new(entity: Entity, items: &'a dyn ItemSource) -> Self {
        Self { entity, items }
    }

    /// Resolves the key of the invoked item.
    ///
    /// Only looked up when asked for; group headers have no item key.
    pub fn item_key(&self) -> Option<ItemKey> {
        self.entity
            .item_index()
            .and_then(|index| self.items.key_at(index))
    }
}

impl fmt::Debug for InvokedEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokedEvent")
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

/// A drag is starting from this list.
#[derive(Debug)]
pub struct DragStartEvent<'a> {
    /// The items being dragged.
    pub drag_set: &'a IndexSelection,
    /// The payload; the host may attach formats.
    pub data: &'a mut DragData,
}

/// The drag set changed while a drag from this list was in progress.
#[derive(Debug)]
pub struct DragChangedEvent<'a> {
    /// The refreshed drag set.
    pub drag_set: &'a IndexSelection,
    /// The payload.
    pub data: &'a DragData,
}

/// A drag from this list ended.
#[derive(Debug)]
pub struct DragEndEvent<'a> {
    /// The payload.
    pub data: &'a DragData,
}

/// A drag entered the list.
///
/// Returning [`Verdict::Allow`] accepts the drag as understood.
#[derive(Debug)]
pub struct DragEnterEvent<'a> {
    /// The payload.
    pub data: &'a DragData,
}

/// The insert point under a drag changed.
#[derive(Debug)]
pub struct DragBetweenEvent<'a> {
    /// The new insert point.
    pub insert_point: InsertPoint,
    /// The payload.
    pub data: &'a DragData,
}

/// A drag was dropped onto the list.
#[derive(Debug)]
pub struct DragDropEvent<'a> {
    /// Where the drop landed.
    pub insert_point: InsertPoint,
    /// The payload.
    pub data: &'a DragData,
}

/// A drag left the list.
#[derive(Debug)]
pub struct DragLeaveEvent<'a> {
    /// The payload.
    pub data: &'a DragData,
}

/// Receives browse-mode notifications.
///
/// Hooks run synchronously on the controller's thread and must not call
/// back into the controller.
pub trait BrowseEvents: Send + Sync {
    /// Keyboard focus is about to move. Deny keeps the old entity focused.
    fn keyboard_navigating(&self, _event: &NavigatingEvent) -> Verdict {
        Verdict::Allow
    }

    /// The selection is about to change. Deny suppresses the change.
    fn selection_changing(&self, _event: &mut SelectionChangingEvent) -> Verdict {
        Verdict::Allow
    }

    /// An item was invoked. Deny suppresses the default invoke action.
    fn item_invoked(&self, _event: &InvokedEvent<'_>) -> Verdict {
        Verdict::Allow
    }

    /// A group header was invoked. Deny suppresses the default invoke action.
    fn group_header_invoked(&self, _event: &InvokedEvent<'_>) -> Verdict {
        Verdict::Allow
    }

    /// A drag started from this list.
    fn item_drag_start(&self, _event: &mut DragStartEvent<'_>) {}

    /// The drag set of an active drag changed.
    fn item_drag_changed(&self, _event: &DragChangedEvent<'_>) {}

    /// A drag from this list ended.
    fn item_drag_end(&self, _event: &DragEndEvent<'_>) {}

    /// A drag entered the list. Allow marks it as understood.
    ///
    /// Lists that reorder understand their own drags without asking.
    fn item_drag_enter(&self, _event: &DragEnterEvent<'_>) -> Verdict {
        Verdict::Deny
    }

    /// The insert point changed. Deny hides the insertion indicator.
    fn item_drag_between(&self, _event: &DragBetweenEvent<'_>) -> Verdict {
        Verdict::Allow
    }

    /// A drag was dropped. Deny prevents the reorder.
    fn item_drag_drop(&self, _event: &DragDropEvent<'_>) -> Verdict {
        Verdict::Allow
    }

    /// A drag left the list.
    fn item_drag_leave(&self, _event: &DragLeaveEvent<'_>) {}
}

/// A [`BrowseEvents`] sink that accepts every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl BrowseEvents for NoEvents {}

/// Uniform, logged dispatch of notifications to the host.
#[derive(Clone)]
pub struct EventGateway {
    sink: Arc<dyn BrowseEvents>,
}

impl EventGateway {
    /// Wraps a host notification sink.
    pub fn new(sink: Arc<dyn BrowseEvents>) -> Self {
        Self { sink }
    }

    /// Fires `keyboardNavigating`. Returns true if the host allowed it.
    pub fn navigating(&self, old: Entity, new: Entity) -> bool {
        let verdict = self
            .sink
            .keyboard_navigating(&NavigatingEvent { old, new });
        tracing::trace!(target: targets::EVENTS, %old, %new, ?verdict, "keyboardNavigating");
        verdict.is_allowed()
    }

    /// Fires `selectionChanging`.
    ///
    /// The returned decision carries any confirmation the host attached.
    pub fn selection_changing(&self, event: &mut SelectionChangingEvent) -> Decision {
        let verdict = self.sink.selection_changing(event);
        let confirmation = event.take_confirmation();
        tracing::trace!(
            target: targets::EVENTS,
            ?verdict,
            pending = confirmation.is_some(),
            tap_prevented = event.is_tap_behavior_prevented(),
            "selectionChanging"
        );
        match (verdict, confirmation) {
            (Verdict::Deny, _) => Decision::Denied,
            (Verdict::Allow, Some(confirmation)) => Decision::Pending(confirmation),
            (Verdict::Allow, None) => Decision::Allowed,
        }
    }

    /// Fires `itemInvoked` or `groupHeaderInvoked` depending on the entity.
    ///
    /// The list header and footer are not invokable and always return false.
    pub fn invoked(&self, entity: Entity, items: &dyn ItemSource) -> bool {
        let event = InvokedEvent::new(entity, items);
        let verdict = match entity {
            Entity::Item(_) => self.sink.item_invoked(&event),
            Entity::GroupHeader(_) => self.sink.group_header_invoked(&event),
            Entity::ListHeader | Entity::ListFooter => return false,
        };
        tracing::trace!(target: targets::EVENTS, %entity, ?verdict, "invoked");
        verdict.is_allowed()
    }

    /// Fires `itemDragStart`.
    pub fn drag_start(&self, drag_set: &IndexSelection, data: &mut DragData) {
        tracing::trace!(target: targets::EVENTS, items = drag_set.len(), "itemDragStart");
        self.sink
            .item_drag_start(&mut DragStartEvent { drag_set, data });
    }

    /// Fires `itemDragChanged`.
    pub fn drag_changed(&self, drag_set: &IndexSelection, data: &DragData) {
        tracing::trace!(target: targets::EVENTS, items = drag_set.len(), "itemDragChanged");
        self.sink
            .item_drag_changed(&DragChangedEvent { drag_set, data });
    }

    /// Fires `itemDragEnd`.
    pub fn drag_end(&self, data: &DragData) {
        tracing::trace!(target: targets::EVENTS, "itemDragEnd");
        self.sink.item_drag_end(&DragEndEvent { data });
    }

    /// Fires `itemDragEnter`. Returns true if the host accepted the drag.
    pub fn drag_enter(&self, data: &DragData) -> bool {
        let verdict = self.sink.item_drag_enter(&DragEnterEvent { data });
        tracing::trace!(target: targets::EVENTS, ?verdict, "itemDragEnter");
        verdict.is_allowed()
    }

    /// Fires `itemDragBetween`. Returns true if the host allowed it.
    pub fn drag_between(&self, insert_point: InsertPoint, data: &DragData) -> bool {
        let verdict = self
            .sink
            .item_drag_between(&DragBetweenEvent { insert_point, data });
        tracing::trace!(
            target: targets::EVENTS,
            index = insert_point.index,
            insert_after = insert_point.insert_after_index,
            ?verdict,
            "itemDragBetween"
        );
        verdict.is_allowed()
    }

    /// Fires `itemDragDrop`. Returns true if the host allowed it.
    pub fn drag_drop(&self, insert_point: InsertPoint, data: &DragData) -> bool {
        let verdict = self
            .sink
            .item_drag_drop(&DragDropEvent { insert_point, data });
        tracing::trace!(
            target: targets::EVENTS,
            index = insert_point.index,
            insert_after = insert_point.insert_after_index,
            ?verdict,
            "itemDragDrop"
        );
        verdict.is_allowed()
    }

    /// Fires `itemDragLeave`.
    pub fn drag_leave(&self, data: &DragData) {
        tracing::trace!(target: targets::EVENTS, "itemDragLeave");
        self.sink.item_drag_leave(&DragLeaveEvent { data });
    }
}

impl fmt::Debug for EventGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGateway").finish_non_exhaustive()
    }
}
