//! Selection changes and the selection-changing protocol.
//!
//! Before the live selection changes in response to a tap, a Space press or
//! focus movement, [`SelectionController`] builds the hypothetical next
//! selection, hands it to the host and waits for the host's decision. Only
//! then is the live [`SelectionStore`](crate::site::SelectionStore) touched.
//!
//! Range selection and select-all skip items whose realized element opts
//! out of selection. Unrealized items cannot be inspected and are treated as
//! selectable.

use std::sync::Arc;

use crate::entity::Entity;
use crate::events::SelectionChangingEvent;
use crate::logging::targets;
use crate::selection::{IndexSelection, SelectionRange};
use crate::state::Shared;

/// What the host allowed for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionPermission {
    /// The selection change may be applied.
    pub can_select: bool,
    /// Tap-specific selection may be applied.
    pub can_tap_select: bool,
}

impl SelectionPermission {
    const DENIED: Self = Self {
        can_select: false,
        can_tap_select: false,
    };
}

/// The change being requested for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectIntent {
    /// Flip the item's membership.
    Toggle,
    /// Make sure the item is selected, keeping other items in multi modes.
    Select,
    /// Select only this item.
    SelectOnly,
}

/// Runs selection changes against the live selection.
pub struct SelectionController<'a> {
    shared: &'a Arc<Shared>,
}

impl<'a> SelectionController<'a> {
    pub(crate) fn new(shared: &'a Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Asks the host whether toggling `entity` may proceed.
    ///
    /// Group headers and the list chrome are never selectable. If the host
    /// attaches a confirmation that never completes, neither does this
    /// future.
    pub async fn verify_selection_allowed(&self, entity: Entity) -> SelectionPermission {
        self.verify(entity, SelectIntent::Toggle).await
    }

    async fn verify(&self, entity: Entity, intent: SelectIntent) -> SelectionPermission {
        let Entity::Item(index) = entity else {
            return SelectionPermission::DENIED;
        };
        let config = self.shared.config();
        if !config.selection_mode.allows_selection() || self.is_non_selectable(index) {
            return SelectionPermission::DENIED;
        }

        let multi = config.selection_mode.is_multi();
        let was_selected = self.shared.selection.is_included(index);
        let hypothetical = self.hypothetical(index, intent, multi, was_selected);

        let mut event = SelectionChangingEvent::new(hypothetical);
        let allowed = self
            .shared
            .events
            .selection_changing(&mut event)
            .settle()
            .await;
        if self.shared.is_disposed() {
            return SelectionPermission::DENIED;
        }

        let included = event.new_selection().contains(index);
        let expected = match intent {
            SelectIntent::Toggle => !was_selected,
            SelectIntent::Select | SelectIntent::SelectOnly => true,
        };
        let can_select = allowed && included == expected;
        let permission = SelectionPermission {
            can_select,
            can_tap_select: can_select && !event.is_tap_behavior_prevented(),
        };
        tracing::debug!(target: targets::SELECTION, index, ?intent, ?permission, "selection verified");
        permission
    }

    fn hypothetical(
        &self,
        index: usize,
        intent: SelectIntent,
        multi: bool,
        was_selected: bool,
    ) -> IndexSelection {
        match (intent, multi) {
            (SelectIntent::SelectOnly, _) | (SelectIntent::Select, false) => {
                IndexSelection::single(index)
            }
            (SelectIntent::Toggle, false) => {
                if was_selected {
                    IndexSelection::new()
                } else {
                    IndexSelection::single(index)
                }
            }
            (SelectIntent::Toggle, true) | (SelectIntent::Select, true) => {
                let mut next = self.shared.selection.snapshot();
                next.materialize(self.shared.site.item_count());
                if intent == SelectIntent::Toggle {
                    next.toggle(index);
                } else {
                    next.add(index);
                }
                next
            }
        }
    }

    /// Runs the protocol for `entity` and applies the change if allowed.
    pub async fn request(&self, entity: Entity, intent: SelectIntent) -> SelectionPermission {
        let permission = self.verify(entity, intent).await;
        if permission.can_select
            && let Entity::Item(index) = entity
        {
            self.apply(index, intent);
        }
        permission
    }

    /// Applies the tap form of `intent`, honouring a suppressed tap.
    pub(crate) async fn request_tap(&self, entity: Entity, intent: SelectIntent) -> SelectionPermission {
        let permission = self.verify(entity, intent).await;
        if permission.can_tap_select
            && let Entity::Item(index) = entity
        {
            self.apply(index, intent);
        }
        permission
    }

    fn apply(&self, index: usize, intent: SelectIntent) {
        let store = &self.shared.selection;
        let multi = self.shared.config().selection_mode.is_multi();
        let single = [SelectionRange::single(index)];
        match intent {
            SelectIntent::SelectOnly => store.set_ranges(&single),
            SelectIntent::Select if multi => store.add_ranges(&single),
            SelectIntent::Select => store.set_ranges(&single),
            SelectIntent::Toggle => {
                let selected = store.is_included(index);
                match (selected, multi) {
                    (true, true) => store.remove_indices(&[index]),
                    (true, false) => store.clear(),
                    (false, true) => store.add_ranges(&single),
                    (false, false) => store.set_ranges(&single),
                }
            }
        }
        tracing::debug!(target: targets::SELECTION, index, ?intent, "selection applied");
    }

    /// Selects `[first, last]` minus realized non-selectable items.
    ///
    /// All sub-ranges are applied in one store call, added to the existing
    /// selection when `additive`, replacing it otherwise. Returns the
    /// sub-ranges applied.
    pub fn select_range(&self, first: usize, last: usize, additive: bool) -> Vec<SelectionRange> {
        let (first, last) = (first.min(last), first.max(last));
        let mut ranges = Vec::new();
        let mut run_start = None;

        for index in first..=last {
            if self.is_non_selectable(index) {
                if let Some(start) = run_start.take() {
                    ranges.push(SelectionRange::new(start, index - 1));
                }
            } else if run_start.is_none() {
                run_start = Some(index);
            }
        }
        if let Some(start) = run_start {
            ranges.push(SelectionRange::new(start, last));
        }

        if additive {
            self.shared.selection.add_ranges(&ranges);
        } else {
            self.shared.selection.set_ranges(&ranges);
        }
        tracing::debug!(target: targets::SELECTION, first, last, additive, ranges = ranges.len(), "range selected");
        ranges
    }

    /// Selects everything, then deselects realized non-selectable items.
    ///
    /// Non-selectable items that are not realized stay selected.
    pub fn select_all(&self) {
        self.shared.selection.select_all();
        let excluded: Vec<usize> = self
            .shared
            .site
            .realized_items()
            .into_iter()
            .filter(|&index| self.is_non_selectable(index))
            .collect();
        if !excluded.is_empty() {
            self.shared.selection.remove_indices(&excluded);
        }
        tracing::debug!(target: targets::SELECTION, excluded = excluded.len(), "selected all");
    }

    fn is_non_selectable(&self, index: usize) -> bool {
        self.shared
            .site
            .item_flags(index)
            .is_some_and(|flags| flags.non_selectable)
    }
}
