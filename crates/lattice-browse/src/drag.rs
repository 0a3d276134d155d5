//! Drag-and-drop and reordering.
//!
//! [`DragReorderController`] owns the pointer drag lifecycle
//! (`Idle -> Pressed -> Dragging -> Dropped -> Idle`), hover tracking with
//! insert-point hit testing, the drag-leave debounce, and the reorder
//! commit. Keyboard reordering (Alt+Shift+arrow) reuses the same commit.
//!
//! Moves are always issued in one [`EditBatch`](crate::site::EditBatch)
//! keyed by item identity, so the data source sees a single change.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::autoscroll::AutoScrollLoop;
use crate::entity::{Entity, InsertPoint};
use crate::input::NavKey;
use crate::logging::targets;
use crate::payload::{DragData, DragEvent, mime};
use crate::selection::{IndexSelection, ItemKey, SelectionRange};
use crate::state::{DragSession, DragSource, HoverState, Interaction, Shared};

/// How long a drag must stay outside before hover state is torn down.
pub const DRAG_LEAVE_DEBOUNCE: Duration = Duration::from_millis(40);

/// Finds the nearest insert-after index that is not part of `drag_set`.
///
/// Walks from `start` in the search direction, jumping over whole runs of
/// the drag set. A forward search that runs off the end of the list starts
/// over from `start` going backward. A backward search that finds nothing
/// returns `-1`, meaning "insert before the first item".
pub fn find_first_available_insert_point(
    drag_set: &IndexSelection,
    start: i64,
    search_forward: bool,
    count: usize,
) -> i64 {
    let count = count as i64;
    if search_forward {
        let mut index = start.max(0);
        while index < count {
            match member_run(drag_set, index, count) {
                Some(run) => index = run.last as i64 + 1,
                None => return index,
            }
        }
    }

    let mut index = start.min(count - 1);
    while index >= 0 {
        match member_run(drag_set, index, count) {
            Some(run) => index = run.first as i64 - 1,
            None => return index,
        }
    }
    -1
}

/// The contiguous run of `drag_set` holding `index`.
fn member_run(drag_set: &IndexSelection, index: i64, count: i64) -> Option<SelectionRange> {
    if drag_set.is_everything() {
        return (count > 0).then(|| SelectionRange::new(0, count as usize - 1));
    }
    drag_set.range_containing(index as usize)
}

/// Drives drags from, over and onto the list.
pub struct DragReorderController<'a> {
    shared: &'a Arc<Shared>,
}

impl<'a> DragReorderController<'a> {
    pub(crate) fn new(shared: &'a Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Starts a drag from the pressed item.
    ///
    /// Returns the payload to hand to the platform, or `None` if the press
    /// is not eligible and the native drag should be suppressed.
    pub fn start(&self, mut data: DragData) -> Option<Arc<DragData>> {
        if self.shared.is_disposed() {
            return None;
        }
        let pressed = match &self.shared.state.lock().interaction {
            Interaction::Pressed(pressed) => *pressed,
            _ => return None,
        };

        let config = self.shared.config();
        let site = &self.shared.site;
        let index = match pressed.entity {
            Entity::Item(index) if index < site.item_count() => index,
            _ => return None,
        };
        let non_draggable = site.item_flags(index).is_some_and(|flags| flags.non_draggable);
        if !config.drag_allowed()
            || site.is_animating()
            || non_draggable
            || pressed.in_interactive_subtree
        {
            tracing::debug!(target: targets::DRAG, index, "drag suppressed");
            return None;
        }

        let dragging_unselected = !self.shared.selection.is_included(index);
        let drag_set = if dragging_unselected {
            IndexSelection::single(index)
        } else {
            self.shared.selection.snapshot()
        };
        self.shared.selection.set_pivot(None);

        if !data.has_format(mime::ITEM_KEYS) {
            let keys = self.keys_of(&drag_set);
            let joined: Vec<&str> = keys.iter().map(ItemKey::as_str).collect();
            data.set_data(mime::ITEM_KEYS, joined.join("\n"));
        }
        self.shared.events.drag_start(&drag_set, &mut data);
        let data = Arc::new(data);

        let generation = {
            let mut state = self.shared.state.lock();
            state.drag_generation += 1;
            state.interaction = Interaction::Dragging(DragSession {
                source: Some(DragSource {
                    drag_set,
                    dragging_unselected,
                    marked: Vec::new(),
                }),
                data: data.clone(),
                hover: HoverState::default(),
            });
            state.drag_generation
        };
        tracing::debug!(target: targets::DRAG, index, dragging_unselected, "drag started");

        // The platform captures its drag image before the source is marked.
        let weak = Arc::downgrade(self.shared);
        self.shared.scheduler.schedule(
            Duration::ZERO,
            Box::new(move || mark_drag_source(weak, generation)),
        );

        if !config.items_reorderable {
            let understood = self.shared.events.drag_enter(&data);
            if let Some(session) = self.shared.state.lock().interaction.session_mut() {
                session.hover.entered = true;
                session.hover.understood = understood;
            }
        }

        Some(data)
    }

    /// A drag entered the list.
    ///
    /// Returns true if the list understands the drag.
    pub fn enter(&self, event: &DragEvent) -> bool {
        if self.shared.is_disposed() {
            return false;
        }
        let probe = {
            let mut state = self.shared.state.lock();
            state.leave_timer.cancel();
            if state.interaction.session().is_none() {
                state.interaction = Interaction::Dragging(DragSession {
                    source: None,
                    data: event.data.clone(),
                    hover: HoverState::default(),
                });
            }
            match state.interaction.session_mut() {
                Some(session) if !session.hover.entered => {
                    session.hover.entered = true;
                    Some(session.data.clone())
                }
                _ => None,
            }
        };

        if let Some(data) = probe {
            let accepted = self.shared.events.drag_enter(&data);
            let understood = accepted || self.shared.config().items_reorderable;
            if let Some(session) = self.shared.state.lock().interaction.session_mut() {
                session.hover.understood = understood;
            }
        }
        self.over(event)
    }

    /// A drag moved over the list.
    ///
    /// Updates autoscroll and, unless autoscroll is advancing, the insert
    /// point. Returns true if the list understands the drag.
    pub fn over(&self, event: &DragEvent) -> bool {
        if self.shared.is_disposed() {
            return false;
        }
        let (entered, understood, last, data) = {
            let mut state = self.shared.state.lock();
            state.leave_timer.cancel();
            match state.interaction.session() {
                Some(session) => (
                    session.hover.entered,
                    session.hover.understood,
                    session.hover.last_insert_point,
                    session.data.clone(),
                ),
                None => (false, false, None, event.data.clone()),
            }
        };
        if !entered {
            return self.enter(event);
        }
        if !understood {
            return false;
        }

        let autoscroll = AutoScrollLoop::new(self.shared);
        autoscroll.update(self.shared.axis_position(event.position));
        if autoscroll.is_scrolling() {
            return true;
        }

        let point = self.shared.to_list_point(event.position);
        let insert_point = self
            .shared
            .layout
            .hit_test(point)
            .clamped(self.shared.site.item_count());
        if last == Some(insert_point) {
            return true;
        }
        if let Some(session) = self.shared.state.lock().interaction.session_mut() {
            session.hover.last_insert_point = Some(insert_point);
        }

        if self.shared.events.drag_between(insert_point, &data) {
            self.shared.layout.drag_over(point, insert_point);
        } else {
            self.shared.layout.drag_leave();
        }
        true
    }

    /// The drag left the list's recognized region.
    ///
    /// Teardown is debounced so a leave immediately followed by an enter
    /// (crossing a child boundary) does not flicker.
    pub fn leave(&self) {
        let mut state = self.shared.state.lock();
        if state.interaction.session().is_none() {
            return;
        }
        let weak = Arc::downgrade(self.shared);
        state
            .leave_timer
            .reschedule(DRAG_LEAVE_DEBOUNCE, move || finish_leave(weak));
    }

    /// The drag was dropped on the list.
    ///
    /// Returns true if items were reordered.
    #[tracing::instrument(skip(self, event), target = "lattice_browse::drag", level = "debug")]
    pub fn drop(&self, event: &DragEvent) -> bool {
        if self.shared.is_disposed() {
            return false;
        }
        let session = {
            let mut state = self.shared.state.lock();
            state.leave_timer.cancel();
            state.autoscroll.stop();
            match std::mem::take(&mut state.interaction) {
                Interaction::Dragging(session) => session,
                other => {
                    state.interaction = other;
                    return false;
                }
            }
        };
        let DragSession {
            mut source,
            data,
            hover,
        } = session;

        // Reordering can recycle the marked containers.
        if let Some(source) = source.as_mut() {
            self.unmark(source);
        }

        let mut reordered = false;
        if hover.understood {
            let point = self.shared.to_list_point(event.position);
            let insert_point = self
                .shared
                .layout
                .hit_test(point)
                .clamped(self.shared.site.item_count());
            if hover.last_insert_point != Some(insert_point) {
                self.shared.events.drag_between(insert_point, &data);
            }

            let allowed = self.shared.events.drag_drop(insert_point, &data);
            let config = self.shared.config();
            if let Some(source) = source.as_ref()
                && allowed
                && config.items_reorderable
                && !source.drag_set.is_everything()
                && !self.shared.groups.is_grouped()
            {
                reordered = self.reorder(
                    &source.drag_set,
                    insert_point.insert_after_index,
                    source.dragging_unselected,
                );
            }
        }
        self.shared.layout.drag_leave();

        self.shared.state.lock().interaction = match source {
            Some(source) => Interaction::Dropped(Some((source, data))),
            None => Interaction::Idle,
        };
        reordered
    }

    /// The drag that started here ended, dropped or canceled.
    pub fn end(&self) {
        let ended = {
            let mut state = self.shared.state.lock();
            state.leave_timer.cancel();
            state.autoscroll.stop();
            match std::mem::take(&mut state.interaction) {
                Interaction::Dragging(DragSession {
                    source: Some(source),
                    data,
                    hover,
                }) => Some((source, data, hover.understood)),
                Interaction::Dropped(Some((source, data))) => Some((source, data, false)),
                Interaction::Dragging(_) | Interaction::Dropped(None) => None,
                other => {
                    state.interaction = other;
                    return;
                }
            }
        };

        let Some((mut source, data, hovering)) = ended else {
            return;
        };
        self.unmark(&mut source);
        if hovering {
            self.shared.layout.drag_leave();
        }
        self.shared.events.drag_end(&data);
        tracing::debug!(target: targets::DRAG, "drag ended");
    }

    /// Refreshes a live drag set after the selection changed.
    pub fn selection_changed(&self) {
        let snapshot = self.shared.selection.snapshot();
        let data = {
            let mut state = self.shared.state.lock();
            let Some(DragSession {
                source: Some(source),
                data,
                ..
            }) = state.interaction.session_mut()
            else {
                return;
            };
            if source.dragging_unselected {
                return;
            }
            source.drag_set = snapshot.clone();
            data.clone()
        };
        let drag_set = snapshot;
        self.remark(&drag_set);
        self.shared.events.drag_changed(&drag_set, &data);
    }

    /// Moves the focused item (or the selection holding it) one step.
    ///
    /// Grouped lists only report the move through `itemDragDrop`.
    /// Returns true if items were reordered.
    pub fn keyboard_reorder(&self, direction: NavKey) -> bool {
        let config = self.shared.config();
        if !config.items_reorderable || self.shared.is_disposed() {
            return false;
        }
        let forward = match direction {
            NavKey::Down => true,
            NavKey::Up => false,
            NavKey::Right => !config.right_to_left,
            NavKey::Left => config.right_to_left,
            _ => return false,
        };
        let Entity::Item(index) = self.shared.selection.focused() else {
            return false;
        };
        let count = self.shared.site.item_count();
        if index >= count {
            return false;
        }

        let dragging_unselected = !self.shared.selection.is_included(index);
        let drag_set = if dragging_unselected {
            let non_draggable = self
                .shared
                .site
                .item_flags(index)
                .is_some_and(|flags| flags.non_draggable);
            if non_draggable {
                return false;
            }
            IndexSelection::single(index)
        } else {
            let mut selection = self.shared.selection.snapshot();
            selection.materialize(count);
            selection
        };
        let Some(block) = drag_set.range_containing(index) else {
            return false;
        };

        let start = if forward {
            block.last as i64 + 1
        } else {
            block.first as i64 - 2
        };
        let found = find_first_available_insert_point(&drag_set, start, forward, count);
        let insert_after = self.group_adjusted(found, block, forward, count);
        let insert_point = InsertPoint::new(insert_after + 1, insert_after);

        let mut data = DragData::new();
        let keys = self.keys_of(&drag_set);
        let joined: Vec<&str> = keys.iter().map(ItemKey::as_str).collect();
        data.set_data(mime::ITEM_KEYS, joined.join("\n"));

        tracing::debug!(target: targets::DRAG, index, forward, insert_after, "keyboard reorder");
        if !self.shared.events.drag_drop(insert_point, &data) {
            return false;
        }
        if self.shared.groups.is_grouped() {
            return false;
        }
        self.reorder(&drag_set, insert_after, dragging_unselected)
    }

    /// Reports crossing into an adjacent group the way a pointer drop at
    /// the group's edge would.
    fn group_adjusted(&self, found: i64, block: SelectionRange, forward: bool, count: usize) -> i64 {
        let groups = &self.shared.groups;
        if !groups.is_grouped() {
            return found;
        }
        if forward {
            if found >= 0 && groups.group_of_item(found as usize) != groups.group_of_item(block.last) {
                return found - 1;
            }
        } else {
            let next = found + 1;
            if (next as usize) < count
                && groups.group_of_item(next as usize) != groups.group_of_item(block.first)
            {
                return next;
            }
        }
        found
    }

    /// Moves `drag_set` after `insert_after` in one edit batch.
    fn reorder(&self, drag_set: &IndexSelection, insert_after: i64, dragging_unselected: bool) -> bool {
        let count = self.shared.site.item_count();
        let indices = drag_set.indices(count);
        if indices.is_empty() {
            return false;
        }
        let drop_index = find_first_available_insert_point(drag_set, insert_after, false, count);
        let keys: Vec<ItemKey> = indices
            .iter()
            .filter_map(|&index| self.shared.items.key_at(index))
            .collect();
        let (Some(first_key), Some(last_key)) = (keys.first().cloned(), keys.last().cloned()) else {
            return false;
        };

        let anchor = if drop_index >= 0 {
            match self.shared.items.key_at(drop_index as usize) {
                Some(anchor) => Some(anchor),
                None => return false,
            }
        } else {
            None
        };

        let mut batch = self.shared.items.begin_edits();
        for key in keys.iter().rev() {
            match &anchor {
                Some(anchor) => batch.move_after(key, anchor),
                None => batch.move_to_start(key),
            }
        }
        batch.end_edits();

        let new_first = if drop_index >= 0 {
            let moved_before = indices
                .iter()
                .filter(|&&index| (index as i64) < drop_index)
                .count() as i64;
            (drop_index - moved_before + 1) as usize
        } else {
            0
        };
        tracing::debug!(target: targets::DRAG, items = keys.len(), drop_index, new_first, "reorder committed");

        let selection = &self.shared.selection;
        selection.set_focused(Entity::Item(new_first));
        if dragging_unselected {
            selection.remove_key(&first_key);
        } else {
            selection.set_key_range(&first_key, &last_key);
        }
        if self.shared.config().ensure_visible_after_reorder {
            self.shared.site.ensure_visible(Entity::Item(new_first));
        }
        true
    }

    fn keys_of(&self, drag_set: &IndexSelection) -> Vec<ItemKey> {
        drag_set
            .indices(self.shared.site.item_count())
            .into_iter()
            .filter_map(|index| self.shared.items.key_at(index))
            .collect()
    }

    fn unmark(&self, source: &mut DragSource) {
        for index in source.marked.drain(..) {
            self.shared.site.set_drag_source(index, false);
        }
    }

    fn remark(&self, drag_set: &IndexSelection) {
        let previous = match self.shared.state.lock().interaction.session_mut() {
            Some(DragSession {
                source: Some(source),
                ..
            }) => std::mem::take(&mut source.marked),
            _ => return,
        };
        for index in previous {
            self.shared.site.set_drag_source(index, false);
        }
        let marked = mark_realized(self.shared, drag_set);
        if let Some(DragSession {
            source: Some(source),
            ..
        }) = self.shared.state.lock().interaction.session_mut()
        {
            source.marked = marked;
        }
    }
}

fn mark_realized(shared: &Shared, drag_set: &IndexSelection) -> Vec<usize> {
    let marked: Vec<usize> = shared
        .site
        .realized_items()
        .into_iter()
        .filter(|&index| drag_set.contains(index))
        .collect();
    for &index in &marked {
        shared.site.set_drag_source(index, true);
    }
    marked
}

fn mark_drag_source(shared: Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    if shared.is_disposed() {
        return;
    }
    let drag_set = {
        let state = shared.state.lock();
        if state.drag_generation != generation {
            return;
        }
        match state.interaction.session() {
            Some(DragSession {
                source: Some(source),
                ..
            }) => source.drag_set.clone(),
            _ => return,
        }
    };
    let marked = mark_realized(&shared, &drag_set);
    if let Some(DragSession {
        source: Some(source),
        ..
    }) = shared.state.lock().interaction.session_mut()
    {
        source.marked = marked;
    }
}

fn finish_leave(shared: Weak<Shared>) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    if shared.is_disposed() {
        return;
    }
    let data = {
        let mut state = shared.state.lock();
        state.autoscroll.stop();
        let Some(session) = state.interaction.session_mut() else {
            return;
        };
        session.hover = HoverState::default();
        let data = session.data.clone();
        if session.source.is_none() {
            state.interaction = Interaction::Idle;
        }
        data
    };
    shared.layout.drag_leave();
    shared.events.drag_leave(&data);
    tracing::debug!(target: targets::DRAG, "drag left");
}
