//! In-memory collaborators for integration tests.
//!
//! [`FakeHost`] implements every collaborator trait over one mutex-guarded
//! [`HostState`]: a vertical list of fixed-height items keyed by letters,
//! an optional grouping into fixed-size groups, a plain selection store and
//! a recording event sink.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future;
use lattice_browse::events::{
    Confirmation, DragBetweenEvent, DragChangedEvent, DragDropEvent, DragEndEvent,
    DragEnterEvent, DragLeaveEvent, DragStartEvent, InvokedEvent, NavigatingEvent,
    SelectionChangingEvent,
};
use lattice_browse::site::GeometryFuture;
use lattice_browse::{
    BrowseConfig, BrowseEvents, BrowseMode, Collaborators, DragData, DragEvent, DropLayout,
    EditBatch, Entity, EntityKind, FocusChange, GroupSource, IndexSelection, InsertPoint,
    ItemFlags, ItemKey, ItemSource, ListSite, NavKey, PointerEvent, RawTarget, SelectionRange,
    SelectionStore, Verdict,
};
use lattice_browse_core::{Clock, Extent, GeometryError, ManualScheduler, Point, Size};
use parking_lot::Mutex;

pub const ITEM_EXTENT: f32 = 50.0;
pub const HEADER_EXTENT: f32 = 40.0;
pub const PAGE_SIZE: i64 = 5;
pub const VIEWPORT: Size = Size::new(300.0, 500.0);

/// Installs a test subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A recorded data-source move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    MoveToStart(String),
    MoveBefore(String, String),
    MoveAfter(String, String),
}

/// A recorded host notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Navigating(Entity, Entity),
    SelectionChanging(IndexSelection),
    Invoked(Entity),
    DragStart(IndexSelection),
    DragChanged(IndexSelection),
    DragEnd,
    DragEnter,
    DragBetween(InsertPoint),
    DragDrop(InsertPoint),
    DragLeave,
}

pub struct HostState {
    pub keys: Vec<String>,
    pub group_size: Option<usize>,
    pub has_header: bool,
    pub has_footer: bool,
    pub scroll: f32,
    pub realized: Range<usize>,
    pub non_selectable: BTreeSet<usize>,
    pub non_draggable: BTreeSet<usize>,
    pub animating: bool,
    pub marked: BTreeSet<usize>,
    pub focus_changes: Vec<(Entity, FocusChange)>,
    pub ensured_visible: Vec<Entity>,
    pub geometry_fails: bool,
    pub failing_extents: Vec<Entity>,
    pub pending_extents: bool,
    /// Runs on every viewport size query, outside the host lock.
    pub viewport_hook: Option<Arc<dyn Fn() + Send + Sync>>,

    pub selection: IndexSelection,
    pub pivot: Option<usize>,
    pub focused: Entity,
    pub set_calls: Vec<Vec<SelectionRange>>,
    pub add_calls: Vec<Vec<SelectionRange>>,
    pub removed_keys: Vec<String>,

    pub edits: Vec<Edit>,
    pub batches: usize,

    pub insert_point: InsertPoint,
    pub hit_tests: usize,
    pub drag_overs: Vec<InsertPoint>,
    pub drag_leaves: usize,

    pub notices: Vec<Notice>,
    pub veto_navigation: bool,
    pub veto_selection: bool,
    pub prevent_tap: bool,
    pub confirmation: Option<Confirmation>,
    pub veto_invoke: bool,
    pub accept_enter: bool,
    pub veto_between: bool,
    pub veto_drop: bool,
}

fn key_name(index: usize) -> String {
    if index < 26 {
        char::from(b'a' + index as u8).to_string()
    } else {
        format!("k{index}")
    }
}

impl HostState {
    fn new(count: usize) -> Self {
        Self {
            keys: (0..count).map(key_name).collect(),
            group_size: None,
            has_header: false,
            has_footer: false,
            scroll: 0.0,
            realized: 0..usize::MAX,
            non_selectable: BTreeSet::new(),
            non_draggable: BTreeSet::new(),
            animating: false,
            marked: BTreeSet::new(),
            focus_changes: Vec::new(),
            ensured_visible: Vec::new(),
            geometry_fails: false,
            failing_extents: Vec::new(),
            pending_extents: false,
            viewport_hook: None,
            selection: IndexSelection::new(),
            pivot: None,
            focused: Entity::Item(0),
            set_calls: Vec::new(),
            add_calls: Vec::new(),
            removed_keys: Vec::new(),
            edits: Vec::new(),
            batches: 0,
            insert_point: InsertPoint::new(0, -1),
            hit_tests: 0,
            drag_overs: Vec::new(),
            drag_leaves: 0,
            notices: Vec::new(),
            veto_navigation: false,
            veto_selection: false,
            prevent_tap: false,
            confirmation: None,
            veto_invoke: false,
            accept_enter: false,
            veto_between: false,
            veto_drop: false,
        }
    }

    fn count(&self) -> usize {
        self.keys.len()
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key.as_str())
    }

    fn header_extent(&self) -> f32 {
        if self.has_header { HEADER_EXTENT } else { 0.0 }
    }

    fn content_length(&self) -> f32 {
        let footer = if self.has_footer { HEADER_EXTENT } else { 0.0 };
        self.header_extent() + self.count() as f32 * ITEM_EXTENT + footer
    }

    fn item_extent(&self, index: usize) -> Extent {
        let begin = self.header_extent() + index as f32 * ITEM_EXTENT;
        Extent::new(begin, begin + ITEM_EXTENT)
    }

    fn apply(&mut self, edit: &Edit) {
        let take = |keys: &mut Vec<String>, key: &str| {
            keys.iter()
                .position(|k| k == key)
                .map(|position| keys.remove(position))
        };
        match edit {
            Edit::MoveToStart(key) => {
                if let Some(key) = take(&mut self.keys, key.as_str()) {
                    self.keys.insert(0, key);
                }
            }
            Edit::MoveBefore(key, anchor) | Edit::MoveAfter(key, anchor) => {
                let Some(moved) = take(&mut self.keys, key.as_str()) else {
                    return;
                };
                let Some(anchor_position) = self.keys.iter().position(|k| k == anchor) else {
                    return;
                };
                let offset = usize::from(matches!(edit, Edit::MoveAfter(..)));
                self.keys.insert(anchor_position + offset, moved);
            }
        }
    }
}

/// Every collaborator over one shared state.
pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HostState::new(count)),
        })
    }

    /// Runs `f` against the host state.
    pub fn with<R>(&self, f: impl FnOnce(&mut HostState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn keys(&self) -> String {
        self.state.lock().keys.concat()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state.lock().notices.clone()
    }

    pub fn selected(&self) -> Vec<usize> {
        let state = self.state.lock();
        state.selection.indices(state.count())
    }

    pub fn select(&self, ranges: &[(usize, usize)]) {
        self.state.lock().selection =
            IndexSelection::from_ranges(ranges.iter().map(|&(a, b)| SelectionRange::new(a, b)));
    }

    pub fn focus(&self, entity: Entity) {
        self.state.lock().focused = entity;
    }

    fn notify(&self, notice: Notice) {
        self.state.lock().notices.push(notice);
    }
}

impl ListSite for FakeHost {
    fn item_count(&self) -> usize {
        self.state.lock().count()
    }

    fn has_list_header(&self) -> bool {
        self.state.lock().has_header
    }

    fn has_list_footer(&self) -> bool {
        self.state.lock().has_footer
    }

    fn adjacent(&self, from: Entity, direction: NavKey) -> GeometryFuture<RawTarget> {
        let state = self.state.lock();
        let step = match direction {
            NavKey::Up | NavKey::Left => -1,
            NavKey::Down | NavKey::Right => 1,
            NavKey::PageUp => -PAGE_SIZE,
            NavKey::PageDown => PAGE_SIZE,
            NavKey::Home | NavKey::End => 0,
        };
        let target = match from {
            Entity::Item(index) => RawTarget::item(index as i64 + step),
            Entity::GroupHeader(group) => {
                RawTarget::new(EntityKind::GroupHeader, group as i64 + step)
            }
            Entity::ListHeader => RawTarget::item(0),
            Entity::ListFooter => RawTarget::item(state.count() as i64 - 1),
        };
        future::ready(Ok(target)).boxed()
    }

    fn entity_extent(&self, entity: Entity) -> GeometryFuture<Extent> {
        let state = self.state.lock();
        if state.pending_extents {
            return future::pending().boxed();
        }
        if state.geometry_fails || state.failing_extents.contains(&entity) {
            return future::ready(Err(GeometryError::new(format!("{entity} not realized")))).boxed();
        }
        let extent = match entity {
            Entity::Item(index) => state.item_extent(index),
            Entity::GroupHeader(group) => {
                state.item_extent(group * state.group_size.unwrap_or(1))
            }
            Entity::ListHeader => Extent::new(0.0, HEADER_EXTENT),
            Entity::ListFooter => {
                let end = state.content_length();
                Extent::new(end - HEADER_EXTENT, end)
            }
        };
        future::ready(Ok(extent)).boxed()
    }

    fn scroll_position(&self) -> f32 {
        self.state.lock().scroll
    }

    fn max_scroll_position(&self) -> f32 {
        (self.state.lock().content_length() - VIEWPORT.height).max(0.0)
    }

    fn set_scroll_position(&self, position: f32) {
        self.state.lock().scroll = position;
    }

    fn viewport_size(&self) -> Size {
        let hook = self.state.lock().viewport_hook.clone();
        if let Some(hook) = hook {
            hook();
        }
        VIEWPORT
    }

    fn change_focus(&self, entity: Entity, change: FocusChange) {
        let mut state = self.state.lock();
        if let Some(scroll_to) = change.scroll_to {
            state.scroll = scroll_to;
        }
        state.focus_changes.push((entity, change));
    }

    fn ensure_visible(&self, entity: Entity) {
        self.state.lock().ensured_visible.push(entity);
    }

    fn realized_items(&self) -> Vec<usize> {
        let state = self.state.lock();
        let end = state.realized.end.min(state.count());
        (state.realized.start..end).collect()
    }

    fn item_flags(&self, index: usize) -> Option<ItemFlags> {
        let state = self.state.lock();
        if !state.realized.contains(&index) || index >= state.count() {
            return None;
        }
        Some(ItemFlags {
            non_selectable: state.non_selectable.contains(&index),
            non_draggable: state.non_draggable.contains(&index),
        })
    }

    fn set_drag_source(&self, index: usize, marked: bool) {
        let mut state = self.state.lock();
        if marked {
            state.marked.insert(index);
        } else {
            state.marked.remove(&index);
        }
    }

    fn is_animating(&self) -> bool {
        self.state.lock().animating
    }
}

impl GroupSource for FakeHost {
    fn group_count(&self) -> usize {
        let state = self.state.lock();
        match state.group_size {
            Some(size) => state.count().div_ceil(size),
            None => 0,
        }
    }

    fn group_of_item(&self, index: usize) -> Option<usize> {
        self.state.lock().group_size.map(|size| index / size)
    }
}

impl SelectionStore for FakeHost {
    fn snapshot(&self) -> IndexSelection {
        self.state.lock().selection.clone()
    }

    fn add_ranges(&self, ranges: &[SelectionRange]) {
        let mut state = self.state.lock();
        for range in ranges {
            state.selection.add_range(*range);
        }
        state.add_calls.push(ranges.to_vec());
    }

    fn set_ranges(&self, ranges: &[SelectionRange]) {
        let mut state = self.state.lock();
        state.selection = IndexSelection::from_ranges(ranges.iter().copied());
        state.set_calls.push(ranges.to_vec());
    }

    fn remove_indices(&self, indices: &[usize]) {
        let mut state = self.state.lock();
        let count = state.count();
        state.selection.materialize(count);
        for &index in indices {
            state.selection.remove(index);
        }
    }

    fn remove_key(&self, key: &ItemKey) {
        let mut state = self.state.lock();
        state.removed_keys.push(key.to_string());
        if let Some(position) = state.position(key) {
            let count = state.count();
            state.selection.materialize(count);
            state.selection.remove(position);
        }
    }

    fn set_key_range(&self, first: &ItemKey, last: &ItemKey) {
        let mut state = self.state.lock();
        if let (Some(first), Some(last)) = (state.position(first), state.position(last)) {
            state.selection = IndexSelection::from_ranges([SelectionRange::new(first, last)]);
        }
    }

    fn clear(&self) {
        self.state.lock().selection.clear();
    }

    fn select_all(&self) {
        self.state.lock().selection = IndexSelection::everything();
    }

    fn pivot(&self) -> Option<usize> {
        self.state.lock().pivot
    }

    fn set_pivot(&self, pivot: Option<usize>) {
        self.state.lock().pivot = pivot;
    }

    fn focused(&self) -> Entity {
        self.state.lock().focused
    }

    fn set_focused(&self, entity: Entity) {
        self.state.lock().focused = entity;
    }
}

struct FakeBatch<'a> {
    host: &'a FakeHost,
    moves: Vec<Edit>,
}

impl EditBatch for FakeBatch<'_> {
    fn move_to_start(&mut self, key: &ItemKey) {
        self.moves.push(Edit::MoveToStart(key.to_string()));
    }

    fn move_before(&mut self, key: &ItemKey, anchor: &ItemKey) {
        self.moves
            .push(Edit::MoveBefore(key.to_string(), anchor.to_string()));
    }

    fn move_after(&mut self, key: &ItemKey, anchor: &ItemKey) {
        self.moves
            .push(Edit::MoveAfter(key.to_string(), anchor.to_string()));
    }

    fn end_edits(self: Box<Self>) {
        let mut state = self.host.state.lock();
        for edit in &self.moves {
            state.apply(edit);
        }
        state.edits.extend(self.moves);
        state.batches += 1;
    }
}

impl ItemSource for FakeHost {
    fn key_at(&self, index: usize) -> Option<ItemKey> {
        self.state
            .lock()
            .keys
            .get(index)
            .map(|key| ItemKey::new(key.as_str()))
    }

    fn begin_edits(&self) -> Box<dyn EditBatch + '_> {
        Box::new(FakeBatch {
            host: self,
            moves: Vec::new(),
        })
    }
}

impl DropLayout for FakeHost {
    fn hit_test(&self, _position: Point) -> InsertPoint {
        let mut state = self.state.lock();
        state.hit_tests += 1;
        state.insert_point
    }

    fn drag_over(&self, _position: Point, insert_point: InsertPoint) {
        self.state.lock().drag_overs.push(insert_point);
    }

    fn drag_leave(&self) {
        self.state.lock().drag_leaves += 1;
    }
}

impl BrowseEvents for FakeHost {
    fn keyboard_navigating(&self, event: &NavigatingEvent) -> Verdict {
        let mut state = self.state.lock();
        state.notices.push(Notice::Navigating(event.old, event.new));
        Verdict::from(!state.veto_navigation)
    }

    fn selection_changing(&self, event: &mut SelectionChangingEvent) -> Verdict {
        let mut state = self.state.lock();
        state
            .notices
            .push(Notice::SelectionChanging(event.new_selection().clone()));
        if state.prevent_tap {
            event.prevent_tap_behavior();
        }
        if let Some(confirmation) = state.confirmation.take() {
            event.set_promise(confirmation);
        }
        Verdict::from(!state.veto_selection)
    }

    fn item_invoked(&self, event: &InvokedEvent<'_>) -> Verdict {
        let mut state = self.state.lock();
        state.notices.push(Notice::Invoked(event.entity));
        Verdict::from(!state.veto_invoke)
    }

    fn group_header_invoked(&self, event: &InvokedEvent<'_>) -> Verdict {
        self.notify(Notice::Invoked(event.entity));
        Verdict::Allow
    }

    fn item_drag_start(&self, event: &mut DragStartEvent<'_>) {
        self.notify(Notice::DragStart(event.drag_set.clone()));
    }

    fn item_drag_changed(&self, event: &DragChangedEvent<'_>) {
        self.notify(Notice::DragChanged(event.drag_set.clone()));
    }

    fn item_drag_end(&self, _event: &DragEndEvent<'_>) {
        self.notify(Notice::DragEnd);
    }

    fn item_drag_enter(&self, _event: &DragEnterEvent<'_>) -> Verdict {
        let mut state = self.state.lock();
        state.notices.push(Notice::DragEnter);
        Verdict::from(state.accept_enter)
    }

    fn item_drag_between(&self, event: &DragBetweenEvent<'_>) -> Verdict {
        let mut state = self.state.lock();
        state.notices.push(Notice::DragBetween(event.insert_point));
        Verdict::from(!state.veto_between)
    }

    fn item_drag_drop(&self, event: &DragDropEvent<'_>) -> Verdict {
        let mut state = self.state.lock();
        state.notices.push(Notice::DragDrop(event.insert_point));
        Verdict::from(!state.veto_drop)
    }

    fn item_drag_leave(&self, _event: &DragLeaveEvent<'_>) {
        self.notify(Notice::DragLeave);
    }
}

/// A controller wired to a [`FakeHost`] and a [`ManualScheduler`].
pub struct Harness {
    pub host: Arc<FakeHost>,
    pub scheduler: Arc<ManualScheduler>,
    pub browse: BrowseMode,
}

/// A clock that only moves when told to.
pub struct TestClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl TestClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

impl Harness {
    pub fn new(config: BrowseConfig, count: usize) -> Self {
        Self::with_host(config, FakeHost::new(count))
    }

    pub fn with_host(config: BrowseConfig, host: Arc<FakeHost>) -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        Self::with_clock(config, host, scheduler.clone(), scheduler)
    }

    /// Builds a harness whose elapsed time comes from `clock` rather than
    /// the scheduler's virtual time.
    pub fn with_clock(
        config: BrowseConfig,
        host: Arc<FakeHost>,
        scheduler: Arc<ManualScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        init_tracing();
        let collaborators = Collaborators {
            site: host.clone(),
            groups: host.clone(),
            selection: host.clone(),
            items: host.clone(),
            layout: host.clone(),
            events: host.clone(),
            scheduler: scheduler.clone(),
            clock,
        };
        Self {
            browse: BrowseMode::new(config, collaborators),
            host,
            scheduler,
        }
    }

    /// Presses the item at `index`.
    pub fn press(&self, index: usize) {
        self.browse
            .on_pointer_down(&PointerEvent::on(Entity::Item(index), Point::new(20.0, 20.0)));
    }

    /// Presses `index` and starts a drag from it.
    pub fn start_drag(&self, index: usize) -> Option<Arc<DragData>> {
        self.press(index);
        self.browse.on_drag_start(DragData::new())
    }

    /// A drag event at viewport height `y`.
    pub fn drag_at(&self, y: f32) -> DragEvent {
        DragEvent::new(Point::new(150.0, y), Arc::new(DragData::new()))
    }

    pub fn clear_notices(&self) {
        self.host.with(|state| state.notices.clear());
    }
}
