//! The browse-mode controller facade.
//!
//! [`BrowseMode`] receives normalized pointer, keyboard and drag input from
//! the host and routes it to the sub-controllers:
//!
//! - [`FocusNavigator`] for arrow, page, Home and End keys
//! - [`SelectionController`] for taps, Space, Shift ranges and select-all
//! - [`DragReorderController`] for drags and Alt+Shift reordering
//!
//! # Example
//!
//! ```ignore
//! use lattice_browse::{BrowseConfig, BrowseMode, Collaborators, Key, KeyEvent};
//!
//! let browse = BrowseMode::new(BrowseConfig::default(), collaborators);
//! browse.on_key_down(KeyEvent::plain(Key::ArrowDown)).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::{BrowseConfig, TapBehavior};
use crate::drag::DragReorderController;
use crate::entity::Entity;
use crate::error::{BrowseError, Result};
use crate::focus::{FocusNavigator, NavigationOutcome};
use crate::input::{Key, KeyEvent, KeyboardModifiers, NavKey, PointerEvent};
use crate::logging::targets;
use crate::payload::{DragData, DragEvent};
use crate::select::{SelectIntent, SelectionController};
use crate::selection::SelectionMode;
use crate::site::{Collaborators, FocusChange};
use crate::state::{DragSession, Interaction, PressedState, Shared};

/// Browse-mode interaction controller for one list view.
///
/// Dropping the controller disposes it.
pub struct BrowseMode {
    shared: Arc<Shared>,
}

impl BrowseMode {
    /// Creates a controller wired to `collaborators`.
    pub fn new(config: BrowseConfig, collaborators: Collaborators) -> Self {
        Self {
            shared: Arc::new(Shared::new(config, collaborators)),
        }
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> BrowseConfig {
        self.shared.config()
    }

    /// Replaces the configuration.
    pub fn set_config(&self, config: BrowseConfig) {
        self.shared.set_config(config);
    }

    /// The focus navigator.
    pub fn focus(&self) -> FocusNavigator<'_> {
        FocusNavigator::new(&self.shared)
    }

    /// The selection controller.
    pub fn selection(&self) -> SelectionController<'_> {
        SelectionController::new(&self.shared)
    }

    /// The drag and reorder controller.
    pub fn drag(&self) -> DragReorderController<'_> {
        DragReorderController::new(&self.shared)
    }

    /// The current pointer press, if any.
    pub fn pressed(&self) -> Option<PressedState> {
        match &self.shared.state.lock().interaction {
            Interaction::Pressed(pressed) => Some(*pressed),
            _ => None,
        }
    }

    /// Returns true while a drag is over the list or in flight from it.
    pub fn is_dragging(&self) -> bool {
        self.shared.state.lock().interaction.session().is_some()
    }

    /// Returns true while autoscroll frames are running.
    pub fn is_autoscrolling(&self) -> bool {
        self.shared.state.lock().autoscroll.frame.is_pending()
    }

    /// Returns true once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handles a key press.
    ///
    /// Returns `Ok(true)` if the key was consumed.
    pub async fn on_key_down(&self, event: KeyEvent) -> Result<bool> {
        if self.shared.is_disposed() {
            return Err(BrowseError::Disposed);
        }
        let modifiers = event.modifiers;

        if let Some(direction) = event.key.navigation() {
            let reorder_chord = modifiers.alt && modifiers.shift && !modifiers.control;
            if reorder_chord && direction.is_arrow() {
                let on_item = self.shared.selection.focused().item_index().is_some();
                if on_item && self.shared.config().items_reorderable {
                    self.drag().keyboard_reorder(direction);
                    return Ok(true);
                }
            }
            self.navigate(direction, modifiers).await?;
            return Ok(true);
        }

        let config = self.shared.config();
        let focused = self.shared.selection.focused();
        match event.key {
            Key::Space if focused.item_index().is_some() => {
                if !config.selection_mode.allows_selection() {
                    return Ok(false);
                }
                self.selection().request(focused, SelectIntent::Toggle).await;
                self.shared.selection.set_pivot(None);
                Ok(true)
            }
            Key::Enter => Ok(self.invoke(focused)),
            Key::A if modifiers.control => {
                if !config.selection_mode.is_multi() {
                    return Ok(false);
                }
                self.selection().select_all();
                Ok(true)
            }
            Key::Escape => {
                self.shared.selection.set_pivot(None);
                let mut state = self.shared.state.lock();
                if matches!(state.interaction, Interaction::Pressed(_)) {
                    state.interaction = Interaction::Idle;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Moves focus in `direction`, extending the selection with Shift.
    ///
    /// Shift selects from the pivot to the new focus, Ctrl+Shift adds that
    /// range. Plain navigation clears the pivot.
    pub async fn navigate(
        &self,
        direction: NavKey,
        modifiers: KeyboardModifiers,
    ) -> Result<NavigationOutcome> {
        let old = self.shared.selection.focused();
        let skip_selection = modifiers.shift || modifiers.control;
        let outcome = self.focus().navigate(direction, skip_selection).await?;

        if let NavigationOutcome::Committed(Entity::Item(index)) = outcome {
            let mode = self.shared.config().selection_mode;
            if modifiers.shift && mode.is_multi() {
                let pivot = self.pivot_or(old, index);
                self.selection().select_range(pivot, index, modifiers.control);
            } else if !modifiers.shift {
                self.shared.selection.set_pivot(None);
            }
        }
        Ok(outcome)
    }

    /// The stored pivot, or the previously focused item stored as the new one.
    fn pivot_or(&self, previous: Entity, fallback: usize) -> usize {
        let store = &self.shared.selection;
        let pivot = store
            .pivot()
            .or(previous.item_index())
            .unwrap_or(fallback);
        store.set_pivot(Some(pivot));
        pivot
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Records a pointer press on an item or group header.
    pub fn on_pointer_down(&self, event: &PointerEvent) {
        if self.shared.is_disposed() {
            return;
        }
        if event.entity.kind().is_list_chrome() {
            return;
        }
        let mut state = self.shared.state.lock();
        if matches!(state.interaction, Interaction::Idle | Interaction::Pressed(_)) {
            state.interaction = Interaction::Pressed(PressedState {
                entity: event.entity,
                position: event.position,
                in_interactive_subtree: event.in_interactive_subtree,
            });
        }
    }

    /// Completes a click if the release lands on the pressed entity.
    ///
    /// Returns true if the release was handled as a click.
    pub async fn on_pointer_up(&self, event: &PointerEvent) -> bool {
        let pressed = {
            let mut state = self.shared.state.lock();
            match state.interaction {
                Interaction::Pressed(pressed) => {
                    state.interaction = Interaction::Idle;
                    pressed
                }
                _ => return false,
            }
        };
        if pressed.entity != event.entity || self.shared.is_disposed() {
            return false;
        }

        let entity = event.entity;
        let previous = self.shared.selection.focused();
        self.shared.selection.set_focused(entity);
        self.shared.site.change_focus(
            entity,
            FocusChange {
                scroll_to: None,
                keyboard: false,
                ensure_visible: true,
            },
        );

        let Entity::Item(index) = entity else {
            self.invoke(entity);
            return true;
        };

        let config = self.shared.config();
        let mode = config.selection_mode;
        let modifiers = event.modifiers;
        if modifiers.shift && mode == SelectionMode::ExtendedSelection {
            let pivot = self.pivot_or(previous, index);
            self.selection().select_range(pivot, index, modifiers.control);
            return true;
        }

        if modifiers.control && mode.is_multi() {
            self.selection().request(entity, SelectIntent::Toggle).await;
        } else {
            let intent = match config.tap_behavior {
                TapBehavior::ToggleSelect => Some(SelectIntent::Toggle),
                TapBehavior::DirectSelect if mode == SelectionMode::MultiSelection => {
                    Some(SelectIntent::Select)
                }
                TapBehavior::DirectSelect => Some(SelectIntent::SelectOnly),
                TapBehavior::None | TapBehavior::InvokeOnly => None,
            };
            if let Some(intent) = intent
                && mode.allows_selection()
            {
                self.selection().request_tap(entity, intent).await;
            }
            if config.tap_behavior.invokes() {
                self.invoke(entity);
            }
        }
        self.shared.selection.set_pivot(None);
        true
    }

    /// Drops the pending press.
    pub fn on_pointer_cancel(&self) {
        let mut state = self.shared.state.lock();
        if matches!(state.interaction, Interaction::Pressed(_)) {
            state.interaction = Interaction::Idle;
        }
    }

    /// Clears the press if its item was virtualized away.
    pub fn on_item_unrealized(&self, index: usize) {
        let mut state = self.shared.state.lock();
        if matches!(
            state.interaction,
            Interaction::Pressed(PressedState { entity: Entity::Item(pressed), .. }) if pressed == index
        ) {
            state.interaction = Interaction::Idle;
        }
    }

    /// Fires the invoke notification for `entity`.
    ///
    /// Returns false if the host vetoed it or the entity is not invokable.
    pub fn invoke(&self, entity: Entity) -> bool {
        if self.shared.is_disposed() {
            return false;
        }
        self.shared.events.invoked(entity, self.shared.items.as_ref())
    }

    // =========================================================================
    // Drag and drop
    // =========================================================================

    /// See [`DragReorderController::start`].
    pub fn on_drag_start(&self, data: DragData) -> Option<Arc<DragData>> {
        self.drag().start(data)
    }

    /// See [`DragReorderController::enter`].
    pub fn on_drag_enter(&self, event: &DragEvent) -> bool {
        self.drag().enter(event)
    }

    /// See [`DragReorderController::over`].
    pub fn on_drag_over(&self, event: &DragEvent) -> bool {
        self.drag().over(event)
    }

    /// See [`DragReorderController::leave`].
    pub fn on_drag_leave(&self) {
        self.drag().leave();
    }

    /// See [`DragReorderController::drop`].
    pub fn on_drop(&self, event: &DragEvent) -> bool {
        self.drag().drop(event)
    }

    /// See [`DragReorderController::end`].
    pub fn on_drag_end(&self) {
        self.drag().end();
    }

    /// The host's selection changed; refreshes an active drag set.
    pub fn on_selection_changed(&self) {
        self.drag().selection_changed();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Tears the controller down.
    ///
    /// Aborts in-flight navigation, stops autoscroll and the drag-leave
    /// timer, and resets interaction state. Callbacks that fire afterwards
    /// do nothing.
    pub fn dispose(&self) {
        if !self.shared.mark_disposed() {
            return;
        }
        let marked = {
            let mut state = self.shared.state.lock();
            if let Some(pending) = state.navigation.take() {
                pending.handle.abort();
            }
            state.autoscroll.stop();
            state.leave_timer.cancel();
            match std::mem::take(&mut state.interaction) {
                Interaction::Dragging(DragSession {
                    source: Some(source),
                    ..
                })
                | Interaction::Dropped(Some((source, _))) => source.marked,
                _ => Vec::new(),
            }
        };
        for index in marked {
            self.shared.site.set_drag_source(index, false);
        }
        tracing::debug!(target: targets::EVENTS, "browse mode disposed");
    }
}

impl Drop for BrowseMode {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for BrowseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowseMode")
            .field("config", &self.shared.config())
            .field("disposed", &self.shared.is_disposed())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(BrowseMode: Send, Sync);
