//! Keyboard focus navigation.
//!
//! [`FocusNavigator`] turns a navigation key into a target [`Entity`] and
//! commits it. Resolution asks the host's geometry for arrow and page keys
//! and computes Home/End locally. Committing validates the target against
//! the bound for its own kind, asks the host for permission, then measures
//! the old and new entities to decide whether the view has to scroll.
//!
//! Only one commit is in flight at a time. Starting a new commit aborts the
//! geometry lookups of the previous one, whose future then resolves to
//! [`NavigationOutcome::Canceled`] without touching any state.

use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};
use lattice_browse_core::GeometryError;

use crate::config::TapBehavior;
use crate::entity::{Entity, EntityKind, RawTarget};
use crate::error::{BrowseError, Result};
use crate::input::NavKey;
use crate::logging::targets;
use crate::select::{SelectIntent, SelectionController};
use crate::selection::SelectionMode;
use crate::site::FocusChange;
use crate::state::{PendingNavigation, Shared};

/// How a navigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Focus moved to the entity.
    Committed(Entity),
    /// The target was out of range for its kind; nothing changed.
    Invalid(EntityKind),
    /// The host vetoed the move; the old entity stays focused.
    Vetoed,
    /// There was no target, or a newer navigation superseded this one.
    Canceled,
}

impl NavigationOutcome {
    /// The newly focused entity, if focus moved.
    pub fn committed(self) -> Option<Entity> {
        match self {
            Self::Committed(entity) => Some(entity),
            _ => None,
        }
    }
}

/// Options for [`FocusNavigator::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOptions {
    /// Clamp an out of range target into bounds instead of rejecting it.
    pub clamp: bool,
    /// Do not let the selection follow focus.
    pub skip_selection: bool,
}

/// Resolves and commits keyboard focus moves.
pub struct FocusNavigator<'a> {
    shared: &'a Arc<Shared>,
}

impl<'a> FocusNavigator<'a> {
    pub(crate) fn new(shared: &'a Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Resolves `direction` from `current` into an unvalidated target.
    ///
    /// Returns `None` when there is no target at all (End on an empty list).
    pub async fn resolve(
        &self,
        direction: NavKey,
        current: Entity,
    ) -> std::result::Result<Option<RawTarget>, GeometryError> {
        match direction {
            NavKey::Home => Ok(self.home_target(current)),
            NavKey::End => Ok(self.end_target(current)),
            _ => self.shared.site.adjacent(current, direction).await.map(Some),
        }
    }

    fn home_target(&self, current: Entity) -> Option<RawTarget> {
        if self.shared.site.has_list_header() && current.kind() != EntityKind::Item {
            return Some(RawTarget::new(EntityKind::ListHeader, 0));
        }
        let kind = self.content_kind(current);
        (self.bound(kind) >= 0).then(|| RawTarget::new(kind, 0))
    }

    fn end_target(&self, current: Entity) -> Option<RawTarget> {
        if self.shared.site.has_list_footer() && current.kind() != EntityKind::Item {
            return Some(RawTarget::new(EntityKind::ListFooter, 0));
        }
        let kind = self.content_kind(current);
        let bound = self.bound(kind);
        (bound >= 0).then(|| RawTarget::new(kind, bound))
    }

    /// Items stay items and group headers stay group headers; the list
    /// header and footer fall back to the first kind of content.
    fn content_kind(&self, current: Entity) -> EntityKind {
        match current.kind() {
            kind if kind.is_list_chrome() => {
                if self.shared.groups.is_grouped() {
                    EntityKind::GroupHeader
                } else {
                    EntityKind::Item
                }
            }
            kind => kind,
        }
    }

    /// Inclusive upper bound for `kind`; negative when none exist.
    pub fn bound(&self, kind: EntityKind) -> i64 {
        match kind {
            EntityKind::Item => self.shared.last_item_index(),
            EntityKind::GroupHeader => self.shared.groups.group_count() as i64 - 1,
            EntityKind::ListHeader => {
                if self.shared.site.has_list_header() {
                    0
                } else {
                    -1
                }
            }
            EntityKind::ListFooter => {
                if self.shared.site.has_list_footer() {
                    0
                } else {
                    -1
                }
            }
        }
    }

    /// Validates `target` and moves focus to it.
    ///
    /// A geometry failure still applies the focus change and is then
    /// returned as [`BrowseError::Geometry`].
    #[tracing::instrument(skip(self), target = "lattice_browse::focus", level = "debug")]
    pub async fn commit(
        &self,
        target: RawTarget,
        old: Entity,
        options: CommitOptions,
    ) -> Result<NavigationOutcome> {
        if self.shared.is_disposed() {
            return Err(BrowseError::Disposed);
        }

        let bound = self.bound(target.kind);
        let Some(entity) = target.validate(bound, options.clamp) else {
            tracing::debug!(target: targets::FOCUS, ?target, bound, "navigation target out of range");
            return Ok(NavigationOutcome::Invalid(target.kind));
        };

        if entity != old && !self.shared.events.navigating(old, entity) {
            tracing::debug!(target: targets::FOCUS, %old, %entity, "navigation vetoed");
            return Ok(NavigationOutcome::Vetoed);
        }

        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut state = self.shared.state.lock();
            state.navigation_generation += 1;
            let generation = state.navigation_generation;
            if let Some(previous) = state.navigation.replace(PendingNavigation { generation, handle }) {
                previous.handle.abort();
            }
            generation
        };

        let site = self.shared.site.clone();
        let lookups = Abortable::new(
            async move {
                // An old entity that cannot be measured counts as offscreen.
                let (offscreen, old_error) = match site.entity_extent(old).await {
                    Ok(extent) => (
                        extent.is_outside(site.scroll_position(), self.shared.viewport_length()),
                        None,
                    ),
                    Err(error) => (true, Some(error)),
                };
                let new_extent = site.entity_extent(entity).await;
                (offscreen, old_error, new_extent)
            },
            registration,
        );
        let measured = lookups.await;

        {
            let mut state = self.shared.state.lock();
            if state
                .navigation
                .as_ref()
                .is_some_and(|pending| pending.generation == generation)
            {
                state.navigation = None;
            }
        }

        let Ok(measured) = measured else {
            tracing::trace!(target: targets::FOCUS, %entity, "navigation superseded");
            return Ok(NavigationOutcome::Canceled);
        };
        if self.shared.is_disposed() {
            return Ok(NavigationOutcome::Canceled);
        }

        let (offscreen, old_error, new_extent) = measured;
        let result = match new_extent {
            Ok(new_extent) if offscreen => {
                let viewport = self.shared.viewport_length();
                let scroll_to = if entity.index() > old.index() {
                    new_extent.end - viewport
                } else {
                    new_extent.begin
                };
                self.apply_focus(
                    entity,
                    FocusChange {
                        scroll_to: Some(scroll_to.max(0.0)),
                        keyboard: true,
                        ensure_visible: false,
                    },
                );
                match old_error {
                    Some(error) => {
                        tracing::warn!(target: targets::FOCUS, %old, %error, "geometry lookup failed");
                        Err(BrowseError::Geometry(error))
                    }
                    None => Ok(()),
                }
            }
            Ok(_) => {
                self.apply_focus(
                    entity,
                    FocusChange {
                        scroll_to: None,
                        keyboard: true,
                        ensure_visible: true,
                    },
                );
                Ok(())
            }
            Err(error) => {
                tracing::warn!(target: targets::FOCUS, %entity, %error, "geometry lookup failed");
                self.apply_focus(
                    entity,
                    FocusChange {
                        scroll_to: None,
                        keyboard: true,
                        ensure_visible: true,
                    },
                );
                Err(BrowseError::Geometry(error))
            }
        };

        if !options.skip_selection {
            self.follow_focus(entity).await;
        }

        result.map(|()| NavigationOutcome::Committed(entity))
    }

    /// Resolves and commits in one step.
    pub async fn navigate(
        &self,
        direction: NavKey,
        skip_selection: bool,
    ) -> Result<NavigationOutcome> {
        let old = self.shared.selection.focused();
        let Some(target) = self.resolve(direction, old).await? else {
            return Ok(NavigationOutcome::Canceled);
        };
        let options = CommitOptions {
            clamp: direction.clamps_to_bounds(),
            skip_selection,
        };
        self.commit(target, old, options).await
    }

    fn apply_focus(&self, entity: Entity, change: FocusChange) {
        self.shared.selection.set_focused(entity);
        self.shared.site.change_focus(entity, change);
    }

    /// With direct-select taps, selection follows keyboard focus in
    /// single and extended modes.
    async fn follow_focus(&self, entity: Entity) {
        let config = self.shared.config();
        let follows = config.tap_behavior == TapBehavior::DirectSelect
            && matches!(
                config.selection_mode,
                SelectionMode::SingleSelection | SelectionMode::ExtendedSelection
            );
        if follows && entity.kind() == EntityKind::Item {
            SelectionController::new(self.shared)
                .request(entity, SelectIntent::SelectOnly)
                .await;
        }
    }
}
