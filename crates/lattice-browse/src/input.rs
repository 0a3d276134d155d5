//! Normalized input descriptions.
//!
//! The host translates platform input into these types before handing it to
//! [`BrowseMode`](crate::BrowseMode).

use lattice_browse_core::Point;

use crate::entity::Entity;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
    };

    /// Alt + Shift modifiers (keyboard reorder chord).
    pub const ALT_SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: true,
    };
}

/// Keys the browse-mode controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Space bar.
    Space,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// The letter A (select all with Ctrl).
    A,
}

impl Key {
    /// The navigation direction for this key, if it navigates.
    pub fn navigation(self) -> Option<NavKey> {
        match self {
            Self::ArrowUp => Some(NavKey::Up),
            Self::ArrowDown => Some(NavKey::Down),
            Self::ArrowLeft => Some(NavKey::Left),
            Self::ArrowRight => Some(NavKey::Right),
            Self::PageUp => Some(NavKey::PageUp),
            Self::PageDown => Some(NavKey::PageDown),
            Self::Home => Some(NavKey::Home),
            Self::End => Some(NavKey::End),
            _ => None,
        }
    }
}

/// A navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
}

impl NavKey {
    /// Page keys clamp their target into bounds; arrows reject out of bounds.
    pub fn clamps_to_bounds(self) -> bool {
        matches!(self, Self::PageUp | Self::PageDown)
    }

    /// Returns true for the four arrow keys.
    pub fn is_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    /// Creates a key press.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }
}

/// A pointer press or release on an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The entity under the pointer.
    pub entity: Entity,
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// Modifiers held.
    pub modifiers: KeyboardModifiers,
    /// The pointer went down inside an interactive subtree (button, input)
    /// of the item.
    pub in_interactive_subtree: bool,
}

impl PointerEvent {
    /// A plain press on `entity`.
    pub fn on(entity: Entity, position: Point) -> Self {
        Self {
            entity,
            position,
            modifiers: KeyboardModifiers::NONE,
            in_interactive_subtree: false,
        }
    }

    /// Sets the held modifiers.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Marks the press as originating in an interactive subtree.
    pub fn in_interactive_subtree(mut self) -> Self {
        self.in_interactive_subtree = true;
        self
    }
}
