//! Focusable entities and drop locations.
//!
//! An [`Entity`] is anything that can hold keyboard focus in a list view:
//! an item, a group header, the list header or the list footer. Items and
//! group headers are indexed in separate index spaces, so an index is only
//! meaningful together with its kind.
//!
//! Navigation candidates coming back from geometry providers are
//! unvalidated and may be out of range; they travel as [`RawTarget`] until
//! they have been checked against the bound for their own kind.

use std::fmt;

/// The four kinds of focusable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A data item.
    Item,
    /// The header of a group of items.
    GroupHeader,
    /// The header of the whole list.
    ListHeader,
    /// The footer of the whole list.
    ListFooter,
}

impl EntityKind {
    /// Returns true for the list header and list footer.
    pub fn is_list_chrome(self) -> bool {
        matches!(self, Self::ListHeader | Self::ListFooter)
    }
}

/// A validated focus or selection target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// The item at the given index.
    Item(usize),
    /// The group header at the given group index.
    GroupHeader(usize),
    /// The list header.
    ListHeader,
    /// The list footer.
    ListFooter,
}

impl Entity {
    /// Builds an entity of `kind` at `index`.
    ///
    /// The list header and footer ignore `index`.
    pub fn new(kind: EntityKind, index: usize) -> Self {
        match kind {
            EntityKind::Item => Self::Item(index),
            EntityKind::GroupHeader => Self::GroupHeader(index),
            EntityKind::ListHeader => Self::ListHeader,
            EntityKind::ListFooter => Self::ListFooter,
        }
    }

    /// The entity's kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Item(_) => EntityKind::Item,
            Self::GroupHeader(_) => EntityKind::GroupHeader,
            Self::ListHeader => EntityKind::ListHeader,
            Self::ListFooter => EntityKind::ListFooter,
        }
    }

    /// The entity's index within its kind. Always 0 for the header and footer.
    pub fn index(&self) -> usize {
        match self {
            Self::Item(index) | Self::GroupHeader(index) => *index,
            Self::ListHeader | Self::ListFooter => 0,
        }
    }

    /// The item index, if this is an item.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Item(index) => Some(*index),
            _ => None,
        }
    }

}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(index) => write!(f, "item {index}"),
            Self::GroupHeader(index) => write!(f, "group header {index}"),
            Self::ListHeader => write!(f, "list header"),
            Self::ListFooter => write!(f, "list footer"),
        }
    }
}

/// An unvalidated navigation candidate.
///
/// The index may lie outside the valid range for `kind` (for example one
/// past the last item after pressing Down on it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawTarget {
    /// Kind of entity targeted.
    pub kind: EntityKind,
    /// Candidate index, possibly out of range.
    pub index: i64,
}

impl RawTarget {
    /// Creates a new candidate.
    pub const fn new(kind: EntityKind, index: i64) -> Self {
        Self { kind, index }
    }

    /// Candidate item index.
    pub const fn item(index: i64) -> Self {
        Self::new(EntityKind::Item, index)
    }

    /// Validates against the inclusive upper `bound` for this kind.
    ///
    /// With `clamp` the index is pulled into `[0, bound]`; otherwise an out
    /// of range index yields `None`. A negative bound (empty index space)
    /// always yields `None`.
    pub fn validate(&self, bound: i64, clamp: bool) -> Option<Entity> {
        if bound < 0 {
            return None;
        }
        let index = if clamp {
            self.index.clamp(0, bound)
        } else if (0..=bound).contains(&self.index) {
            self.index
        } else {
            return None;
        };
        Some(Entity::new(self.kind, index as usize))
    }
}

/// A candidate drop location in the ordered list.
///
/// `insert_after_index` ranges over `[-1, count - 1]`; `-1` means "before the
/// first item".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsertPoint {
    /// Zero-based slot index reported by the layout.
    pub index: i64,
    /// The item the dropped items would follow.
    pub insert_after_index: i64,
}

impl InsertPoint {
    /// Creates a new insert point.
    pub const fn new(index: i64, insert_after_index: i64) -> Self {
        Self {
            index,
            insert_after_index,
        }
    }

    /// Clamps `insert_after_index` into `[-1, count - 1]`.
    pub fn clamped(self, count: usize) -> Self {
        let last = count as i64 - 1;
        Self {
            index: self.index,
            insert_after_index: self.insert_after_index.clamp(-1, last.max(-1)),
        }
    }
}
