//! Selection value types.
//!
//! This module provides [`IndexSelection`], an immutable-by-default value
//! describing a set of selected item indices as sorted, disjoint ranges. The
//! browse-mode controller uses it for hypothetical selections handed to the
//! host during the selection-changing protocol, and for drag sets.
//!
//! The live selection itself is owned by the host through
//! [`SelectionStore`](crate::site::SelectionStore); an `IndexSelection` is a
//! detached snapshot and never writes back.
//!
//! # Example
//!
//! ```
//! use lattice_browse::selection::{IndexSelection, SelectionRange};
//!
//! let mut selection = IndexSelection::from_ranges([SelectionRange::new(2, 4)]);
//! selection.add(5);
//! assert_eq!(selection.ranges(), &[SelectionRange::new(2, 5)]);
//!
//! selection.remove(3);
//! assert!(!selection.contains(3));
//! assert_eq!(selection.len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selection behavior mode for the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// No items can be selected.
    NoSelection,
    /// Only one item can be selected at a time.
    #[default]
    SingleSelection,
    /// Multiple items; a plain tap toggles membership.
    MultiSelection,
    /// Multiple items with Shift/Ctrl range extension.
    ExtendedSelection,
}

impl SelectionMode {
    /// Returns true if anything can be selected.
    pub fn allows_selection(self) -> bool {
        self != Self::NoSelection
    }

    /// Returns true if more than one item may be selected.
    pub fn is_multi(self) -> bool {
        matches!(self, Self::MultiSelection | Self::ExtendedSelection)
    }
}

/// Stable identity of an item in the ordered data source.
///
/// Keys survive reordering; indices do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    /// Creates a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// An inclusive range of item indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    /// First index in the range.
    pub first: usize,
    /// Last index in the range (inclusive).
    pub last: usize,
}

impl SelectionRange {
    /// Creates a range, swapping the ends if they are reversed.
    pub fn new(first: usize, last: usize) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// A range holding exactly one index.
    pub fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false; a range holds at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `index` lies inside the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }
}

/// A detached set of selected indices.
///
/// Ranges are kept sorted, disjoint and non-adjacent. The "everything"
/// state produced by select-all is tracked explicitly because the item
/// count may change underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSelection {
    ranges: Vec<SelectionRange>,
    everything: bool,
}

impl IndexSelection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The select-all selection.
    pub fn everything() -> Self {
        Self {
            ranges: Vec::new(),
            everything: true,
        }
    }

    /// A selection of one index.
    pub fn single(index: usize) -> Self {
        Self::from_ranges([SelectionRange::single(index)])
    }

    /// Builds a selection from arbitrary, possibly overlapping ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = SelectionRange>) -> Self {
        let mut selection = Self::new();
        for range in ranges {
            selection.add_range(range);
        }
        selection
    }

    /// Returns true for the select-all state.
    pub fn is_everything(&self) -> bool {
        self.everything
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        !self.everything && self.ranges.is_empty()
    }

    /// Number of selected indices, not counting the select-all state.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(SelectionRange::len).sum()
    }

    /// The sorted, disjoint ranges.
    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// Checks if an index is selected.
    pub fn contains(&self, index: usize) -> bool {
        if self.everything {
            return true;
        }
        self.range_containing(index).is_some()
    }

    /// The range that holds `index`, if any.
    pub fn range_containing(&self, index: usize) -> Option<SelectionRange> {
        let position = self.ranges.partition_point(|range| range.last < index);
        self.ranges
            .get(position)
            .filter(|range| range.contains(index))
            .copied()
    }

    /// Every selected index in ascending order.
    ///
    /// For the select-all state this expands against `count`.
    pub fn indices(&self, count: usize) -> Vec<usize> {
        if self.everything {
            return (0..count).collect();
        }
        self.ranges
            .iter()
            .flat_map(|range| range.first..=range.last)
            .filter(|&index| index < count)
            .collect()
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.everything = false;
    }

    /// Replaces the selection with one index.
    pub fn set(&mut self, index: usize) {
        self.clear();
        self.ranges.push(SelectionRange::single(index));
    }

    /// Adds one index.
    pub fn add(&mut self, index: usize) {
        self.add_range(SelectionRange::single(index));
    }

    /// Adds a range, merging with overlapping or adjacent ranges.
    pub fn add_range(&mut self, range: SelectionRange) {
        if self.everything {
            return;
        }

        let mut merged = range;
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for existing in self.ranges.drain(..) {
            let touches = existing.first <= merged.last.saturating_add(1)
                && merged.first <= existing.last.saturating_add(1);
            if touches {
                merged.first = merged.first.min(existing.first);
                merged.last = merged.last.max(existing.last);
            } else {
                kept.push(existing);
            }
        }
        let position = kept.partition_point(|existing| existing.last < merged.first);
        kept.insert(position, merged);
        self.ranges = kept;
    }

    /// Removes one index.
    ///
    /// Removing from the select-all state is not representable without an
    /// item count; callers expand it with [`Self::materialize`] first.
    pub fn remove(&mut self, index: usize) {
        let Some(position) = self.ranges.iter().position(|range| range.contains(index)) else {
            return;
        };
        let range = self.ranges.remove(position);
        let mut insert_at = position;
        if range.first < index {
            self.ranges
                .insert(insert_at, SelectionRange::new(range.first, index - 1));
            insert_at += 1;
        }
        if index < range.last {
            self.ranges
                .insert(insert_at, SelectionRange::new(index + 1, range.last));
        }
    }

    /// Toggles one index.
    pub fn toggle(&mut self, index: usize) {
        if self.contains(index) {
            self.remove(index);
        } else {
            self.add(index);
        }
    }

    /// Converts the select-all state into an explicit range over `count`.
    pub fn materialize(&mut self, count: usize) {
        if self.everything {
            self.everything = false;
            self.ranges.clear();
            if count > 0 {
                self.ranges.push(SelectionRange::new(0, count - 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_adjacent() {
        let mut selection = IndexSelection::new();
        selection.add(3);
        selection.add(5);
        assert_eq!(selection.ranges().len(), 2);

        selection.add(4);
        assert_eq!(selection.ranges(), &[SelectionRange::new(3, 5)]);
    }

    #[test]
    fn test_add_range_keeps_order() {
        let selection = IndexSelection::from_ranges([
            SelectionRange::new(10, 12),
            SelectionRange::new(0, 1),
            SelectionRange::new(5, 6),
        ]);
        assert_eq!(
            selection.ranges(),
            &[
                SelectionRange::new(0, 1),
                SelectionRange::new(5, 6),
                SelectionRange::new(10, 12),
            ]
        );
        assert_eq!(selection.len(), 7);
    }

    #[test]
    fn test_remove_splits_range() {
        let mut selection = IndexSelection::from_ranges([SelectionRange::new(2, 6)]);
        selection.remove(4);
        assert_eq!(
            selection.ranges(),
            &[SelectionRange::new(2, 3), SelectionRange::new(5, 6)]
        );

        selection.remove(2);
        selection.remove(6);
        assert_eq!(
            selection.ranges(),
            &[SelectionRange::single(3), SelectionRange::single(5)]
        );
    }

    #[test]
    fn test_toggle() {
        let mut selection = IndexSelection::single(1);
        selection.toggle(1);
        assert!(selection.is_empty());
        selection.toggle(7);
        assert!(selection.contains(7));
    }

    #[test]
    fn test_everything() {
        let mut selection = IndexSelection::everything();
        assert!(selection.contains(1_000));
        assert!(selection.is_everything());
        assert_eq!(selection.indices(3), vec![0, 1, 2]);

        selection.materialize(4);
        selection.remove(0);
        assert_eq!(selection.ranges(), &[SelectionRange::new(1, 3)]);
        assert!(!selection.is_everything());
    }

    #[test]
    fn test_range_containing() {
        let selection =
            IndexSelection::from_ranges([SelectionRange::new(2, 4), SelectionRange::new(8, 9)]);
        assert_eq!(selection.range_containing(3), Some(SelectionRange::new(2, 4)));
        assert_eq!(selection.range_containing(9), Some(SelectionRange::new(8, 9)));
        assert_eq!(selection.range_containing(6), None);
    }

    #[test]
    fn test_selection_range_normalizes() {
        assert_eq!(SelectionRange::new(7, 3), SelectionRange::new(3, 7));
        assert_eq!(SelectionRange::new(3, 7).len(), 5);
    }
}
