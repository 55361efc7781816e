// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::AHashSet;

use crate::StructureId;

/// A structure ID plus every ID nested beneath it.
///
/// Unordered; use [`DescendantSet::to_sorted_vec`] when a stable order is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescendantSet {
    ids: AHashSet<StructureId>,
}

impl DescendantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding only `id`
    pub fn single(id: StructureId) -> Self {
        let mut set = Self::new();
        set.insert(id);
        set
    }

    /// Returns `true` if the ID was not present yet
    pub fn insert(&mut self, id: StructureId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: StructureId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StructureId> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_sorted_vec(&self) -> Vec<StructureId> {
        let mut ids: Vec<StructureId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<StructureId> for DescendantSet {
    fn from_iter<T: IntoIterator<Item = StructureId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<StructureId> for DescendantSet {
    fn extend<T: IntoIterator<Item = StructureId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_and_sorted_order() {
        let set: DescendantSet = [997, 8, 997, 1].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_sorted_vec(), vec![1, 8, 997]);
    }

    #[test]
    fn test_single() {
        let set = DescendantSet::single(42);
        assert!(set.contains(42));
        assert!(!set.contains(0));
        assert_eq!(set.len(), 1);
    }
}
