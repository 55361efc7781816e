// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
StructureTree - owner of a loaded structure table and its path matrix.

The matrix is built once when the tree is constructed and never mutated, so a
tree can be shared by reference between every query site. Independently loaded
atlases get independent trees.
*/

use std::io::Read;
use std::path::Path;

use ahash::AHashMap;

use crate::csv_loader::{load_structure_records, read_structure_records};
use crate::descendants::{find_descendants, find_direct_children};
use crate::error::{HierarchyError, HierarchyResult};
use crate::lookup::warn_acronym_not_found;
use crate::path_matrix::{build_path_matrix, PathMatrix};
use ccf_structures::{DescendantSet, RegionInfo, StructureId, StructureRecord};

/// Structure records plus the indices and path matrix derived from them
#[derive(Debug, Clone)]
pub struct StructureTree {
    records: Vec<StructureRecord>,
    matrix: PathMatrix,
    by_id: AHashMap<StructureId, usize>,
    by_acronym: AHashMap<String, usize>,
}

impl StructureTree {
    /// Build a tree from records in table order.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the table is empty
    /// - an ID or acronym occurs twice
    /// - a `structure_id_path` is malformed
    pub fn from_records(records: Vec<StructureRecord>) -> HierarchyResult<Self> {
        if records.is_empty() {
            return Err(HierarchyError::EmptyStructureTable);
        }

        let mut by_id = AHashMap::with_capacity(records.len());
        let mut by_acronym = AHashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id, index).is_some() {
                return Err(HierarchyError::DuplicateStructureId(record.id));
            }
            if by_acronym.insert(record.acronym.clone(), index).is_some() {
                return Err(HierarchyError::DuplicateAcronym(record.acronym.clone()));
            }
        }

        let matrix = build_path_matrix(&records)?;

        for (index, record) in records.iter().enumerate() {
            if matrix.chain(index).last() != Some(&record.id) {
                tracing::warn!(
                    target: "ccf-hierarchy",
                    "Structure {} ({}) has path '{}' that does not end with its own ID",
                    record.id,
                    record.acronym,
                    record.structure_id_path
                );
            }
        }

        Ok(Self {
            records,
            matrix,
            by_id,
            by_acronym,
        })
    }

    /// Load and index the structure tree CSV at `path`
    pub fn from_csv_path(path: &Path) -> HierarchyResult<Self> {
        Self::from_records(load_structure_records(path)?)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> HierarchyResult<Self> {
        Self::from_records(read_structure_records(reader)?)
    }

    pub fn matrix(&self) -> &PathMatrix {
        &self.matrix
    }

    pub fn records(&self) -> &[StructureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: StructureId) -> Option<&StructureRecord> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    /// The structure and everything beneath it
    pub fn find_descendants(&self, id: StructureId) -> HierarchyResult<DescendantSet> {
        find_descendants(id, &self.matrix)
    }

    pub fn find_direct_children(&self, id: StructureId) -> HierarchyResult<DescendantSet> {
        find_direct_children(id, &self.matrix)
    }

    /// Exact, case-sensitive acronym lookup; misses are logged and return `None`
    pub fn lookup_by_acronym(&self, acronym: &str) -> Option<&StructureRecord> {
        let found = self.by_acronym.get(acronym).map(|&index| &self.records[index]);
        if found.is_none() {
            warn_acronym_not_found(acronym);
        }
        found
    }

    /// ID, name and acronym for `acronym`, if known
    pub fn region_info(&self, acronym: &str) -> Option<RegionInfo> {
        self.lookup_by_acronym(acronym).map(StructureRecord::region_info)
    }

    /// Resolve a batch of acronyms, skipping (and logging) the unknown ones
    pub fn resolve_acronyms<S: AsRef<str>>(&self, acronyms: &[S]) -> Vec<&StructureRecord> {
        acronyms
            .iter()
            .filter_map(|acronym| self.lookup_by_acronym(acronym.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<StructureRecord> {
        vec![
            StructureRecord::new(997, "root", "root", "/997/"),
            StructureRecord::new(8, "grey", "Basic cell groups and regions", "/997/8/"),
            StructureRecord::new(567, "CH", "Cerebrum", "/997/8/567/"),
            StructureRecord::new(343, "BS", "Brain stem", "/997/8/343/"),
        ]
    }

    #[test]
    fn test_tree_creation() {
        let tree = StructureTree::from_records(records()).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.matrix().row_count(), 4);
        assert_eq!(tree.get(567).map(|r| r.acronym.as_str()), Some("CH"));
        assert!(tree.get(1).is_none());
    }

    #[test]
    fn test_queries_share_matrix() {
        let tree = StructureTree::from_records(records()).unwrap();
        assert_eq!(
            tree.find_descendants(8).unwrap().to_sorted_vec(),
            vec![8, 343, 567]
        );
        assert_eq!(tree.find_descendants(343).unwrap().to_sorted_vec(), vec![343]);
        assert_eq!(
            tree.find_direct_children(997).unwrap().to_sorted_vec(),
            vec![8]
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            StructureTree::from_records(Vec::new()),
            Err(HierarchyError::EmptyStructureTable)
        ));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut dup_id = records();
        dup_id.push(StructureRecord::new(8, "grey2", "dup", "/997/8/"));
        assert!(matches!(
            StructureTree::from_records(dup_id),
            Err(HierarchyError::DuplicateStructureId(8))
        ));

        let mut dup_acronym = records();
        dup_acronym.push(StructureRecord::new(9, "CH", "dup", "/997/9/"));
        assert!(matches!(
            StructureTree::from_records(dup_acronym),
            Err(HierarchyError::DuplicateAcronym(_))
        ));
    }

    #[test]
    fn test_region_info_and_batch() {
        let tree = StructureTree::from_records(records()).unwrap();
        let info = tree.region_info("BS").unwrap();
        assert_eq!(info.id, 343);
        assert_eq!(info.name, "Brain stem");
        assert!(tree.region_info("bs").is_none());

        let resolved: Vec<StructureId> = tree
            .resolve_acronyms(&["CH", "missing", "BS"])
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(resolved, vec![567, 343]);
    }
}
