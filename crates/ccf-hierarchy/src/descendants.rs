// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Descendant resolution over a [`PathMatrix`].
//!
//! A row "contains" a structure whenever that structure lies on the row's
//! ancestor chain. Everything after the structure on such a row is beneath it,
//! so the subtree is the union of those row tails. The Allen table gives every
//! structure its own row, in which case the union is simply the set of row IDs
//! whose chain passes through the target; tables listing only leaves still
//! resolve their intermediate levels.

use ccf_structures::{DescendantSet, StructureId};

use crate::error::{HierarchyError, HierarchyResult};
use crate::path_matrix::{PathMatrix, PATH_PADDING};

/// Every ID at or below `target_id`, including `target_id` itself.
///
/// # Errors
///
/// Returns [`HierarchyError::UnknownStructureId`] if no row mentions `target_id`.
pub fn find_descendants(
    target_id: StructureId,
    matrix: &PathMatrix,
) -> HierarchyResult<DescendantSet> {
    let hits = rows_containing(target_id, matrix);
    if hits.is_empty() {
        return Err(HierarchyError::UnknownStructureId(target_id));
    }

    // Leaf: a single row that ends at the target
    if let [(row, col)] = hits.as_slice() {
        if matrix.row(*row).iter().skip(*col + 1).all(|&id| id == PATH_PADDING) {
            return Ok(DescendantSet::single(target_id));
        }
    }

    let mut descendants = DescendantSet::single(target_id);
    for (row, col) in hits {
        descendants.extend(
            matrix.row(row).iter().skip(col + 1).copied().take_while(|&id| id != PATH_PADDING),
        );
    }

    tracing::debug!(
        target: "ccf-hierarchy",
        "Structure {} resolves to {} IDs",
        target_id,
        descendants.len()
    );
    Ok(descendants)
}

/// IDs exactly one level below `target_id` (the column after the target on each row).
///
/// # Errors
///
/// Returns [`HierarchyError::UnknownStructureId`] if no row mentions `target_id`.
pub fn find_direct_children(
    target_id: StructureId,
    matrix: &PathMatrix,
) -> HierarchyResult<DescendantSet> {
    let hits = rows_containing(target_id, matrix);
    if hits.is_empty() {
        return Err(HierarchyError::UnknownStructureId(target_id));
    }

    Ok(hits
        .into_iter()
        .filter_map(|(row, col)| matrix.row(row).get(col + 1).copied())
        .filter(|&id| id != PATH_PADDING)
        .collect())
}

/// `(row, column of first occurrence)` for every row whose chain holds `target_id`
fn rows_containing(target_id: StructureId, matrix: &PathMatrix) -> Vec<(usize, usize)> {
    if target_id == PATH_PADDING {
        return Vec::new();
    }
    matrix
        .values()
        .rows()
        .into_iter()
        .enumerate()
        .filter_map(|(row, values)| {
            values
                .iter()
                .position(|&id| id == target_id)
                .map(|col| (row, col))
        })
        .collect()
}
