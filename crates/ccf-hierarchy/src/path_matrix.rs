// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
PathMatrix - fixed-width numeric encoding of the structure tree.

Each `structure_id_path` (`/997/8/567/`) becomes one row of ancestor IDs in
root-to-leaf order, right-padded with [`PATH_PADDING`]. Row `r` belongs to
record `r` of the table it was built from.
*/

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{HierarchyError, HierarchyResult};
use ccf_structures::{StructureId, StructureRecord};

/// Sentinel for "no structure at this depth"
pub const PATH_PADDING: StructureId = 0;

/// Minimum column count, deep enough for the CCF 2017 tree
pub const MIN_PATH_DEPTH: usize = 11;

/// Rectangular ancestor-chain table, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatrix {
    values: Array2<StructureId>,
}

impl PathMatrix {
    pub fn values(&self) -> ArrayView2<'_, StructureId> {
        self.values.view()
    }

    pub fn row_count(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (maximum encodable depth)
    pub fn depth(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, StructureId> {
        self.values.index_axis(Axis(0), index)
    }

    /// Row `index` without its padding: the full ancestor chain, self last
    pub fn chain(&self, index: usize) -> Vec<StructureId> {
        self.row(index)
            .iter()
            .copied()
            .take_while(|&id| id != PATH_PADDING)
            .collect()
    }

    /// Whether `id` occurs anywhere in the matrix
    pub fn contains(&self, id: StructureId) -> bool {
        id != PATH_PADDING && self.values.iter().any(|&value| value == id)
    }
}

/// Build the path matrix for `structures`, one row per record in order.
///
/// # Errors
///
/// Returns [`HierarchyError::MalformedPath`] when a path segment is not a
/// positive integer, when a segment between two slashes is empty, or when the
/// path names no structure at all.
///
/// Stricter than rejecting only non-numeric tokens: a `0` segment and an empty
/// interior segment (`/997//8/`) both fail, since 0 is the padding value.
pub fn build_path_matrix(structures: &[StructureRecord]) -> HierarchyResult<PathMatrix> {
    let chains = structures
        .iter()
        .enumerate()
        .map(|(row, record)| parse_structure_id_path(row, &record.structure_id_path))
        .collect::<HierarchyResult<Vec<_>>>()?;

    let depth = chains
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(MIN_PATH_DEPTH);

    let mut values = Array2::from_elem((chains.len(), depth), PATH_PADDING);
    for (row, chain) in chains.iter().enumerate() {
        for (col, &id) in chain.iter().enumerate() {
            values[[row, col]] = id;
        }
    }

    tracing::debug!(
        target: "ccf-hierarchy",
        "Built path matrix: {} rows x {} columns",
        values.nrows(),
        values.ncols()
    );

    Ok(PathMatrix { values })
}

/// Split `/id1/id2/.../idN/` into its IDs.
///
/// The leading empty segment and one trailing empty segment are discarded.
fn parse_structure_id_path(row: usize, path: &str) -> HierarchyResult<Vec<StructureId>> {
    let malformed = |token: &str| HierarchyError::MalformedPath {
        row,
        path: path.to_string(),
        token: token.to_string(),
    };

    let trimmed = path.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let body = body.strip_suffix('/').unwrap_or(body);
    if body.is_empty() {
        return Err(malformed(""));
    }

    body.split('/')
        .map(|token| match token.parse::<StructureId>() {
            Ok(PATH_PADDING) | Err(_) => Err(malformed(token)),
            Ok(id) => Ok(id),
        })
        .collect()
}
