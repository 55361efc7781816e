// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use ccf_structures::StructureId;

/// Result type for hierarchy operations
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Errors raised while building or querying the structure tree.
///
/// An acronym that matches nothing is not an error: lookups return `None`.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("Malformed structure_id_path '{path}' in row {row}: bad token '{token}'")]
    MalformedPath {
        row: usize,
        path: String,
        token: String,
    },

    #[error("Unknown structure ID: {0}")]
    UnknownStructureId(StructureId),

    #[error("Duplicate structure ID in structure tree: {0}")]
    DuplicateStructureId(StructureId),

    #[error("Duplicate acronym in structure tree: '{0}'")]
    DuplicateAcronym(String),

    #[error("Structure tree contains no records")]
    EmptyStructureTable,

    #[error("Structure tree file not found: {0}")]
    StructureTreeNotFound(PathBuf),

    #[error("Failed to parse structure tree CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read structure tree: {0}")]
    Io(#[from] std::io::Error),
}
