// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ccf_hierarchy::HierarchyError;
use ccf_structures::AtlasDataError;
use thiserror::Error;

/// Result type for mask, grid and mesh operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("scalar grid has no points")]
    EmptyGrid,

    #[error("grid spacing must be positive and finite, got {0:?}")]
    InvalidSpacing([f32; 3]),

    #[error("smoothing std dev must be non-negative and finite, got {0}")]
    InvalidSmoothing(f32),

    #[error("iso level must be finite, got {0}")]
    InvalidLevel(f32),

    #[error("grid holds {actual} values but its dimensions need {expected}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("unknown mesh format '{0}' (expected ply or stl)")]
    UnknownFormat(String),

    #[error(transparent)]
    Data(#[from] AtlasDataError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("legend JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
