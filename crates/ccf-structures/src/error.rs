// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Result type for operations on the core atlas data structures
pub type AtlasDataResult<T> = Result<T, AtlasDataError>;

/// Common error type for atlas data operations.
///
/// # Examples
/// ```
/// use ccf_structures::{AtlasDataError, Resolution};
///
/// let err = Resolution::from_micrometers(30).unwrap_err();
/// assert!(matches!(err, AtlasDataError::UnsupportedResolution(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasDataError {
    /// Resolution outside the published set (10, 25, 50, 100 µm)
    #[error("Unsupported atlas resolution: {0} µm (supported: 10, 25, 50, 100)")]
    UnsupportedResolution(u32),

    /// Two arrays that must be voxel-aligned are not
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },
}
