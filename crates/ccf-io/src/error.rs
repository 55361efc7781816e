// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for atlas loading and fetching.

use std::path::PathBuf;

use ccf_hierarchy::HierarchyError;
use ccf_structures::{AtlasDataError, Resolution};
use thiserror::Error;

/// Result type for atlas I/O operations.
pub type AtlasIoResult<T> = Result<T, AtlasIoError>;

#[derive(Debug, Error)]
pub enum AtlasIoError {
    /// The annotation volume for a resolution is absent and could not be fetched
    #[error("annotation volume for {resolution} not found at {path}")]
    AtlasFileNotFound { path: PathBuf, resolution: Resolution },

    /// Malformed NRRD header or payload
    #[error("invalid NRRD: {0}")]
    InvalidNrrd(String),

    /// Well-formed NRRD using a feature this reader does not handle
    #[error("unsupported NRRD: {0}")]
    UnsupportedNrrd(String),

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Data(#[from] AtlasDataError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl AtlasIoError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidNrrd(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedNrrd(message.into())
    }
}
