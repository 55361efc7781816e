// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Atlas Loader - annotation volumes and the structure tree from an atlas folder.

A folder holds one `annotation_<res>.nrrd` per resolution plus the structure
tree CSV. Missing files are handed to the configured [`AtlasFetcher`]; with no
fetcher a missing volume is [`AtlasIoError::AtlasFileNotFound`].
*/

use std::path::{Path, PathBuf};

use ccf_hierarchy::StructureTree;
use ccf_structures::{LabelVolume, Resolution};

use crate::error::{AtlasIoError, AtlasIoResult};
use crate::fetch::AtlasFetcher;
use crate::nrrd::read_nrrd_file;
use crate::orientation::reorient_to_canonical;

/// File name of the structure tree inside an atlas folder
pub const STRUCTURE_TREE_FILE: &str = "structure_tree_safe_2017.csv";

/// Loads volumes and the structure tree from one atlas folder
pub struct AtlasLoader {
    folder: PathBuf,
    structure_tree_file: String,
    fetcher: Option<Box<dyn AtlasFetcher>>,
}

impl AtlasLoader {
    /// Loader for `folder` that never fetches
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            structure_tree_file: STRUCTURE_TREE_FILE.to_string(),
            fetcher: None,
        }
    }

    /// Fetch missing files through `fetcher`
    pub fn with_fetcher(mut self, fetcher: Box<dyn AtlasFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_structure_tree_file(mut self, file_name: impl Into<String>) -> Self {
        self.structure_tree_file = file_name.into();
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn can_fetch(&self) -> bool {
        self.fetcher.is_some()
    }

    pub fn annotation_path(&self, resolution: Resolution) -> PathBuf {
        self.folder.join(resolution.annotation_file_name())
    }

    pub fn structure_tree_path(&self) -> PathBuf {
        self.folder.join(&self.structure_tree_file)
    }

    /// Read the annotation volume at `resolution` in canonical orientation.
    ///
    /// # Errors
    ///
    /// - [`AtlasIoError::AtlasFileNotFound`] if the file is absent and cannot be fetched
    /// - NRRD decoding errors for a corrupt or unsupported file
    pub fn load_atlas(&self, resolution: Resolution) -> AtlasIoResult<LabelVolume> {
        let path = self.annotation_path(resolution);
        if !path.exists() {
            if let Some(fetcher) = &self.fetcher {
                tracing::info!(
                    target: "ccf-io",
                    "{} missing, fetching {} atlas",
                    path.display(),
                    resolution
                );
                fetcher.ensure_annotation(&self.folder, resolution)?;
            }
        }
        if !path.exists() {
            return Err(AtlasIoError::AtlasFileNotFound { path, resolution });
        }
        load_annotation_file(&path, resolution)
    }

    /// Read and index the structure tree, fetching it first if absent
    pub fn load_structure_tree(&self) -> AtlasIoResult<StructureTree> {
        let path = self.structure_tree_path();
        if !path.exists() {
            if let Some(fetcher) = &self.fetcher {
                fetcher.ensure_structure_tree(&self.folder, &self.structure_tree_file)?;
            }
        }
        Ok(StructureTree::from_csv_path(&path)?)
    }
}

/// Read `annotation_<res>.nrrd` from `folder` without any fetch fallback
pub fn load_atlas(folder: &Path, resolution: Resolution) -> AtlasIoResult<LabelVolume> {
    AtlasLoader::new(folder).load_atlas(resolution)
}

/// Read one annotation file and reorient it to the canonical frame
pub fn load_annotation_file(path: &Path, resolution: Resolution) -> AtlasIoResult<LabelVolume> {
    let (header, native) = read_nrrd_file(path)?;
    let labels = reorient_to_canonical(native);
    tracing::info!(
        target: "ccf-io",
        "Loaded {} atlas from {} (native sizes {:?}, canonical shape {:?})",
        resolution,
        path.display(),
        header.sizes,
        labels.dim()
    );
    Ok(LabelVolume::with_resolution(labels, resolution))
}
