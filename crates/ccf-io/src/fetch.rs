// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Fetch collaborator: makes sure atlas files exist locally.

[`AtlasFetcher`] implementors only know how to retrieve one file; the provided
`ensure_*` methods add the skip-if-present check, so every fetcher is
idempotent. [`HttpAtlasFetcher`] (feature `fetch`) downloads from the Allen
Institute archive and the cortexlab structure tree mirror.
*/

use std::path::{Path, PathBuf};

use ccf_structures::Resolution;

use crate::error::AtlasIoResult;

/// Folder holding `annotation_<res>.nrrd` for the 2017 CCF
pub const DEFAULT_ANNOTATION_BASE_URL: &str =
    "http://download.alleninstitute.org/informatics-archive/current-release/mouse_ccf/annotation/ccf_2017/";

/// Structure tree CSV with the `structure_id_path` column
pub const DEFAULT_STRUCTURE_TREE_URL: &str =
    "http://data.cortexlab.net/allenCCF/structure_tree_safe_2017.csv";

/// Remote locations of the atlas files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasSources {
    pub annotation_base_url: String,
    pub structure_tree_url: String,
}

impl Default for AtlasSources {
    fn default() -> Self {
        Self {
            annotation_base_url: DEFAULT_ANNOTATION_BASE_URL.to_string(),
            structure_tree_url: DEFAULT_STRUCTURE_TREE_URL.to_string(),
        }
    }
}

impl AtlasSources {
    pub fn annotation_url(&self, resolution: Resolution) -> String {
        let base = self.annotation_base_url.trim_end_matches('/');
        format!("{}/{}", base, resolution.annotation_file_name())
    }
}

/// Retrieves missing atlas files into a local folder
pub trait AtlasFetcher: Send + Sync {
    /// Retrieve the annotation volume for `resolution` into `dest_file`
    fn fetch_annotation(&self, resolution: Resolution, dest_file: &Path) -> AtlasIoResult<()>;

    /// Retrieve the structure tree CSV into `dest_file`
    fn fetch_structure_tree(&self, dest_file: &Path) -> AtlasIoResult<()>;

    /// Path of the annotation volume in `dest`, fetching it only if absent
    fn ensure_annotation(&self, dest: &Path, resolution: Resolution) -> AtlasIoResult<PathBuf> {
        let path = dest.join(resolution.annotation_file_name());
        if path.exists() {
            tracing::info!(target: "ccf-io", "{} already present", path.display());
        } else {
            std::fs::create_dir_all(dest)?;
            self.fetch_annotation(resolution, &path)?;
        }
        Ok(path)
    }

    /// Path of the structure tree in `dest`, fetching it only if absent
    fn ensure_structure_tree(&self, dest: &Path, file_name: &str) -> AtlasIoResult<PathBuf> {
        let path = dest.join(file_name);
        if path.exists() {
            tracing::info!(target: "ccf-io", "{} already present", path.display());
        } else {
            std::fs::create_dir_all(dest)?;
            self.fetch_structure_tree(&path)?;
        }
        Ok(path)
    }
}

/// Fetch every listed resolution plus the structure tree into `dest`.
///
/// Files already present are left untouched.
pub fn download_atlas(
    fetcher: &dyn AtlasFetcher,
    dest: &Path,
    resolutions: &[Resolution],
    structure_tree_file: &str,
) -> AtlasIoResult<()> {
    for &resolution in resolutions {
        fetcher.ensure_annotation(dest, resolution)?;
    }
    fetcher.ensure_structure_tree(dest, structure_tree_file)?;
    Ok(())
}

#[cfg(feature = "fetch")]
pub use http::HttpAtlasFetcher;

#[cfg(feature = "fetch")]
mod http {
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;

    use ccf_structures::Resolution;

    use super::{AtlasFetcher, AtlasSources};
    use crate::error::{AtlasIoError, AtlasIoResult};

    /// Blocking HTTP fetcher.
    ///
    /// Downloads stream into `<file>.part` and are renamed into place once
    /// complete, so an interrupted download never looks like a present file.
    pub struct HttpAtlasFetcher {
        client: reqwest::blocking::Client,
        sources: AtlasSources,
    }

    impl HttpAtlasFetcher {
        pub fn new(sources: AtlasSources, timeout: Duration) -> AtlasIoResult<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| AtlasIoError::Fetch {
                    url: sources.annotation_base_url.clone(),
                    message: format!("failed to build HTTP client: {}", e),
                })?;
            Ok(Self { client, sources })
        }

        pub fn sources(&self) -> &AtlasSources {
            &self.sources
        }

        fn download(&self, url: &str, dest_file: &Path) -> AtlasIoResult<()> {
            let mut part_name = dest_file
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_default();
            part_name.push(".part");
            let part_file = dest_file.with_file_name(part_name);

            tracing::info!(target: "ccf-io", "Downloading {} -> {}", url, dest_file.display());
            let result = self.download_to(url, &part_file);
            match result {
                Ok(bytes) => {
                    fs::rename(&part_file, dest_file)?;
                    tracing::info!(
                        target: "ccf-io",
                        "Downloaded {} ({} bytes)",
                        dest_file.display(),
                        bytes
                    );
                    Ok(())
                }
                Err(e) => {
                    let _ = fs::remove_file(&part_file);
                    Err(e)
                }
            }
        }

        fn download_to(&self, url: &str, part_file: &Path) -> AtlasIoResult<u64> {
            let fetch_error = |e: reqwest::Error| AtlasIoError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            };

            let mut response = self
                .client
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(fetch_error)?;

            let mut file = File::create(part_file)?;
            let bytes = response.copy_to(&mut file).map_err(fetch_error)?;
            file.flush()?;
            file.sync_all()?;
            Ok(bytes)
        }
    }

    impl AtlasFetcher for HttpAtlasFetcher {
        fn fetch_annotation(&self, resolution: Resolution, dest_file: &Path) -> AtlasIoResult<()> {
            self.download(&self.sources.annotation_url(resolution), dest_file)
        }

        fn fetch_structure_tree(&self, dest_file: &Path) -> AtlasIoResult<()> {
            self.download(&self.sources.structure_tree_url, dest_file)
        }
    }
}
