// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ccf_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ConfigError, ConfigResult};
use ccf_structures::Resolution;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CcfConfig {
    pub atlas: AtlasConfig,
    pub fetch: FetchConfig,
    pub surface: SurfaceConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Where the annotation volumes and structure tree live locally
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub folder: PathBuf,
    /// Voxel size in µm (10, 25, 50 or 100)
    pub resolution: u32,
    pub structure_tree_file: String,
    /// Download missing files instead of failing
    pub fetch_missing: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("ccf2017"),
            resolution: 100,
            structure_tree_file: "structure_tree_safe_2017.csv".to_string(),
            fetch_missing: true,
        }
    }
}

impl AtlasConfig {
    pub fn resolution(&self) -> ConfigResult<Resolution> {
        Resolution::from_micrometers(self.resolution)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn structure_tree_path(&self) -> PathBuf {
        self.folder.join(&self.structure_tree_file)
    }
}

/// Remote sources for missing atlas files
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Folder URL holding `annotation_<res>.nrrd`
    pub annotation_base_url: String,
    pub structure_tree_url: String,
    pub timeout_secs: u64,
    /// Resolutions fetched by a full download
    pub resolutions: Vec<u32>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            annotation_base_url: "http://download.alleninstitute.org/informatics-archive/current-release/mouse_ccf/annotation/ccf_2017/".to_string(),
            structure_tree_url: "http://data.cortexlab.net/allenCCF/structure_tree_safe_2017.csv".to_string(),
            timeout_secs: 600,
            resolutions: vec![10, 25, 50, 100],
        }
    }
}

/// Surface extraction settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Contour level between 0 (outside) and 1 (inside)
    pub iso_level: f32,
    /// Gaussian std dev (voxels) applied to the brain outline; 0 disables
    pub brain_smoothing_std: f32,
    /// Scale vertices to µm instead of voxel units
    pub physical_spacing: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            iso_level: 0.5,
            brain_smoothing_std: 0.0,
            physical_spacing: false,
        }
    }
}

/// Mesh export and legend settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// `ply` or `stl`
    pub format: String,
    pub brain_color: String,
    pub brain_opacity: f32,
    /// Used for regions whose record carries no colour
    pub default_color: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("meshes"),
            format: "ply".to_string(),
            brain_color: "#000000".to_string(),
            brain_opacity: 0.2,
            default_color: "#FF0000".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// `text` or `json`
    pub format: String,
    /// Base directory for per-run log folders; console only when unset
    pub log_dir: Option<PathBuf>,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: None,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
