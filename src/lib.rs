// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # CCF Atlas - Allen Mouse Brain Atlas Toolkit
//!
//! Loads the Allen Common Coordinate Framework (CCF 2017) annotation volume,
//! resolves the structure hierarchy, and turns brain regions into surface
//! meshes ready for a renderer.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ccf-atlas = "0.1"  # Default: HTTP fetch of missing atlas files
//! ```
//!
//! ## Feature Flags
//!
//! - **`fetch`** (default): download missing annotation volumes and the
//!   structure tree over HTTP
//! - **`file-logging`**: per-run rolling log files next to console output
//! - **`parallel`**: region masks built with rayon-backed equality passes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccf_atlas::prelude::*;
//!
//! let loader = AtlasLoader::new("ccf2017");
//! let tree = loader.load_structure_tree()?;
//! let volume = loader.load_atlas(Resolution::Um25)?;
//!
//! // Hippocampal formation and everything beneath it
//! let hpf = tree.lookup_by_acronym("HPF").expect("HPF in the Allen tree");
//! let builder = RegionSurfaceBuilder::default();
//! let mesh = builder.region_surface(&volume, &tree, hpf.id)?;
//! save_mesh(&mesh, "HPF.ply", MeshFormat::Ply)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: ccf-structures, ccf-config                 │
//! │  (StructureRecord, LabelVolume, RegionMask)             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: ccf-hierarchy, ccf-surface                 │
//! │  (path matrix, descendants, masks, surface extraction)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: ccf-io                                            │
//! │  (NRRD volumes, reorientation, atlas fetch)             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use ccf_config as config;
pub use ccf_structures as structures;

// Re-export infrastructure
pub use ccf_observability as observability;

// Re-export algorithms
pub use ccf_hierarchy as hierarchy;
pub use ccf_surface as surface;

// Re-export I/O layer
pub use ccf_io as io;

pub mod pipeline;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::structures::*;

    pub use crate::hierarchy::{HierarchyError, StructureTree};

    pub use crate::io::{load_atlas, AtlasFetcher, AtlasIoError, AtlasLoader};

    #[cfg(feature = "fetch")]
    pub use crate::io::HttpAtlasFetcher;

    pub use crate::surface::{
        build_brain_mask, build_region_mask, save_mesh, LegendManifest, MeshFormat,
        RegionSurfaceBuilder, SurfaceOptions, TriangleMesh,
    };

    pub use crate::pipeline::{export_regions, ExportPlan};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let _resolution = Resolution::default();
        let _options = SurfaceOptions::default();
    }
}
