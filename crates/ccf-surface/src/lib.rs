// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CCF Surfaces

Region masks over annotation volumes and the meshes built from them.

## Usage

```rust
use ccf_hierarchy::StructureTree;
use ccf_structures::{LabelVolume, StructureRecord};
use ccf_surface::RegionSurfaceBuilder;
use ndarray::Array3;

let tree = StructureTree::from_records(vec![
    StructureRecord::new(997, "root", "root", "/997/"),
    StructureRecord::new(8, "grey", "Grey matter", "/997/8/"),
])?;
let mut labels = Array3::zeros((4, 4, 4));
labels[[1, 1, 1]] = 8;
let volume = LabelVolume::new(labels);

let mesh = RegionSurfaceBuilder::default().region_surface(&volume, &tree, 997)?;
assert!(mesh.is_closed());
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod error;
pub mod export;
pub mod grid;
pub mod legend;
pub mod mask;
pub mod mesh;
pub mod smoothing;
pub mod surface_nets;

pub use builder::{RegionSurfaceBuilder, SurfaceOptions};
pub use error::{SurfaceError, SurfaceResult};
pub use export::{save_mesh, write_ply, write_stl, MeshFormat};
pub use grid::{GridDimensions, ScalarGrid};
pub use legend::{LegendEntry, LegendManifest, LEGEND_FILE_NAME};
pub use mask::{build_brain_mask, build_region_mask};
pub use mesh::TriangleMesh;
pub use smoothing::gaussian_smooth;
pub use surface_nets::{SurfaceExtractor, SurfaceNets};
