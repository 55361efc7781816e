// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CCF Atlas I/O

Reads the annotation volumes (NRRD) of the Allen mouse brain atlas, reorients
them to the canonical frame, and fetches missing atlas files.

## Usage

```rust,no_run
use ccf_io::AtlasLoader;
use ccf_structures::Resolution;

let loader = AtlasLoader::new("ccf2017");
let volume = loader.load_atlas(Resolution::Um100)?;
let tree = loader.load_structure_tree()?;
println!("{:?} voxels, {} structures", volume.shape(), tree.len());
# Ok::<(), ccf_io::AtlasIoError>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod fetch;
pub mod loader;
pub mod nrrd;
pub mod orientation;

pub use error::{AtlasIoError, AtlasIoResult};
#[cfg(feature = "fetch")]
pub use fetch::HttpAtlasFetcher;
pub use fetch::{
    download_atlas, AtlasFetcher, AtlasSources, DEFAULT_ANNOTATION_BASE_URL,
    DEFAULT_STRUCTURE_TREE_URL,
};
pub use loader::{load_annotation_file, load_atlas, AtlasLoader, STRUCTURE_TREE_FILE};
pub use nrrd::{read_nrrd_file, write_nrrd_file, NrrdEncoding, NrrdHeader};
pub use orientation::reorient_to_canonical;
