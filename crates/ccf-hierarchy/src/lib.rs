// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CCF Hierarchy Resolver

Turns the anatomical structure tree into a fixed-width [`PathMatrix`] and
answers "which IDs make up this structure" queries against it.

## Usage

```rust
use ccf_hierarchy::StructureTree;
use ccf_structures::StructureRecord;

let tree = StructureTree::from_records(vec![
    StructureRecord::new(1, "root", "root", "/1/"),
    StructureRecord::new(8, "grey", "Grey matter", "/1/8/"),
    StructureRecord::new(997, "CH", "Cerebrum", "/1/8/997/"),
])?;

assert_eq!(tree.find_descendants(8)?.to_sorted_vec(), vec![8, 997]);
assert!(tree.lookup_by_acronym("nope").is_none());
# Ok::<(), ccf_hierarchy::HierarchyError>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod csv_loader;
pub mod descendants;
pub mod error;
pub mod lookup;
pub mod path_matrix;
pub mod structure_tree;

pub use csv_loader::{load_structure_records, read_structure_records};
pub use descendants::{find_descendants, find_direct_children};
pub use error::{HierarchyError, HierarchyResult};
pub use lookup::lookup_by_acronym;
pub use path_matrix::{build_path_matrix, PathMatrix, MIN_PATH_DEPTH, PATH_PADDING};
pub use structure_tree::StructureTree;
