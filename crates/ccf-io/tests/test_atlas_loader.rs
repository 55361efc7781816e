// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Atlas Loader Tests
//!
//! Atlas folders on disk: canonical orientation of loaded volumes, the
//! missing-file error, and fetch fallback through a local fetcher.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ccf_io::{
    load_atlas, write_nrrd_file, AtlasFetcher, AtlasIoError, AtlasIoResult, AtlasLoader,
    NrrdEncoding,
};
use ccf_structures::Resolution;
use ndarray::Array3;

const TREE_CSV: &str = "\
id,acronym,name,structure_id_path,parent_structure_id
997,root,root,/997/,
8,grey,Basic cell groups and regions,/997/8/,997
567,CH,Cerebrum,/997/8/567/,8
";

/// Native-order volume whose values encode their own indices
fn native_volume() -> Array3<u32> {
    Array3::from_shape_fn((4, 3, 2), |(a, b, c)| (a * 100 + b * 10 + c) as u32)
}

/// Copies a prepared volume and tree into place, counting each fetch
struct LocalFetcher {
    annotation_fetches: Arc<AtomicUsize>,
    tree_fetches: Arc<AtomicUsize>,
}

impl AtlasFetcher for LocalFetcher {
    fn fetch_annotation(&self, _resolution: Resolution, dest_file: &Path) -> AtlasIoResult<()> {
        self.annotation_fetches.fetch_add(1, Ordering::SeqCst);
        write_nrrd_file(dest_file, &native_volume(), NrrdEncoding::Gzip)
    }

    fn fetch_structure_tree(&self, dest_file: &Path) -> AtlasIoResult<()> {
        self.tree_fetches.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest_file, TREE_CSV)?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Test 1: Loaded volumes are reoriented to the canonical frame
// ═══════════════════════════════════════════════════════════

#[test]
fn test_load_reorients_volume() {
    let dir = tempfile::tempdir().unwrap();
    let native = native_volume();
    write_nrrd_file(
        &dir.path().join("annotation_25.nrrd"),
        &native,
        NrrdEncoding::Gzip,
    )
    .unwrap();

    let volume = load_atlas(dir.path(), Resolution::Um25).expect("Failed to load atlas");
    assert_eq!(volume.shape(), (4, 2, 3));
    assert_eq!(volume.resolution(), Some(Resolution::Um25));

    let labels = volume.labels();
    for ((i, j, k), &value) in labels.indexed_iter() {
        assert_eq!(value, native[[3 - i, 2 - k, j]]);
    }
}

// ═══════════════════════════════════════════════════════════
// Test 2: Missing resolution without a fetcher is an error
// ═══════════════════════════════════════════════════════════

#[test]
fn test_missing_file_without_fetcher() {
    let dir = tempfile::tempdir().unwrap();
    let loader = AtlasLoader::new(dir.path());
    assert!(!loader.can_fetch());

    match loader.load_atlas(Resolution::Um10) {
        Err(AtlasIoError::AtlasFileNotFound { path, resolution }) => {
            assert_eq!(resolution, Resolution::Um10);
            assert!(path.ends_with("annotation_10.nrrd"));
        }
        other => panic!("expected AtlasFileNotFound, got {:?}", other.map(|v| v.shape())),
    }

    assert!(matches!(
        loader.load_structure_tree(),
        Err(AtlasIoError::Hierarchy(_))
    ));
}

// ═══════════════════════════════════════════════════════════
// Test 3: Fetch fallback runs once, later loads reuse the file
// ═══════════════════════════════════════════════════════════

#[test]
fn test_fetch_fallback_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("ccf2017");
    let annotation_fetches = Arc::new(AtomicUsize::new(0));
    let tree_fetches = Arc::new(AtomicUsize::new(0));

    let loader = AtlasLoader::new(&folder).with_fetcher(Box::new(LocalFetcher {
        annotation_fetches: Arc::clone(&annotation_fetches),
        tree_fetches: Arc::clone(&tree_fetches),
    }));

    let first = loader.load_atlas(Resolution::Um100).unwrap();
    let second = loader.load_atlas(Resolution::Um100).unwrap();
    assert_eq!(first, second);
    assert_eq!(annotation_fetches.load(Ordering::SeqCst), 1);

    let tree = loader.load_structure_tree().unwrap();
    let tree_again = loader.load_structure_tree().unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree_again.len(), 3);
    assert_eq!(tree_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(
        tree.find_descendants(8).unwrap().to_sorted_vec(),
        vec![8, 567]
    );
}

// ═══════════════════════════════════════════════════════════
// Test 4: A corrupt volume surfaces a decoding error
// ═══════════════════════════════════════════════════════════

#[test]
fn test_corrupt_volume() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("annotation_50.nrrd"), b"not an nrrd file").unwrap();

    let result = AtlasLoader::new(dir.path()).load_atlas(Resolution::Um50);
    assert!(matches!(result, Err(AtlasIoError::InvalidNrrd(_))));
}
