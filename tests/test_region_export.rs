// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Region Export Tests
//!
//! Full pipeline over an atlas folder on disk: NRRD annotation volume and
//! structure tree CSV in, meshes and `legend.json` out.

use std::path::Path;

use ccf_atlas::hierarchy::HierarchyError;
use ccf_atlas::io::{write_nrrd_file, AtlasLoader, NrrdEncoding};
use ccf_atlas::pipeline::{export_regions, ExportPlan};
use ccf_atlas::structures::Resolution;
use ccf_atlas::surface::{
    LegendManifest, MeshFormat, RegionSurfaceBuilder, SurfaceError, SurfaceOptions,
    LEGEND_FILE_NAME,
};
use ndarray::{s, Array3};

const TREE_CSV: &str = "\
id,acronym,name,structure_id_path,parent_structure_id,color_hex_triplet
997,root,root,/997/,,FFFFFF
8,grey,Basic cell groups and regions,/997/8/,997,BFDAE3
567,CH,Cerebrum,/997/8/567/,8,b0f0ff
1089,HPF,Hippocampal formation,/997/8/567/1089/,567,
343,BS,Brain stem,/997/8/343/,8,FF7080
512,CB,Cerebellum,/997/512/,997,F0F080
";

/// Annotation volume in file (native) axis order
fn native_volume() -> Array3<u32> {
    let mut labels = Array3::zeros((12, 10, 9));
    labels.slice_mut(s![1..11, 1..9, 1..8]).fill(1);
    labels.slice_mut(s![2..6, 2..6, 2..6]).fill(567);
    labels.slice_mut(s![6..8, 2..5, 2..5]).fill(1089);
    labels.slice_mut(s![8..10, 2..6, 2..6]).fill(343);
    labels
}

fn atlas_folder(dir: &Path) -> AtlasLoader {
    let folder = dir.join("ccf2017");
    std::fs::create_dir_all(&folder).unwrap();
    write_nrrd_file(
        &folder.join(Resolution::Um50.annotation_file_name()),
        &native_volume(),
        NrrdEncoding::Gzip,
    )
    .unwrap();
    std::fs::write(folder.join("structure_tree_safe_2017.csv"), TREE_CSV).unwrap();
    AtlasLoader::new(folder)
}

// ═══════════════════════════════════════════════════════════
// Test 1: Brain and requested regions land on disk with a legend
// ═══════════════════════════════════════════════════════════

#[test]
fn test_export_brain_and_regions() {
    let dir = tempfile::tempdir().unwrap();
    let loader = atlas_folder(dir.path());
    let tree = loader.load_structure_tree().unwrap();
    let volume = loader.load_atlas(Resolution::Um50).unwrap();
    assert_eq!(volume.shape(), (12, 9, 10));

    let plan = ExportPlan {
        acronyms: vec!["CH".to_string(), "NOPE".to_string()],
        ids: vec![1089],
        ..ExportPlan::default()
    };
    let out = dir.path().join("meshes");
    let legend = export_regions(
        &volume,
        &tree,
        &RegionSurfaceBuilder::default(),
        &plan,
        &out,
    )
    .unwrap();

    let files: Vec<&str> = legend
        .entries
        .iter()
        .map(|entry| entry.mesh_file.as_str())
        .collect();
    assert_eq!(files, vec!["brain.ply", "CH.ply", "HPF.ply"]);
    for file in &files {
        let bytes = std::fs::read(out.join(file)).unwrap();
        assert!(bytes.starts_with(b"ply\n"));
    }

    let brain = &legend.entries[0];
    assert_eq!(brain.acronym, None);
    assert_eq!(brain.color, "#000000");
    assert!((brain.opacity - 0.2).abs() < 1e-6);

    // Tree colour when present, default colour otherwise
    assert_eq!(legend.entries[1].color, "#B0F0FF");
    assert_eq!(legend.entries[1].id, Some(567));
    assert_eq!(legend.entries[2].color, "#FF0000");
    assert_eq!(legend.entries[2].name, "Hippocampal formation");

    let on_disk = LegendManifest::load(&out.join(LEGEND_FILE_NAME)).unwrap();
    assert_eq!(on_disk, legend);
}

// ═══════════════════════════════════════════════════════════
// Test 2: An unknown ID aborts before anything is written
// ═══════════════════════════════════════════════════════════

#[test]
fn test_unknown_id_aborts_export() {
    let dir = tempfile::tempdir().unwrap();
    let loader = atlas_folder(dir.path());
    let tree = loader.load_structure_tree().unwrap();
    let volume = loader.load_atlas(Resolution::Um50).unwrap();

    let plan = ExportPlan {
        acronyms: vec!["CH".to_string()],
        ids: vec![4242],
        ..ExportPlan::default()
    };
    let out = dir.path().join("meshes");
    let result = export_regions(
        &volume,
        &tree,
        &RegionSurfaceBuilder::default(),
        &plan,
        &out,
    );

    assert!(matches!(
        result,
        Err(SurfaceError::Hierarchy(HierarchyError::UnknownStructureId(4242)))
    ));
    assert!(!out.exists());
}

// ═══════════════════════════════════════════════════════════
// Test 3: STL export, absent regions, and no brain outline
// ═══════════════════════════════════════════════════════════

#[test]
fn test_stl_export_without_brain() {
    let dir = tempfile::tempdir().unwrap();
    let loader = atlas_folder(dir.path());
    let tree = loader.load_structure_tree().unwrap();
    let volume = loader.load_atlas(Resolution::Um50).unwrap();

    let builder = RegionSurfaceBuilder::new(SurfaceOptions {
        physical_spacing: true,
        ..SurfaceOptions::default()
    });
    let plan = ExportPlan {
        acronyms: vec!["BS".to_string(), "CB".to_string()],
        include_brain: false,
        format: MeshFormat::Stl,
        ..ExportPlan::default()
    };
    let out = dir.path().join("stl");
    let legend = export_regions(&volume, &tree, &builder, &plan, &out).unwrap();

    assert_eq!(legend.len(), 2);
    assert_eq!(legend.entries[0].color, "#FF7080");

    let bs = builder.region_surface(&volume, &tree, 343).unwrap();
    assert!(bs.is_closed());
    let bs_len = std::fs::metadata(out.join("BS.stl")).unwrap().len();
    assert_eq!(bs_len, 84 + 50 * bs.triangle_count() as u64);

    // Cerebellum is in the tree but not in the volume
    let cb_len = std::fs::metadata(out.join("CB.stl")).unwrap().len();
    assert_eq!(cb_len, 84);
}
