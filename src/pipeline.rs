// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region export pipeline
//!
//! Turns a list of requested structures into mesh files plus a
//! `legend.json` manifest in one output folder. The `ccf_regions` tool is a
//! thin CLI over [`export_regions`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use ccf_hierarchy::StructureTree;
use ccf_structures::{LabelVolume, StructureId, StructureRecord};
use ccf_surface::{
    save_mesh, LegendEntry, LegendManifest, MeshFormat, RegionSurfaceBuilder, SurfaceExtractor,
    SurfaceResult, LEGEND_FILE_NAME,
};
use tracing::{debug, info, warn};

/// Base name of the brain outline mesh
pub const BRAIN_MESH_NAME: &str = "brain";

/// What to export and how to colour it
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Structures requested by acronym; unknown ones are skipped
    pub acronyms: Vec<String>,
    /// Structures requested by ID; an unknown ID aborts the export
    pub ids: Vec<StructureId>,
    pub include_brain: bool,
    pub format: MeshFormat,
    pub brain_color: String,
    pub brain_opacity: f32,
    /// Used for structures without a colour in the structure tree
    pub default_color: String,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self {
            acronyms: Vec::new(),
            ids: Vec::new(),
            include_brain: true,
            format: MeshFormat::Ply,
            brain_color: "#000000".to_string(),
            brain_opacity: 0.2,
            default_color: "#FF0000".to_string(),
        }
    }
}

/// Resolve the plan's acronyms and IDs to records, in request order and
/// without repeats.
///
/// # Errors
///
/// Returns `UnknownStructureId` for the first ID missing from the tree
pub fn resolve_requested<'a>(
    tree: &'a StructureTree,
    plan: &ExportPlan,
) -> SurfaceResult<Vec<&'a StructureRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for record in tree.resolve_acronyms(plan.acronyms.as_slice()) {
        if seen.insert(record.id) {
            records.push(record);
        }
    }
    for &id in &plan.ids {
        let record = tree
            .get(id)
            .ok_or(ccf_hierarchy::HierarchyError::UnknownStructureId(id))?;
        if seen.insert(record.id) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Mesh file name for a structure acronym (path separators replaced)
pub fn mesh_file_name(acronym: &str, format: MeshFormat) -> String {
    let stem: String = acronym
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", stem, format.extension())
}

/// Build and save every requested surface, then write the legend.
///
/// Regions that do not occur in the volume still get an (empty) mesh file so
/// the legend lists everything that was asked for.
///
/// # Errors
///
/// Returns error if an ID is unknown, a surface cannot be extracted, or a
/// file cannot be written
pub fn export_regions<E: SurfaceExtractor>(
    volume: &LabelVolume,
    tree: &StructureTree,
    builder: &RegionSurfaceBuilder<E>,
    plan: &ExportPlan,
    output_dir: &Path,
) -> SurfaceResult<LegendManifest> {
    let records = resolve_requested(tree, plan)?;
    fs::create_dir_all(output_dir)?;

    let mut legend = LegendManifest::new();

    if plan.include_brain {
        let mesh = builder.brain_surface(volume)?;
        let mesh_file = format!("{}.{}", BRAIN_MESH_NAME, plan.format.extension());
        save_mesh(&mesh, output_dir.join(&mesh_file), plan.format)?;
        info!(
            target: "ccf-regions",
            "Brain surface: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        legend.push(LegendEntry {
            name: BRAIN_MESH_NAME.to_string(),
            acronym: None,
            id: None,
            color: plan.brain_color.clone(),
            opacity: plan.brain_opacity,
            mesh_file,
        });
    }

    for record in records {
        let mesh = builder.region_surface(volume, tree, record.id)?;
        let mesh_file = mesh_file_name(&record.acronym, plan.format);
        save_mesh(&mesh, output_dir.join(&mesh_file), plan.format)?;

        if mesh.is_empty() {
            warn!(target: "ccf-regions", "Region '{}' exported as an empty mesh", record.acronym);
        } else {
            debug!(
                target: "ccf-regions",
                "Region '{}' ({}): {} triangles -> {}",
                record.acronym,
                record.id,
                mesh.triangle_count(),
                mesh_file
            );
        }

        let color = record
            .color_hex()
            .unwrap_or_else(|| plan.default_color.clone());
        legend.push(LegendEntry::for_region(&record.region_info(), color, mesh_file));
    }

    legend.save(&output_dir.join(LEGEND_FILE_NAME))?;
    info!(
        target: "ccf-regions",
        "Exported {} meshes to {}",
        legend.len(),
        output_dir.display()
    );

    Ok(legend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> StructureTree {
        StructureTree::from_records(vec![
            StructureRecord::new(997, "root", "root", "/997/"),
            StructureRecord::new(8, "grey", "Basic cell groups and regions", "/997/8/"),
            StructureRecord::new(567, "CH", "Cerebrum", "/997/8/567/"),
            StructureRecord::new(343, "BS", "Brain stem", "/997/8/343/"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_requested_order_and_dedup() {
        let tree = tree();
        let plan = ExportPlan {
            acronyms: vec!["BS".to_string(), "nope".to_string(), "CH".to_string()],
            ids: vec![343, 8],
            ..ExportPlan::default()
        };

        let ids: Vec<StructureId> = resolve_requested(&tree, &plan)
            .unwrap()
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![343, 567, 8]);
    }

    #[test]
    fn test_resolve_requested_unknown_id() {
        let tree = tree();
        let plan = ExportPlan {
            ids: vec![31337],
            ..ExportPlan::default()
        };
        assert!(resolve_requested(&tree, &plan).is_err());
    }

    #[test]
    fn test_mesh_file_name() {
        assert_eq!(mesh_file_name("CH", MeshFormat::Ply), "CH.ply");
        assert_eq!(mesh_file_name("SSp-n2/3", MeshFormat::Stl), "SSp-n2_3.stl");
    }
}
