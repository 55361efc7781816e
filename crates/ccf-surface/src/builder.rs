// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
RegionSurfaceBuilder - label volume to region meshes.

Structure ID -> descendant set -> region mask -> padded scalar grid ->
surface extraction. The brain outline follows the same path from the brain
mask, optionally smoothed first.
*/

use ccf_hierarchy::StructureTree;
use ccf_structures::{LabelVolume, RegionMask, StructureId};

use crate::error::SurfaceResult;
use crate::grid::ScalarGrid;
use crate::mask::{build_brain_mask, build_region_mask};
use crate::mesh::TriangleMesh;
use crate::smoothing::gaussian_smooth;
use crate::surface_nets::{SurfaceExtractor, SurfaceNets};

/// Surface extraction settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Level between outside (0) and inside (1)
    pub iso_level: f32,
    /// Gaussian std dev in voxels for the brain outline; 0 disables
    pub brain_smoothing_std: f32,
    /// Vertices in µm (volume resolution) instead of voxel units
    pub physical_spacing: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            iso_level: 0.5,
            brain_smoothing_std: 0.0,
            physical_spacing: false,
        }
    }
}

pub struct RegionSurfaceBuilder<E: SurfaceExtractor = SurfaceNets> {
    extractor: E,
    options: SurfaceOptions,
}

impl RegionSurfaceBuilder<SurfaceNets> {
    pub fn new(options: SurfaceOptions) -> Self {
        Self::with_extractor(SurfaceNets, options)
    }
}

impl Default for RegionSurfaceBuilder<SurfaceNets> {
    fn default() -> Self {
        Self::new(SurfaceOptions::default())
    }
}

impl<E: SurfaceExtractor> RegionSurfaceBuilder<E> {
    /// Use a different surface extraction collaborator
    pub fn with_extractor(extractor: E, options: SurfaceOptions) -> Self {
        Self { extractor, options }
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    /// Mesh of structure `id` and everything beneath it.
    ///
    /// # Errors
    ///
    /// Unknown IDs surface as [`crate::SurfaceError::Hierarchy`].
    pub fn region_surface(
        &self,
        volume: &LabelVolume,
        tree: &StructureTree,
        id: StructureId,
    ) -> SurfaceResult<TriangleMesh> {
        let ids = tree.find_descendants(id)?;
        let mask = build_region_mask(volume, &ids);
        if !mask.any() {
            tracing::warn!(
                target: "ccf-surface",
                "Structure {} ({} IDs) has no voxels in this volume",
                id,
                ids.len()
            );
        }
        self.mask_surface(volume, &mask, 0.0)
    }

    /// Outer surface of every labelled brain voxel, smoothed if configured
    pub fn brain_surface(&self, volume: &LabelVolume) -> SurfaceResult<TriangleMesh> {
        let mask = build_brain_mask(volume);
        self.mask_surface(volume, &mask, self.options.brain_smoothing_std)
    }

    /// Surface of an arbitrary mask aligned with `volume`
    pub fn mask_surface(
        &self,
        volume: &LabelVolume,
        mask: &RegionMask,
        smoothing_std: f32,
    ) -> SurfaceResult<TriangleMesh> {
        mask.check_aligned(volume)?;
        let grid = ScalarGrid::from_mask(mask, self.spacing(volume))?.padded(1);
        let grid = gaussian_smooth(&grid, smoothing_std)?;
        self.extractor.extract(&grid, self.options.iso_level)
    }

    fn spacing(&self, volume: &LabelVolume) -> [f32; 3] {
        match volume.resolution() {
            Some(resolution) if self.options.physical_spacing => {
                [resolution.micrometers() as f32; 3]
            }
            _ => [1.0; 3],
        }
    }
}
