// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region Mask Builder.
//!
//! A region mask is the OR of one equality pass per structure ID, so the cost
//! is one sweep of the volume per ID rather than a set lookup per voxel.

use ccf_structures::{DescendantSet, LabelVolume, RegionMask, StructureId, BRAIN_OUTLINE_ID};
use ndarray::Zip;

/// True at every voxel whose label is in `ids`; all false for an empty set
pub fn build_region_mask(volume: &LabelVolume, ids: &DescendantSet) -> RegionMask {
    let labels = volume.labels();
    let mut mask = RegionMask::empty(volume.shape());
    for id in ids.iter() {
        accumulate_equal(&mut mask, &labels, id);
    }

    tracing::debug!(
        target: "ccf-surface",
        "Region mask over {} IDs selects {} of {} voxels",
        ids.len(),
        mask.count(),
        volume.voxel_count()
    );
    mask
}

/// Every labelled brain voxel: label > 1 (drops background and the outline)
pub fn build_brain_mask(volume: &LabelVolume) -> RegionMask {
    RegionMask::from_array(volume.labels().mapv(|label| label > BRAIN_OUTLINE_ID))
}

#[cfg(not(feature = "parallel"))]
fn accumulate_equal(
    mask: &mut RegionMask,
    labels: &ndarray::ArrayView3<'_, StructureId>,
    id: StructureId,
) {
    Zip::from(mask.values_mut())
        .and(labels)
        .for_each(|selected, &label| *selected |= label == id);
}

#[cfg(feature = "parallel")]
fn accumulate_equal(
    mask: &mut RegionMask,
    labels: &ndarray::ArrayView3<'_, StructureId>,
    id: StructureId,
) {
    Zip::from(mask.values_mut())
        .and(labels)
        .par_for_each(|selected, &label| *selected |= label == id);
}
