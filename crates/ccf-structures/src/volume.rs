// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::AHashSet;
use ndarray::{Array3, ArrayView3};

use crate::{AtlasDataError, AtlasDataResult, Resolution, StructureId};

/// Voxel extent along (x, y, z)
pub type VolumeShape = (usize, usize, usize);

/// Immutable annotation volume: one structure ID per voxel, 0 for background.
///
/// Axes are already in the canonical orientation produced by the atlas loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    labels: Array3<StructureId>,
    resolution: Option<Resolution>,
}

impl LabelVolume {
    /// Wrap an in-memory label array (synthetic volumes, tests)
    pub fn new(labels: Array3<StructureId>) -> Self {
        Self {
            labels,
            resolution: None,
        }
    }

    pub fn with_resolution(labels: Array3<StructureId>, resolution: Resolution) -> Self {
        Self {
            labels,
            resolution: Some(resolution),
        }
    }

    pub fn labels(&self) -> ArrayView3<'_, StructureId> {
        self.labels.view()
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn shape(&self) -> VolumeShape {
        self.labels.dim()
    }

    pub fn voxel_count(&self) -> usize {
        self.labels.len()
    }

    /// Every label present in the volume, ascending
    pub fn distinct_labels(&self) -> Vec<StructureId> {
        let seen: AHashSet<StructureId> = self.labels.iter().copied().collect();
        let mut labels: Vec<StructureId> = seen.into_iter().collect();
        labels.sort_unstable();
        labels
    }
}

/// Boolean voxel selection with the same shape as the volume it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    mask: Array3<bool>,
}

impl RegionMask {
    /// All-false mask of the given shape
    pub fn empty(shape: VolumeShape) -> Self {
        Self {
            mask: Array3::from_elem(shape, false),
        }
    }

    pub fn from_array(mask: Array3<bool>) -> Self {
        Self { mask }
    }

    pub fn values(&self) -> ArrayView3<'_, bool> {
        self.mask.view()
    }

    pub fn values_mut(&mut self) -> &mut Array3<bool> {
        &mut self.mask
    }

    pub fn shape(&self) -> VolumeShape {
        self.mask.dim()
    }

    /// Number of selected voxels
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&selected| selected).count()
    }

    pub fn any(&self) -> bool {
        self.mask.iter().any(|&selected| selected)
    }

    /// Fails unless `self` is voxel-aligned with `volume`
    pub fn check_aligned(&self, volume: &LabelVolume) -> AtlasDataResult<()> {
        if self.shape() != volume.shape() {
            return Err(AtlasDataError::ShapeMismatch {
                expected: volume.shape(),
                actual: self.shape(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_labels_sorted() {
        let labels = Array3::from_shape_vec((2, 2, 1), vec![8, 0, 997, 8]).unwrap();
        let volume = LabelVolume::new(labels);
        assert_eq!(volume.distinct_labels(), vec![0, 8, 997]);
        assert_eq!(volume.voxel_count(), 4);
        assert_eq!(volume.resolution(), None);
    }

    #[test]
    fn test_mask_count_and_alignment() {
        let volume = LabelVolume::with_resolution(Array3::zeros((3, 2, 2)), Resolution::Um50);
        let mut mask = RegionMask::empty((3, 2, 2));
        assert!(!mask.any());
        mask.values_mut()[[1, 1, 0]] = true;
        assert_eq!(mask.count(), 1);
        assert!(mask.check_aligned(&volume).is_ok());

        let other = RegionMask::empty((2, 2, 2));
        assert!(matches!(
            other.check_aligned(&volume),
            Err(AtlasDataError::ShapeMismatch { .. })
        ));
    }
}
