// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Regular 3D scalar grid handed to surface extraction.

use ccf_structures::RegionMask;

use crate::error::{SurfaceError, SurfaceResult};

/// Grid dimensions (nx, ny, nz)
pub type GridDimensions = (usize, usize, usize);

/// A 3D grid of `f32` samples with per-axis spacing.
///
/// Values are stored with x varying fastest, the same ravel order the
/// annotation volumes use on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    values: Vec<f32>,
    dimensions: GridDimensions,
    origin: [f32; 3],
    spacing: [f32; 3],
}

impl ScalarGrid {
    /// Zero-filled grid.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::InvalidSpacing`] unless every spacing is positive and finite.
    pub fn new(dimensions: GridDimensions, origin: [f32; 3], spacing: [f32; 3]) -> SurfaceResult<Self> {
        let (nx, ny, nz) = dimensions;
        Self::from_values(dimensions, origin, spacing, vec![0.0; nx * ny * nz])
    }

    /// Wrap x-fastest `values`
    pub fn from_values(
        dimensions: GridDimensions,
        origin: [f32; 3],
        spacing: [f32; 3],
        values: Vec<f32>,
    ) -> SurfaceResult<Self> {
        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(SurfaceError::InvalidSpacing(spacing));
        }
        let expected = dimensions.0 * dimensions.1 * dimensions.2;
        if values.len() != expected {
            return Err(SurfaceError::ValueCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            values,
            dimensions,
            origin,
            spacing,
        })
    }

    /// 1.0 inside the mask, 0.0 outside; voxel (i, j, k) sits at `(i, j, k) * spacing`
    pub fn from_mask(mask: &RegionMask, spacing: [f32; 3]) -> SurfaceResult<Self> {
        let dimensions = mask.shape();
        let mut grid = Self::new(dimensions, [0.0; 3], spacing)?;
        for ((ix, iy, iz), &selected) in mask.values().indexed_iter() {
            if selected {
                let idx = grid.index(ix, iy, iz);
                grid.values[idx] = 1.0;
            }
        }
        Ok(grid)
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn origin(&self) -> [f32; 3] {
        self.origin
    }

    pub fn spacing(&self) -> [f32; 3] {
        self.spacing
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().map(|&v| f64::from(v)).sum()
    }

    /// Linear index of a grid point
    #[inline]
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let (nx, ny, _) = self.dimensions;
        ix + iy * nx + iz * nx * ny
    }

    /// Value at grid coordinates, 0.0 out of bounds
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> f32 {
        let (nx, ny, nz) = self.dimensions;
        if ix < nx && iy < ny && iz < nz {
            self.values[self.index(ix, iy, iz)]
        } else {
            0.0
        }
    }

    /// Does nothing out of bounds
    pub fn set(&mut self, ix: usize, iy: usize, iz: usize, value: f32) {
        let (nx, ny, nz) = self.dimensions;
        if ix < nx && iy < ny && iz < nz {
            let idx = self.index(ix, iy, iz);
            self.values[idx] = value;
        }
    }

    /// World-space position of a grid point
    pub fn position(&self, ix: usize, iy: usize, iz: usize) -> [f32; 3] {
        [
            self.origin[0] + ix as f32 * self.spacing[0],
            self.origin[1] + iy as f32 * self.spacing[1],
            self.origin[2] + iz as f32 * self.spacing[2],
        ]
    }

    /// Copy surrounded by `padding` layers of zeros, origin shifted so
    /// existing points keep their world positions
    pub fn padded(&self, padding: usize) -> Self {
        let (nx, ny, nz) = self.dimensions;
        let dimensions = (nx + 2 * padding, ny + 2 * padding, nz + 2 * padding);
        let origin = [
            self.origin[0] - padding as f32 * self.spacing[0],
            self.origin[1] - padding as f32 * self.spacing[1],
            self.origin[2] - padding as f32 * self.spacing[2],
        ];

        let mut padded = Self {
            values: vec![0.0; dimensions.0 * dimensions.1 * dimensions.2],
            dimensions,
            origin,
            spacing: self.spacing,
        };
        for iz in 0..nz {
            for iy in 0..ny {
                let src = self.index(0, iy, iz);
                let dst = padded.index(padding, iy + padding, iz + padding);
                padded.values[dst..dst + nx].copy_from_slice(&self.values[src..src + nx]);
            }
        }
        padded
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_x_fastest_layout() {
        let mut mask = Array3::from_elem((3, 2, 2), false);
        mask[[2, 1, 0]] = true;
        let grid = ScalarGrid::from_mask(&RegionMask::from_array(mask), [1.0; 3]).unwrap();

        assert_eq!(grid.dimensions(), (3, 2, 2));
        assert_eq!(grid.index(2, 1, 0), 5);
        assert_eq!(grid.values()[5], 1.0);
        assert_eq!(grid.sum(), 1.0);
        assert_eq!(grid.get(2, 1, 0), 1.0);
        assert_eq!(grid.get(3, 0, 0), 0.0);
    }

    #[test]
    fn test_padding_keeps_world_positions() {
        let mut grid = ScalarGrid::new((2, 2, 2), [10.0, 0.0, 0.0], [25.0; 3]).unwrap();
        grid.set(1, 0, 1, 1.0);
        let padded = grid.padded(1);

        assert_eq!(padded.dimensions(), (4, 4, 4));
        assert_eq!(padded.get(2, 1, 2), 1.0);
        assert_eq!(padded.sum(), 1.0);
        assert_eq!(padded.position(2, 1, 2), grid.position(1, 0, 1));
        assert_eq!(padded.origin(), [-15.0, -25.0, -25.0]);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            ScalarGrid::new((1, 1, 1), [0.0; 3], [1.0, 0.0, 1.0]),
            Err(SurfaceError::InvalidSpacing(_))
        ));
        assert!(matches!(
            ScalarGrid::from_values((2, 1, 1), [0.0; 3], [1.0; 3], vec![0.0]),
            Err(SurfaceError::ValueCountMismatch { expected: 2, actual: 1 })
        ));
    }
}
