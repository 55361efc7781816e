// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Separable Gaussian smoothing of scalar grids.
//!
//! The kernel radius is `ceil(3σ)` samples and borders are clamped, so values
//! near the edge of the grid see the edge sample repeated.

use crate::error::{SurfaceError, SurfaceResult};
use crate::grid::ScalarGrid;

/// Blur `grid` with a Gaussian of `std_dev` grid samples; 0 returns a copy
pub fn gaussian_smooth(grid: &ScalarGrid, std_dev: f32) -> SurfaceResult<ScalarGrid> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(SurfaceError::InvalidSmoothing(std_dev));
    }
    if std_dev == 0.0 || grid.is_empty() {
        return Ok(grid.clone());
    }

    let kernel = gaussian_kernel(std_dev);
    let mut smoothed = grid.clone();
    let mut scratch = vec![0.0f32; grid.len()];
    for axis in 0..3 {
        convolve_axis(&smoothed, axis, &kernel, &mut scratch);
        smoothed.values_mut().copy_from_slice(&scratch);
    }

    tracing::debug!(
        target: "ccf-surface",
        "Gaussian smoothing (std dev {}) over {:?} grid with {}-tap kernel",
        std_dev,
        grid.dimensions(),
        kernel.len()
    );
    Ok(smoothed)
}

/// Normalised weights for offsets `-r..=r`
fn gaussian_kernel(std_dev: f32) -> Vec<f32> {
    let radius = (3.0 * std_dev).ceil() as i64;
    let two_sigma_sq = 2.0 * f64::from(std_dev) * f64::from(std_dev);
    let weights: Vec<f64> = (-radius..=radius)
        .map(|offset| (-((offset * offset) as f64) / two_sigma_sq).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / total) as f32).collect()
}

fn convolve_axis(grid: &ScalarGrid, axis: usize, kernel: &[f32], out: &mut [f32]) {
    let (nx, ny, nz) = grid.dimensions();
    let extent = [nx, ny, nz][axis] as i64;
    let radius = (kernel.len() / 2) as i64;
    let values = grid.values();

    for iz in 0..nz {
        for iy in 0..ny {
            for ix in 0..nx {
                let coords = [ix, iy, iz];
                let center = coords[axis] as i64;
                let mut acc = 0.0f32;
                for (tap, &weight) in kernel.iter().enumerate() {
                    let sample = (center + tap as i64 - radius).clamp(0, extent - 1) as usize;
                    let mut at = coords;
                    at[axis] = sample;
                    acc += weight * values[grid.index(at[0], at[1], at[2])];
                }
                out[grid.index(ix, iy, iz)] = acc;
            }
        }
    }
}
