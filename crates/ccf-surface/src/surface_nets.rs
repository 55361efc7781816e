// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Surface extraction collaborator and its built-in surface-nets implementation.

Surface nets places one vertex in every cell whose corners straddle the iso
level, at the mean of the interpolated crossings on the cell's edges, and
joins the four cells around every sign-changing grid edge with a quad. On a
zero-padded grid the result is closed and consistently oriented.
*/

use crate::error::{SurfaceError, SurfaceResult};
use crate::grid::ScalarGrid;
use crate::mesh::TriangleMesh;

/// Turns a scalar grid into a triangle mesh at a given level
pub trait SurfaceExtractor {
    /// Surface separating samples above `level` (inside) from the rest
    fn extract(&self, grid: &ScalarGrid, level: f32) -> SurfaceResult<TriangleMesh>;
}

/// Cell corner offsets, bit 0 = x, bit 1 = y, bit 2 = z
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Corner pairs forming the 12 cell edges
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

const NO_VERTEX: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceNets;

impl SurfaceExtractor for SurfaceNets {
    fn extract(&self, grid: &ScalarGrid, level: f32) -> SurfaceResult<TriangleMesh> {
        if !level.is_finite() {
            return Err(SurfaceError::InvalidLevel(level));
        }
        if grid.is_empty() {
            return Err(SurfaceError::EmptyGrid);
        }

        let (nx, ny, nz) = grid.dimensions();
        if nx < 2 || ny < 2 || nz < 2 {
            return Ok(TriangleMesh::new());
        }

        let cells = (nx - 1, ny - 1, nz - 1);
        let cell_index = |c: [usize; 3]| c[0] + c[1] * cells.0 + c[2] * cells.0 * cells.1;

        let mut mesh = TriangleMesh::new();
        let mut cell_vertex = vec![NO_VERTEX; cells.0 * cells.1 * cells.2];

        for cz in 0..cells.2 {
            for cy in 0..cells.1 {
                for cx in 0..cells.0 {
                    if let Some(vertex) = cell_vertex_position(grid, [cx, cy, cz], level) {
                        cell_vertex[cell_index([cx, cy, cz])] = mesh.vertices.len() as u32;
                        mesh.vertices.push(vertex);
                    }
                }
            }
        }

        let dims = [nx, ny, nz];
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let p = [x, y, z];
                    let inside = grid.get(x, y, z) > level;
                    for axis in 0..3 {
                        if p[axis] + 1 >= dims[axis] {
                            continue;
                        }
                        let mut q = p;
                        q[axis] += 1;
                        if inside == (grid.get(q[0], q[1], q[2]) > level) {
                            continue;
                        }

                        let u = (axis + 1) % 3;
                        let v = (axis + 2) % 3;
                        // The edge must be surrounded by four cells
                        if p[u] == 0 || p[v] == 0 || p[u] + 1 >= dims[u] || p[v] + 1 >= dims[v] {
                            continue;
                        }

                        let mut c0 = p;
                        c0[u] -= 1;
                        c0[v] -= 1;
                        let mut c1 = p;
                        c1[v] -= 1;
                        let c2 = p;
                        let mut c3 = p;
                        c3[u] -= 1;

                        let [v0, v1, v2, v3] = [c0, c1, c2, c3].map(|c| cell_vertex[cell_index(c)]);
                        if [v0, v1, v2, v3].contains(&NO_VERTEX) {
                            continue;
                        }

                        // (c0, c1, c2, c3) runs counter-clockwise about +axis
                        if inside {
                            mesh.triangles.push([v0, v1, v2]);
                            mesh.triangles.push([v0, v2, v3]);
                        } else {
                            mesh.triangles.push([v0, v2, v1]);
                            mesh.triangles.push([v0, v3, v2]);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            target: "ccf-surface",
            "Surface nets at level {}: {} vertices, {} triangles",
            level,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}

/// Mean of the level crossings on the cell's edges, `None` if the cell is not mixed
fn cell_vertex_position(grid: &ScalarGrid, cell: [usize; 3], level: f32) -> Option<[f32; 3]> {
    let samples = CORNERS.map(|o| grid.get(cell[0] + o[0], cell[1] + o[1], cell[2] + o[2]));
    let inside_count = samples.iter().filter(|&&s| s > level).count();
    if inside_count == 0 || inside_count == CORNERS.len() {
        return None;
    }

    let mut sum = [0.0f32; 3];
    let mut crossings = 0usize;
    for &(a, b) in &EDGES {
        let (sa, sb) = (samples[a], samples[b]);
        if (sa > level) == (sb > level) {
            continue;
        }
        let t = (level - sa) / (sb - sa);
        let pa = corner_position(grid, cell, CORNERS[a]);
        let pb = corner_position(grid, cell, CORNERS[b]);
        for axis in 0..3 {
            sum[axis] += pa[axis] + t * (pb[axis] - pa[axis]);
        }
        crossings += 1;
    }

    let n = crossings as f32;
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}

fn corner_position(grid: &ScalarGrid, cell: [usize; 3], offset: [usize; 3]) -> [f32; 3] {
    grid.position(cell[0] + offset[0], cell[1] + offset[1], cell[2] + offset[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_cube(side: usize) -> ScalarGrid {
        let mut grid = ScalarGrid::new((side, side, side), [0.0; 3], [1.0; 3]).unwrap();
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    grid.set(x, y, z, 1.0);
                }
            }
        }
        grid.padded(1)
    }

    #[test]
    fn test_cube_is_closed_sphere() {
        let mesh = SurfaceNets.extract(&solid_cube(3), 0.5).unwrap();

        // 64 cells minus the 8 fully inside
        assert_eq!(mesh.vertex_count(), 56);
        // 6 faces x 9 boundary edges x 2 triangles
        assert_eq!(mesh.triangle_count(), 108);
        assert!(mesh.is_closed());

        let edges = mesh.triangle_count() * 3 / 2;
        let euler = mesh.vertex_count() as i64 - edges as i64 + mesh.triangle_count() as i64;
        assert_eq!(euler, 2);

        let volume = mesh.signed_volume();
        assert!(volume > 8.0 && volume < 27.0, "volume {}", volume);

        let (min, max) = mesh.bounds().unwrap();
        for axis in 0..3 {
            assert!((min[axis] + 0.5).abs() < 1e-6);
            assert!((max[axis] - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_voxel_box() {
        let mesh = SurfaceNets.extract(&solid_cube(1), 0.5).unwrap();
        // Every cell of the 3x3x3 grid touches the voxel
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn test_uniform_grid_has_no_surface() {
        let grid = ScalarGrid::new((4, 4, 4), [0.0; 3], [1.0; 3]).unwrap();
        assert!(SurfaceNets.extract(&grid, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_level() {
        let grid = ScalarGrid::new((2, 2, 2), [0.0; 3], [1.0; 3]).unwrap();
        assert!(matches!(
            SurfaceNets.extract(&grid, f32::NAN),
            Err(SurfaceError::InvalidLevel(_))
        ));
    }
}
