// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::AHashMap;

/// Indexed triangle mesh with counter-clockwise (outward) winding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds `(min, max)`, `None` without vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }

    /// Enclosed volume by the divergence theorem; positive for outward winding
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let [a, b, c] = [a, b, c].map(|i| self.vertices[i as usize].map(f64::from));
                let cross = [
                    b[1] * c[2] - b[2] * c[1],
                    b[2] * c[0] - b[0] * c[2],
                    b[0] * c[1] - b[1] * c[0],
                ];
                (a[0] * cross[0] + a[1] * cross[1] + a[2] * cross[2]) / 6.0
            })
            .sum()
    }

    /// Every directed edge is matched by the same number of reverse edges,
    /// i.e. the surface has no holes and consistent orientation
    pub fn is_closed(&self) -> bool {
        let mut balance: AHashMap<(u32, u32), i64> = AHashMap::new();
        for &[a, b, c] in &self.triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let (key, delta) = if from < to { ((from, to), 1) } else { ((to, from), -1) };
                *balance.entry(key).or_insert(0) += delta;
            }
        }
        balance.values().all(|&count| count == 0)
    }
}
