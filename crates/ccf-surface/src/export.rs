// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Binary little-endian PLY and STL writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{SurfaceError, SurfaceResult};
use crate::mesh::TriangleMesh;

/// STL binary header size in bytes
const STL_HEADER_SIZE: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshFormat {
    #[default]
    Ply,
    Stl,
}

impl MeshFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MeshFormat::Ply => "ply",
            MeshFormat::Stl => "stl",
        }
    }
}

impl FromStr for MeshFormat {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ply" => Ok(MeshFormat::Ply),
            "stl" => Ok(MeshFormat::Stl),
            other => Err(SurfaceError::UnknownFormat(other.to_string())),
        }
    }
}

/// Write `mesh` to `path` in `format`
pub fn save_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P, format: MeshFormat) -> SurfaceResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    match format {
        MeshFormat::Ply => write_ply(mesh, &mut writer)?,
        MeshFormat::Stl => write_stl(mesh, &mut writer)?,
    }
    writer.flush()?;

    tracing::info!(
        target: "ccf-surface",
        "Saved {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

/// Binary PLY: float xyz vertices, uchar-counted int index faces
pub fn write_ply<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> SurfaceResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by ccf-surface")?;
    writeln!(writer, "element vertex {}", mesh.vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", mesh.triangles.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for vertex in &mesh.vertices {
        for coord in vertex {
            writer.write_all(&coord.to_le_bytes())?;
        }
    }

    for triangle in &mesh.triangles {
        writer.write_all(&[3u8])?;
        for &index in triangle {
            #[allow(clippy::cast_possible_wrap)]
            writer.write_all(&(index as i32).to_le_bytes())?;
        }
    }

    Ok(())
}

/// Binary STL: 80-byte header, triangle count, then normal + 3 vertices per facet
pub fn write_stl<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> SurfaceResult<()> {
    let mut header = [b' '; STL_HEADER_SIZE];
    let text = b"Binary STL generated by ccf-surface";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    let facet_count = mesh.triangles.len() as u32;
    writer.write_all(&facet_count.to_le_bytes())?;

    for &[a, b, c] in &mesh.triangles {
        let [v0, v1, v2] = [a, b, c].map(|i| mesh.vertices[i as usize]);
        for component in facet_normal(v0, v1, v2) {
            writer.write_all(&component.to_le_bytes())?;
        }
        for vertex in [v0, v1, v2] {
            for coord in vertex {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn facet_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let normal = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    if len > f32::EPSILON {
        normal.map(|n| n / len)
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PLY".parse::<MeshFormat>().unwrap(), MeshFormat::Ply);
        assert_eq!("stl".parse::<MeshFormat>().unwrap().extension(), "stl");
        assert!(matches!(
            "obj".parse::<MeshFormat>(),
            Err(SurfaceError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_stl_layout() {
        let mut bytes = Vec::new();
        write_stl(&triangle(), &mut bytes).unwrap();

        assert_eq!(bytes.len(), 80 + 4 + 50);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        // Normal of a counter-clockwise triangle in the xy plane is +z
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn test_ply_layout() {
        let mut bytes = Vec::new();
        write_ply(&triangle(), &mut bytes).unwrap();

        let header_end = b"end_header\n";
        let split = bytes
            .windows(header_end.len())
            .position(|w| w == header_end)
            .unwrap()
            + header_end.len();
        let header = std::str::from_utf8(&bytes[..split]).unwrap();
        assert!(header.contains("element vertex 3"));
        assert!(header.contains("element face 1"));
        // 3 vertices x 12 bytes, then 1 + 3 x 4 bytes per face
        assert_eq!(bytes.len() - split, 36 + 13);
    }
}
