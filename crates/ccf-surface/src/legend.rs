// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Legend manifest written next to exported meshes.
//!
//! One entry per mesh with the name, colour and opacity a renderer needs to
//! draw it and label it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ccf_structures::{RegionInfo, StructureId};
use serde::{Deserialize, Serialize};

use crate::error::SurfaceResult;

/// File name of the manifest inside an export folder
pub const LEGEND_FILE_NAME: &str = "legend.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    /// `None` for meshes not tied to a single structure (the brain outline)
    pub acronym: Option<String>,
    pub id: Option<StructureId>,
    /// `#RRGGBB`
    pub color: String,
    pub opacity: f32,
    /// Mesh path relative to the manifest
    pub mesh_file: String,
}

impl LegendEntry {
    pub fn for_region(info: &RegionInfo, color: impl Into<String>, mesh_file: impl Into<String>) -> Self {
        Self {
            name: info.name.clone(),
            acronym: Some(info.acronym.clone()),
            id: Some(info.id),
            color: color.into(),
            opacity: 1.0,
            mesh_file: mesh_file.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendManifest {
    pub entries: Vec<LegendEntry>,
}

impl LegendManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self, path: &Path) -> SurfaceResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> SurfaceResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = LegendManifest::new();
        manifest.push(LegendEntry {
            name: "Brain".to_string(),
            acronym: None,
            id: None,
            color: "#000000".to_string(),
            opacity: 0.2,
            mesh_file: "brain.ply".to_string(),
        });
        let info = RegionInfo {
            id: 567,
            name: "Cerebrum".to_string(),
            acronym: "CH".to_string(),
        };
        manifest.push(LegendEntry::for_region(&info, "#B0F0FF", "CH.ply"));

        let json: serde_json::Value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["entries"][0]["acronym"], serde_json::Value::Null);
        assert_eq!(json["entries"][1]["id"], 567);
        assert_eq!(json["entries"][1]["opacity"], 1.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEGEND_FILE_NAME);
        manifest.save(&path).unwrap();
        assert_eq!(LegendManifest::load(&path).unwrap(), manifest);
    }
}
