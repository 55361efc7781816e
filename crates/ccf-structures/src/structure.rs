// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Anatomical structure identifier as stored in the annotation volume
pub type StructureId = u32;

/// Root structure, conventionally the whole-brain outline
pub const BRAIN_OUTLINE_ID: StructureId = 1;

/// One row of the structure tree.
///
/// `structure_id_path` lists the ancestor chain root-first and ends with the
/// structure's own ID, e.g. `/997/8/567/688/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub id: StructureId,
    pub acronym: String,
    pub name: String,
    pub structure_id_path: String,
    #[serde(default)]
    pub parent_structure_id: Option<StructureId>,
    /// Allen display colour, six hex digits without a leading `#`
    #[serde(default)]
    pub color_hex_triplet: Option<String>,
}

impl StructureRecord {
    pub fn new(
        id: StructureId,
        acronym: impl Into<String>,
        name: impl Into<String>,
        structure_id_path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            acronym: acronym.into(),
            name: name.into(),
            structure_id_path: structure_id_path.into(),
            parent_structure_id: None,
            color_hex_triplet: None,
        }
    }

    pub fn with_color(mut self, hex_triplet: impl Into<String>) -> Self {
        self.color_hex_triplet = Some(hex_triplet.into());
        self
    }

    /// Colour as `#RRGGBB`, if the record carries a well-formed one
    pub fn color_hex(&self) -> Option<String> {
        let raw = self.color_hex_triplet.as_deref()?.trim().trim_start_matches('#');
        if raw.len() == 6 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(format!("#{}", raw.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn region_info(&self) -> RegionInfo {
        RegionInfo {
            id: self.id,
            name: self.name.clone(),
            acronym: self.acronym.clone(),
        }
    }
}

/// Identity of a region as reported to callers looking structures up by acronym
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionInfo {
    pub id: StructureId,
    pub name: String,
    pub acronym: String,
}
