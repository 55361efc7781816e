// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Structure tree CSV reading.
//!
//! Requires the `id`, `acronym`, `name` and `structure_id_path` columns; picks up
//! `parent_structure_id` and `color_hex_triplet` when present and ignores the rest.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{HierarchyError, HierarchyResult};
use ccf_structures::{StructureId, StructureRecord};

#[derive(Debug, Deserialize)]
struct StructureRow {
    id: StructureId,
    acronym: String,
    name: String,
    structure_id_path: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    parent_structure_id: Option<StructureId>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    color_hex_triplet: Option<String>,
}

impl From<StructureRow> for StructureRecord {
    fn from(row: StructureRow) -> Self {
        StructureRecord {
            id: row.id,
            acronym: row.acronym,
            name: row.name,
            structure_id_path: row.structure_id_path,
            parent_structure_id: row.parent_structure_id,
            color_hex_triplet: row.color_hex_triplet.filter(|color| !color.is_empty()),
        }
    }
}

/// Read every record from a structure tree CSV stream, in file order
pub fn read_structure_records<R: Read>(reader: R) -> HierarchyResult<Vec<StructureRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<StructureRow>()
        .map(|row| row.map(StructureRecord::from).map_err(HierarchyError::from))
        .collect()
}

/// Read every record from the structure tree CSV at `path`
pub fn load_structure_records(path: &Path) -> HierarchyResult<Vec<StructureRecord>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HierarchyError::StructureTreeNotFound(path.to_path_buf())
        } else {
            HierarchyError::Io(e)
        }
    })?;
    let records = read_structure_records(BufReader::new(file))?;
    tracing::info!(
        target: "ccf-hierarchy",
        "Loaded {} structures from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLEN_STYLE: &str = "\
id,atlas_id,name,acronym,st_level,ontology_id,hemisphere_id,weight,parent_structure_id,depth,graph_id,graph_order,structure_id_path,color_hex_triplet,neuro_name_structure_id,neuro_name_structure_id_path,failed,sphinx_id,structure_name_facet,failed_facet,safe_name
997,-1,root,root,0,1,3,8690,,0,1,0,/997/,FFFFFF,,,f,1,385153371,734881840,root
8,0,Basic cell groups and regions,grey,1,1,3,8690,997,1,1,1,/997/8/,BFDAE3,,,f,2,2244697386,734881840,Basic cell groups and regions
567,70,Cerebrum,CH,2,1,3,8690,8,2,1,2,/997/8/567/,B0F0FF,,,f,3,2878815794,734881840,Cerebrum
";

    #[test]
    fn test_reads_allen_layout() {
        let records = read_structure_records(ALLEN_STYLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 997);
        assert_eq!(records[0].parent_structure_id, None);
        assert_eq!(records[2].acronym, "CH");
        assert_eq!(records[2].parent_structure_id, Some(8));
        assert_eq!(records[2].structure_id_path, "/997/8/567/");
        assert_eq!(records[1].color_hex().as_deref(), Some("#BFDAE3"));
    }

    #[test]
    fn test_minimal_columns() {
        let csv = "id,acronym,name,structure_id_path\n1,root,root,/1/\n";
        let records = read_structure_records(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![StructureRecord::new(1, "root", "root", "/1/")]);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "id,acronym,name\n1,root,root\n";
        assert!(matches!(
            read_structure_records(csv.as_bytes()),
            Err(HierarchyError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_structure_records(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, HierarchyError::StructureTreeNotFound(_)));
    }
}
