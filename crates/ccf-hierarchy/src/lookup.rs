// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ccf_structures::StructureRecord;

/// Find a structure by its acronym (exact, case-sensitive).
///
/// A miss is expected when acronyms come from user input: it is logged as a
/// warning and reported as `None` so batch callers can skip the entry.
pub fn lookup_by_acronym<'a>(
    acronym: &str,
    structures: &'a [StructureRecord],
) -> Option<&'a StructureRecord> {
    let found = structures.iter().find(|record| record.acronym == acronym);
    if found.is_none() {
        warn_acronym_not_found(acronym);
    }
    found
}

pub(crate) fn warn_acronym_not_found(acronym: &str) {
    tracing::warn!(
        target: "ccf-hierarchy",
        "Abbreviation '{}' not found in structure tree",
        acronym
    );
}
