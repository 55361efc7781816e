// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Descendant Resolution Property Tests
//!
//! Random trees with uneven depths (often deeper than the 11-column minimum)
//! are encoded as structure tables and resolved through the path matrix. The
//! reference answer comes from walking parent links directly:
//! - no descendant is dropped or duplicated
//! - leaves resolve to themselves only
//! - every matrix row reproduces its source path
//! - tables listing only leaves resolve the same subtrees

use std::collections::BTreeSet;

use ccf_hierarchy::{build_path_matrix, find_descendants, StructureTree};
use ccf_structures::{StructureId, StructureRecord};
use proptest::prelude::*;

/// Tree given as `parents[i]` = parent index of node `i + 1`; node 0 is the root
#[derive(Debug, Clone)]
struct RandomTree {
    parents: Vec<usize>,
}

impl RandomTree {
    fn node_count(&self) -> usize {
        self.parents.len() + 1
    }

    fn id(node: usize) -> StructureId {
        // Non-contiguous IDs, never 0
        (node as StructureId) * 7 + 3
    }

    fn parent(&self, node: usize) -> Option<usize> {
        if node == 0 {
            None
        } else {
            Some(self.parents[node - 1])
        }
    }

    fn chain(&self, node: usize) -> Vec<usize> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    fn path(&self, node: usize) -> String {
        let mut path = String::from("/");
        for ancestor in self.chain(node) {
            path.push_str(&format!("{}/", Self::id(ancestor)));
        }
        path
    }

    fn is_leaf(&self, node: usize) -> bool {
        !self.parents.contains(&node)
    }

    fn subtree(&self, node: usize) -> BTreeSet<StructureId> {
        (0..self.node_count())
            .filter(|&other| self.chain(other).contains(&node))
            .map(Self::id)
            .collect()
    }

    fn record(&self, node: usize) -> StructureRecord {
        let id = Self::id(node);
        StructureRecord::new(id, format!("N{id}"), format!("Node {id}"), self.path(node))
    }

    fn full_table(&self) -> Vec<StructureRecord> {
        (0..self.node_count()).map(|node| self.record(node)).collect()
    }

    fn leaf_table(&self) -> Vec<StructureRecord> {
        (0..self.node_count())
            .filter(|&node| self.is_leaf(node))
            .map(|node| self.record(node))
            .collect()
    }
}

fn random_tree() -> impl Strategy<Value = RandomTree> {
    (1usize..40).prop_flat_map(|extra_nodes| {
        // Bias towards deep chains: parent is often the previous node
        (0..extra_nodes)
            .map(|i| {
                prop_oneof![
                    3 => Just(i),
                    1 => 0..=i,
                ]
            })
            .collect::<Vec<_>>()
            .prop_map(|parents| RandomTree { parents })
    })
}

proptest! {
    #[test]
    fn prop_full_table_matches_parent_walk(tree in random_tree()) {
        let table = tree.full_table();
        let matrix = build_path_matrix(&table).unwrap();
        for node in 0..tree.node_count() {
            let id = RandomTree::id(node);
            let resolved: BTreeSet<StructureId> =
                find_descendants(id, &matrix).unwrap().iter().collect();
            prop_assert!(resolved.contains(&id));
            prop_assert_eq!(&resolved, &tree.subtree(node));
            if tree.is_leaf(node) {
                prop_assert_eq!(resolved.len(), 1);
            }
        }
    }

    #[test]
    fn prop_rows_reproduce_paths(tree in random_tree()) {
        let table = tree.full_table();
        let matrix = build_path_matrix(&table).unwrap();
        prop_assert!(matrix.depth() >= 11);
        for (row, record) in table.iter().enumerate() {
            let expected: Vec<StructureId> = record
                .structure_id_path
                .split('/')
                .filter(|token| !token.is_empty())
                .map(|token| token.parse().unwrap())
                .collect();
            prop_assert_eq!(matrix.chain(row), expected);
        }
    }

    #[test]
    fn prop_leaf_only_table_matches_parent_walk(tree in random_tree()) {
        let matrix = build_path_matrix(&tree.leaf_table()).unwrap();
        for node in 0..tree.node_count() {
            let resolved: BTreeSet<StructureId> = find_descendants(RandomTree::id(node), &matrix)
                .unwrap()
                .iter()
                .collect();
            prop_assert_eq!(resolved, tree.subtree(node));
        }
    }

    #[test]
    fn prop_tree_owner_agrees_with_free_function(tree in random_tree()) {
        let owned = StructureTree::from_records(tree.full_table()).unwrap();
        let matrix = build_path_matrix(&tree.full_table()).unwrap();
        for node in 0..tree.node_count() {
            let id = RandomTree::id(node);
            prop_assert_eq!(
                owned.find_descendants(id).unwrap(),
                find_descendants(id, &matrix).unwrap()
            );
        }
    }
}
