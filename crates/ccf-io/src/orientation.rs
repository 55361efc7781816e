// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Axis reorientation from the file's native order to the canonical atlas frame.
//!
//! Native `(a0, a1, a2)` becomes `(a0, a2, a1)`, then axes 0 and 2 are
//! reversed, giving the right-handed (x, flipped superior-inferior, y)
//! convention the mask and surface code assume.

use ndarray::{Array3, Axis};

/// Permute and flip a native-order volume into canonical orientation.
///
/// `out[[i, j, k]] == native[[n0 - 1 - i, n1 - 1 - k, j]]`. The result is an
/// owned, standard-layout array.
pub fn reorient_to_canonical<T: Clone>(native: Array3<T>) -> Array3<T> {
    let mut canonical = native.permuted_axes([0, 2, 1]);
    canonical.invert_axis(Axis(0));
    canonical.invert_axis(Axis(2));
    if canonical.is_standard_layout() {
        canonical
    } else {
        canonical.as_standard_layout().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_and_flips() {
        let (n0, n1, n2) = (2, 3, 4);
        let native = Array3::from_shape_fn((n0, n1, n2), |(a, b, c)| (a * 100 + b * 10 + c) as u32);
        let canonical = reorient_to_canonical(native.clone());

        assert_eq!(canonical.dim(), (n0, n2, n1));
        assert!(canonical.is_standard_layout());
        for ((i, j, k), &value) in canonical.indexed_iter() {
            assert_eq!(value, native[[n0 - 1 - i, n1 - 1 - k, j]]);
        }
    }

    #[test]
    fn test_single_voxel() {
        let native = Array3::from_elem((1, 1, 1), 997u32);
        assert_eq!(reorient_to_canonical(native)[[0, 0, 0]], 997);
    }
}
