// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use utils::rayon::prelude::*;

use crate::Hasher;

// CONSTANTS
// ================================================================================================

/// Levels with fewer nodes than this are hashed using a single thread.
pub const MIN_CONCURRENT_LEAVES: usize = 1024;

// PUBLIC FUNCTIONS
// ================================================================================================

/// Computes all internal nodes of a tree in place using all available threads. The leaves are
/// expected to be located in the second half of `nodes`.
///
/// Levels are processed from the bottom up; within a level, nodes are hashed in parallel as
/// long as the level contains at least [MIN_CONCURRENT_LEAVES] nodes. The resulting nodes are
/// identical to the nodes built by [build_merkle_nodes()](super::build_merkle_nodes).
pub fn build_merkle_nodes<H: Hasher>(hasher: &H, nodes: &mut [H::Digest]) {
    let num_leaves = nodes.len().div_ceil(2);
    let depth = num_leaves.trailing_zeros() as usize;

    for level in (0..depth).rev() {
        // nodes at the current level occupy [start, end), their children start at end
        let start = (1 << level) - 1;
        let end = 2 * start + 1;
        let (parents, children) = nodes.split_at_mut(end);
        let parents = &mut parents[start..];

        if parents.len() >= MIN_CONCURRENT_LEAVES {
            parents.par_iter_mut().enumerate().for_each(|(i, parent)| {
                *parent = hasher.merge(&[children[2 * i], children[2 * i + 1]]);
            });
        } else {
            for (i, parent) in parents.iter_mut().enumerate() {
                *parent = hasher.merge(&[children[2 * i], children[2 * i + 1]]);
            }
        }
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use math::fields::f254::BaseElement;
    use rand_utils::prng_vector;

    use crate::{hashers::MiMC7, MerkleTree};

    #[test]
    fn build_merkle_nodes_concurrent() {
        let hasher = MiMC7::default();
        let depth = 12;
        let leaves = prng_vector::<BaseElement>([7; 32], 3000);

        let mut sequential = vec![BaseElement::default(); (1 << depth) - 1];
        sequential.extend_from_slice(&leaves);
        sequential.resize((1 << (depth + 1)) - 1, BaseElement::default());
        let mut concurrent = sequential.clone();

        super::super::build_merkle_nodes(&hasher, &mut sequential);
        super::build_merkle_nodes(&hasher, &mut concurrent);
        assert_eq!(concurrent, sequential);

        let tree = MerkleTree::with_leaves(hasher, leaves, depth).unwrap();
        assert_eq!(tree.nodes(), &concurrent[..]);
    }
}
