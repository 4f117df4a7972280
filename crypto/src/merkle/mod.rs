// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::vec::Vec;

use tracing::{event, info_span, Level};
use utils::{ByteWriter, Serializable};

use crate::{errors::MerkleTreeError, Hasher};

#[cfg(feature = "concurrent")]
pub mod concurrent;


// CONSTANTS
// ================================================================================================

/// Maximum depth of a Merkle tree. Nodes of a tree of this depth take up 64 MiB when digests are
/// 32 bytes long.
pub const MAX_DEPTH: usize = 20;

// MERKLE TREE
// ================================================================================================

/// A fully-balanced Merkle tree of a fixed depth.
///
/// The tree is stored as a flat vector of `2^(depth + 1) - 1` nodes in level order: the root is
/// at position 0, and children of the node at position `i` are at positions `2i + 1` and
/// `2i + 2`. Thus, nodes at level `l` occupy positions `[2^l - 1, 2^(l + 1) - 1)`, and the
/// `2^depth` leaves occupy the last positions of the vector.
///
/// Leaves which have not been explicitly set hold the default digest value (i.e., zero for
/// field element digests). Leaves can be filled in sequentially via [insert()](Self::insert),
/// or overwritten at arbitrary positions via [update_leaf()](Self::update_leaf); in both cases
/// only the nodes on the path from the leaf to the root are recomputed.
///
/// When `concurrent` feature is enabled, the initial tree construction hashes large levels
/// using all threads available in Rayon's global thread pool.
///
/// Two trees are equal when they have the same depth and the same nodes; the position of the
/// next insertion is not compared.
#[derive(Debug, Clone)]
pub struct MerkleTree<H: Hasher> {
    hasher: H,
    depth: usize,
    nodes: Vec<H::Digest>,
    next_index: usize,
}

impl<H: Hasher> MerkleTree<H> {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a new tree of the specified depth with all leaves set to the default digest.
    ///
    /// # Errors
    /// Returns an error if `depth` is zero or greater than [MAX_DEPTH].
    pub fn new(hasher: H, depth: usize) -> Result<Self, MerkleTreeError> {
        let num_leaves = num_leaves_for_depth(depth)?;
        let nodes = info_span!("build_empty_merkle_tree", depth)
            .in_scope(|| build_empty_nodes(&hasher, depth, num_leaves));
        Ok(MerkleTree { hasher, depth, nodes, next_index: 0 })
    }

    /// Returns a new tree of the specified depth with the leftmost leaves set to the provided
    /// `leaves`; all other leaves are set to the default digest.
    ///
    /// Leaves which have been provided here count as inserted, so a subsequent call to
    /// [insert()](Self::insert) writes to the first slot after them.
    ///
    /// # Errors
    /// Returns an error if:
    /// * `depth` is zero or greater than [MAX_DEPTH].
    /// * The number of `leaves` is greater than `2^depth`.
    pub fn with_leaves(
        hasher: H,
        leaves: Vec<H::Digest>,
        depth: usize,
    ) -> Result<Self, MerkleTreeError> {
        let num_leaves = num_leaves_for_depth(depth)?;
        if leaves.len() > num_leaves {
            return Err(MerkleTreeError::TooManyLeaves {
                depth,
                max: num_leaves,
                actual: leaves.len(),
            });
        }
        let next_index = leaves.len();

        let nodes = info_span!("build_merkle_tree", depth, num_leaves = next_index).in_scope(|| {
            let mut nodes = Vec::with_capacity(2 * num_leaves - 1);
            nodes.resize(num_leaves - 1, H::Digest::default());
            nodes.extend(leaves);
            nodes.resize(2 * num_leaves - 1, H::Digest::default());

            #[cfg(not(feature = "concurrent"))]
            build_merkle_nodes(&hasher, &mut nodes);

            #[cfg(feature = "concurrent")]
            concurrent::build_merkle_nodes(&hasher, &mut nodes);

            nodes
        });
        event!(Level::DEBUG, "built Merkle tree with {} nodes", nodes.len());

        Ok(MerkleTree { hasher, depth, nodes, next_index })
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the root of the tree.
    pub fn root(&self) -> H::Digest {
        self.nodes[0]
    }

    /// Returns depth of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of leaf slots in the tree; this is always `2^depth`.
    pub fn num_leaves(&self) -> usize {
        1 << self.depth
    }

    /// Returns the index of the leaf slot which will be written by the next call to
    /// [insert()](Self::insert).
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Returns the hasher used by this tree.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns all nodes of the tree in level order starting with the root.
    pub fn nodes(&self) -> &[H::Digest] {
        &self.nodes
    }

    /// Returns leaf nodes of the tree.
    pub fn leaves(&self) -> &[H::Digest] {
        &self.nodes[self.num_leaves() - 1..]
    }

    /// Returns the leaf at the specified index, or None if the index is out of bounds.
    pub fn leaf(&self, index: usize) -> Option<H::Digest> {
        self.leaves().get(index).copied()
    }

    /// Returns nodes of the tree at the specified level ordered from left to right, or None if
    /// the level is greater than the depth of the tree. Level 0 contains only the root, and level
    /// `depth` contains all leaves.
    pub fn level(&self, level: usize) -> Option<&[H::Digest]> {
        if level > self.depth {
            return None;
        }
        let start = (1 << level) - 1;
        Some(&self.nodes[start..2 * start + 1])
    }

    /// Consumes the tree and returns all its nodes in level order starting with the root.
    pub fn into_nodes(self) -> Vec<H::Digest> {
        self.nodes
    }

    // STATE MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Sets the leaf at the specified index to the provided value and recomputes all nodes on
    /// the path from this leaf to the root.
    ///
    /// # Errors
    /// Returns an error if `index` is greater than or equal to the number of leaves in the tree.
    pub fn update_leaf(&mut self, index: usize, value: H::Digest) -> Result<(), MerkleTreeError> {
        let num_leaves = self.num_leaves();
        if index >= num_leaves {
            return Err(MerkleTreeError::LeafIndexOutOfBounds(index, num_leaves));
        }

        let mut pos = num_leaves - 1 + index;
        self.nodes[pos] = value;
        while pos > 0 {
            pos = (pos - 1) / 2;
            self.nodes[pos] =
                self.hasher.merge(&[self.nodes[2 * pos + 1], self.nodes[2 * pos + 2]]);
        }

        Ok(())
    }

    /// Writes the provided value into the next unused leaf slot and returns the index of this
    /// slot.
    ///
    /// # Errors
    /// Returns an error if all leaf slots of the tree have already been used.
    pub fn insert(&mut self, value: H::Digest) -> Result<usize, MerkleTreeError> {
        let index = self.next_index;
        if index == self.num_leaves() {
            return Err(MerkleTreeError::TreeFull(index));
        }
        self.update_leaf(index, value)?;
        self.next_index += 1;
        Ok(index)
    }

    // PROVING AND VERIFICATION
    // --------------------------------------------------------------------------------------------

    /// Returns an authentication path for the leaf at the specified index.
    ///
    /// The path consists of `depth` sibling nodes ordered from the leaf level up to the level
    /// right below the root.
    ///
    /// # Errors
    /// Returns an error if `index` is greater than or equal to the number of leaves in the tree.
    pub fn prove(&self, index: usize) -> Result<Vec<H::Digest>, MerkleTreeError> {
        let num_leaves = self.num_leaves();
        if index >= num_leaves {
            return Err(MerkleTreeError::LeafIndexOutOfBounds(index, num_leaves));
        }

        let mut path = Vec::with_capacity(self.depth);
        let mut pos = num_leaves - 1 + index;
        while pos > 0 {
            // left children are at odd positions
            let sibling = if pos & 1 == 1 { pos + 1 } else { pos - 1 };
            path.push(self.nodes[sibling]);
            pos = (pos - 1) / 2;
        }

        Ok(path)
    }

    /// Checks whether `path` is a valid authentication path for `leaf` located at the specified
    /// index in a tree with the specified root. The depth of the tree is implied by the length
    /// of the path.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The length of the path is zero or greater than [MAX_DEPTH].
    /// * `index` does not fit into a tree of the implied depth.
    /// * The root computed from the path differs from `root`.
    pub fn verify(
        hasher: &H,
        root: H::Digest,
        index: usize,
        leaf: H::Digest,
        path: &[H::Digest],
    ) -> Result<(), MerkleTreeError> {
        let num_leaves =
            num_leaves_for_depth(path.len()).map_err(|_| MerkleTreeError::InvalidProof)?;
        if index >= num_leaves {
            return Err(MerkleTreeError::LeafIndexOutOfBounds(index, num_leaves));
        }

        let mut value = leaf;
        let mut index = index;
        for &sibling in path {
            value = if index & 1 == 0 {
                hasher.merge(&[value, sibling])
            } else {
                hasher.merge(&[sibling, value])
            };
            index >>= 1;
        }

        if value != root {
            return Err(MerkleTreeError::InvalidProof);
        }
        Ok(())
    }
}

impl<H: Hasher> PartialEq for MerkleTree<H> {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth && self.nodes == other.nodes
    }
}

impl<H: Hasher> Eq for MerkleTree<H> {}

// SERIALIZATION
// ================================================================================================

impl<H: Hasher> Serializable for MerkleTree<H> {
    /// Writes all nodes of the tree in level order starting with the root.
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_many(&self.nodes);
    }

    fn get_size_hint(&self) -> usize {
        self.nodes.get_size_hint()
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Returns the number of leaves in a tree of the specified depth.
///
/// # Errors
/// Returns an error if the depth is zero or greater than [MAX_DEPTH].
pub(crate) fn num_leaves_for_depth(depth: usize) -> Result<usize, MerkleTreeError> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(MerkleTreeError::InvalidDepth(depth, MAX_DEPTH));
    }
    Ok(1 << depth)
}

/// Computes all internal nodes of a tree in place. The leaves are expected to be located in the
/// second half of `nodes`.
pub fn build_merkle_nodes<H: Hasher>(hasher: &H, nodes: &mut [H::Digest]) {
    for i in (0..nodes.len() / 2).rev() {
        nodes[i] = hasher.merge(&[nodes[2 * i + 1], nodes[2 * i + 2]]);
    }
}

/// Builds nodes of a tree in which all leaves are set to the default digest. All nodes at the
/// same level are equal, so only one hash per level needs to be computed.
fn build_empty_nodes<H: Hasher>(hasher: &H, depth: usize, num_leaves: usize) -> Vec<H::Digest> {
    let mut nodes = Vec::with_capacity(2 * num_leaves - 1);
    nodes.resize(2 * num_leaves - 1, H::Digest::default());

    let mut value = H::Digest::default();
    for level in (0..depth).rev() {
        value = hasher.merge(&[value, value]);
        let start = (1 << level) - 1;
        nodes[start..2 * start + 1].fill(value);
    }

    nodes
}
