// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-checking of externally reported Merkle trees.
//!
//! An externally reported tree (e.g., the node array returned by an on-chain tree contract) is
//! represented by [ExternalTree]. The tree is checked by rebuilding it locally from its leaves
//! via [MerkleTree::with_leaves()], and then comparing the two trees node by node with
//! [compare_trees()]. The comparison starts at the leaf level and proceeds towards the root,
//! scanning each level from left to right; the first differing node is reported.

use alloc::{string::ToString, vec::Vec};

use tracing::{event, info_span, Level};
use utils::{ByteReader, DeserializationError, SliceReader, WORD_SIZE};

use crate::{
    errors::VerificationError,
    merkle::num_leaves_for_depth,
    Digest, Hasher, MerkleTree,
};


// EXTERNAL TREE
// ================================================================================================

/// A Merkle tree reported by an external source.
///
/// The tree consists of all nodes of a complete binary tree in level order starting with the
/// root, and optionally a separately reported root value. No relationship between the nodes is
/// assumed; only the structure (i.e., the number of nodes) is validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTree<D: Digest> {
    depth: usize,
    nodes: Vec<D>,
    root: Option<D>,
}

impl<D: Digest> ExternalTree<D> {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a new external tree consisting of the specified nodes and an optional separately
    /// reported root. The depth of the tree is inferred from the number of nodes.
    ///
    /// # Errors
    /// Returns an error if the number of nodes is not `2^(d + 1) - 1` for some depth `d`
    /// between 1 and [MAX_DEPTH](crate::MAX_DEPTH).
    pub fn from_nodes(nodes: Vec<D>, root: Option<D>) -> Result<Self, VerificationError> {
        let depth = depth_from_node_count(nodes.len())?;
        Ok(Self { depth, nodes, root })
    }

    /// Returns a new external tree decoded from a concatenation of 32-byte big-endian node
    /// values in level order. The returned tree has no separately reported root; use
    /// [with_root()](Self::with_root) to set one.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The length of `bytes` is not a multiple of 32.
    /// * Any of the values is not a valid digest.
    /// * The number of nodes does not form a complete binary tree of a supported depth.
    pub fn read_from_bytes(bytes: &[u8]) -> Result<Self, VerificationError> {
        if bytes.len() % WORD_SIZE != 0 {
            return Err(VerificationError::InvalidNodeEncoding(DeserializationError::InvalidValue(
                format!("expected a multiple of {WORD_SIZE} bytes, but was {} bytes", bytes.len()),
            )));
        }
        let num_nodes = bytes.len() / WORD_SIZE;
        // fail on the structure before decoding any of the values
        depth_from_node_count(num_nodes)?;

        let mut reader = SliceReader::new(bytes);
        let nodes = reader.read_many::<D>(num_nodes)?;
        Self::from_nodes(nodes, None)
    }

    /// Sets the separately reported root of this tree.
    pub fn with_root(mut self, root: D) -> Self {
        self.root = Some(root);
        self
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns depth of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns all nodes of the tree in level order starting with the root.
    pub fn nodes(&self) -> &[D] {
        &self.nodes
    }

    /// Returns leaf nodes of the tree.
    pub fn leaves(&self) -> &[D] {
        &self.nodes[(1 << self.depth) - 1..]
    }

    /// Returns nodes of the tree at the specified level, or None if the level is greater than
    /// the depth of the tree.
    pub fn level(&self, level: usize) -> Option<&[D]> {
        if level > self.depth {
            return None;
        }
        let start = (1 << level) - 1;
        Some(&self.nodes[start..2 * start + 1])
    }

    /// Returns the separately reported root, if any.
    pub fn reported_root(&self) -> Option<D> {
        self.root
    }

    // TREE RECONSTRUCTION
    // --------------------------------------------------------------------------------------------

    /// Builds a local Merkle tree from the leaves of this tree using the specified hasher.
    ///
    /// Leaves are assumed to have been filled in from left to right, so the rebuilt tree
    /// continues insertion right after the last leaf which differs from the default digest.
    ///
    /// # Errors
    /// Returns an error if the local tree could not be built.
    pub fn rebuild<H>(&self, hasher: H) -> Result<MerkleTree<H>, VerificationError>
    where
        H: Hasher<Digest = D>,
    {
        let leaves = self.leaves();
        let num_used =
            leaves.iter().rposition(|leaf| *leaf != D::default()).map_or(0, |i| i + 1);
        let tree = MerkleTree::with_leaves(hasher, leaves[..num_used].to_vec(), self.depth)?;
        Ok(tree)
    }
}

// COMPARISON
// ================================================================================================

/// Checks whether an externally reported tree is identical to a locally computed one.
///
/// The trees are compared level by level starting with the leaves; within each level, nodes
/// are compared from left to right. If the external tree carries a separately reported root,
/// this root is checked last.
///
/// # Errors
/// Returns an error if:
/// * Depths of the two trees differ.
/// * Any node of the external tree differs from the corresponding local node; the first such
///   node is reported.
/// * The separately reported root differs from the root of the local tree.
pub fn compare_trees<H: Hasher>(
    local: &MerkleTree<H>,
    external: &ExternalTree<H::Digest>,
) -> Result<(), VerificationError> {
    if local.depth() != external.depth() {
        return Err(VerificationError::DepthMismatch {
            expected: local.depth(),
            actual: external.depth(),
        });
    }

    for level in (0..=local.depth()).rev() {
        let expected = local.level(level).unwrap_or_default();
        let actual = external.level(level).unwrap_or_default();
        let mismatch = expected.iter().zip(actual).position(|(e, a)| e != a);
        if let Some(index) = mismatch {
            event!(Level::WARN, level, index, "external tree node does not match local node");
            return Err(VerificationError::NodeMismatch {
                level,
                index,
                expected: expected[index].to_string(),
                actual: actual[index].to_string(),
            });
        }
    }

    if let Some(root) = external.reported_root() {
        if root != local.root() {
            event!(Level::WARN, "reported root does not match local root");
            return Err(VerificationError::RootMismatch {
                expected: local.root().to_string(),
                actual: root.to_string(),
            });
        }
    }

    Ok(())
}

/// Rebuilds the external tree locally from its leaves and checks that all reported nodes match
/// the locally computed ones. Returns the locally computed tree on success.
///
/// # Errors
/// Returns an error if the local tree could not be built, or if the trees do not match; see
/// [compare_trees()] for details.
pub fn verify_external_tree<H: Hasher>(
    hasher: H,
    external: &ExternalTree<H::Digest>,
) -> Result<MerkleTree<H>, VerificationError> {
    info_span!("verify_external_tree", depth = external.depth()).in_scope(|| {
        let local = external.rebuild(hasher)?;
        compare_trees(&local, external)?;
        event!(Level::DEBUG, "verified {} nodes of external tree", external.nodes().len());
        Ok(local)
    })
}

// HELPER FUNCTIONS
// ================================================================================================

/// Returns depth of a complete binary tree with the specified number of nodes.
fn depth_from_node_count(num_nodes: usize) -> Result<usize, VerificationError> {
    match num_nodes.checked_add(1) {
        Some(n) if n > 2 && n.is_power_of_two() => {
            let depth = (n.trailing_zeros() - 1) as usize;
            match num_leaves_for_depth(depth) {
                Ok(_) => Ok(depth),
                Err(_) => Err(VerificationError::InvalidNodeCount(num_nodes)),
            }
        },
        _ => Err(VerificationError::InvalidNodeCount(num_nodes)),
    }
}
