// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::string::String;

use thiserror::Error;
use utils::DeserializationError;

// MERKLE TREE ERROR
// ================================================================================================

/// Defines errors which can occur when building, updating, or verifying a Merkle tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleTreeError {
    #[error("tree depth must be between 1 and {1}, but was {0}")]
    InvalidDepth(usize, usize),

    #[error("a tree of depth {depth} can hold at most {max} leaves, but {actual} were provided")]
    TooManyLeaves { depth: usize, max: usize, actual: usize },

    #[error("leaf index {0} is out of bounds for a tree with {1} leaves")]
    LeafIndexOutOfBounds(usize, usize),

    #[error("all {0} leaf slots of the tree are already occupied")]
    TreeFull(usize),

    #[error("authentication path does not resolve to the expected root")]
    InvalidProof,
}

// VERIFICATION ERROR
// ================================================================================================

/// Defines errors which can occur when an externally reported tree is checked against a locally
/// computed one.
///
/// Node values are carried in their decimal representation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{0} nodes do not form a complete binary tree of a supported depth")]
    InvalidNodeCount(usize),

    #[error("failed to decode tree nodes: {0}")]
    InvalidNodeEncoding(#[from] DeserializationError),

    #[error("failed to rebuild tree: {0}")]
    InvalidTree(#[from] MerkleTreeError),

    #[error("tree depths do not match: expected {expected}, but was {actual}")]
    DepthMismatch { expected: usize, actual: usize },

    #[error("node {index} at level {level} does not match: expected {expected}, but was {actual}")]
    NodeMismatch { level: usize, index: usize, expected: String, actual: String },

    #[error("reported root does not match: expected {expected}, but was {actual}")]
    RootMismatch { expected: String, actual: String },
}
