// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! This crate contains the MiMC-7 hash function and a fixed-depth Merkle accumulator built on
//! top of it.
//!
//! # Hash function
//! [MiMC7](hashers::MiMC7) is a MiMC permutation with 91 rounds and the power-7 S-Box over the
//! scalar field of the BN254 curve, turned into a 2-to-1 compression function via the
//! Miyaguchi-Preneel construction: `hash(x, y) = E_y(x) + x + y`. Round constants are derived
//! from a seed by iterating Keccak-256, and are shared between clones of a hasher.
//!
//! # Merkle accumulator
//! [MerkleTree] is a complete binary tree of a fixed depth stored as a flat array of nodes in
//! level order: the root is at index 0, and children of node `i` are at `2i + 1` and `2i + 2`.
//! Leaves which have not been set are equal to zero. The tree supports incremental leaf
//! insertion, in-place leaf updates, and authentication path generation and verification.
//!
//! # Verification
//! The [verification] module rebuilds a tree from the leaves of an externally reported tree
//! and reports the first node at which the two trees disagree.
#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod hash;
pub use hash::{Digest, Hasher};
pub mod hashers {
    //! Contains implementations of the hash functions supported by this crate.

    pub use super::hash::{MiMC7, RoundConstants, DEFAULT_SEED, NUM_ROUNDS};
}

mod merkle;
pub use merkle::{build_merkle_nodes, MerkleTree, MAX_DEPTH};

#[cfg(feature = "concurrent")]
pub use merkle::concurrent;

pub mod verification;

mod errors;
pub use errors::{MerkleTreeError, VerificationError};
