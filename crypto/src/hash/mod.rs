// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use core::fmt::{Debug, Display};

use math::fields::f254::BaseElement;
use utils::{Deserializable, Serializable};

mod mimc;
pub use mimc::{MiMC7, RoundConstants, DEFAULT_SEED, NUM_ROUNDS};

// HASHER TRAIT
// ================================================================================================

/// Defines a cryptographic hash function which can be used to compress two digests into one.
///
/// Unlike stateless hashers, instances of this trait may carry parameters (e.g. round constants)
/// which are fixed at construction time; the instance is therefore passed by reference to all
/// hashing methods. Instances are expected to be cheap to clone.
pub trait Hasher: Clone + Send + Sync {
    /// Specifies a digest type returned by this hasher.
    type Digest: Digest;

    /// Returns a hash of two digests. This method is intended for use in construction of
    /// Merkle trees; the first digest is the left child and the second digest is the right
    /// child.
    fn merge(&self, values: &[Self::Digest; 2]) -> Self::Digest;
}

// DIGEST TRAIT
// ================================================================================================

/// Defines output type for a cryptographic hash function.
///
/// The default value of a digest is used as the value of empty Merkle tree leaves.
pub trait Digest:
    Debug
    + Display
    + Default
    + Copy
    + Clone
    + Eq
    + PartialEq
    + Send
    + Sync
    + Serializable
    + Deserializable
{
    /// Returns this digest serialized into an array of 32 bytes.
    fn as_bytes(&self) -> [u8; 32];
}

impl Digest for BaseElement {
    fn as_bytes(&self) -> [u8; 32] {
        self.to_be_bytes()
    }
}
