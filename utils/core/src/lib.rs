// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! This crate contains utility traits and functions used by the MiMC hash and Merkle tree
//! crates.
//!
//! Everything that crosses a crate boundary as bytes is encoded as a sequence of fixed-width
//! big-endian words; the readers and writers defined here follow that convention.
#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod serde;
pub use serde::{ByteReader, ByteWriter, Deserializable, Serializable, SliceReader, WORD_SIZE};

mod errors;
pub use errors::DeserializationError;

#[cfg(test)]
mod tests;

// FEATURE-BASED RE-EXPORTS
// ================================================================================================

#[cfg(feature = "concurrent")]
pub use rayon;

// RANDOMNESS
// ================================================================================================

/// Values which can be sampled from uniformly random bytes.
///
/// Sampling is by rejection: a caller draws [VALUE_SIZE](Self::VALUE_SIZE) random bytes and
/// retries with fresh bytes whenever [from_random_bytes()](Self::from_random_bytes) returns None.
pub trait Randomizable: Sized {
    /// Number of random bytes consumed per attempt; at most [WORD_SIZE].
    const VALUE_SIZE: usize;

    /// Maps `source` to a value, or returns None if the bytes must be rejected. Bytes past
    /// [VALUE_SIZE](Self::VALUE_SIZE) are ignored.
    fn from_random_bytes(source: &[u8]) -> Option<Self>;
}

macro_rules! impl_randomizable_int {
    ($($t:ty),*) => {$(
        impl Randomizable for $t {
            const VALUE_SIZE: usize = core::mem::size_of::<$t>();

            fn from_random_bytes(source: &[u8]) -> Option<Self> {
                source
                    .get(..Self::VALUE_SIZE)
                    .and_then(|bytes| bytes.try_into().ok())
                    .map(<$t>::from_be_bytes)
            }
        }
    )*};
}

impl_randomizable_int!(u8, u16, u32, u64, u128);

impl<const N: usize> Randomizable for [u8; N] {
    const VALUE_SIZE: usize = N;

    fn from_random_bytes(source: &[u8]) -> Option<Self> {
        source.get(..N).and_then(|bytes| bytes.try_into().ok())
    }
}
