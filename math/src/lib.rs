// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! This crate contains the field arithmetic layer used by the MiMC hash function and the Merkle
//! accumulator built on top of it.
//!
//! All arithmetic is performed in the scalar field of the BN254 (alt_bn128) elliptic curve; see
//! [fields::f254] for details.
#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod field;
pub use field::FieldElement;
pub mod fields {
    //! Finite field implementations.

    pub use super::field::f254;
}

mod errors;
pub use errors::ElementDecodingError;
