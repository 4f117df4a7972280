// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::sync::Arc;

use math::{fields::f254::BaseElement, ElementDecodingError, FieldElement};
use sha3::{Digest as _, Keccak256};
use tracing::{event, Level};

use super::Hasher;


// CONSTANTS
// ================================================================================================

/// Number of rounds of the MiMC permutation.
pub const NUM_ROUNDS: usize = 91;

/// Seed from which round constants are derived when no other seed is specified.
pub const DEFAULT_SEED: &[u8] = b"clearmatics_mt_seed";

// ROUND CONSTANTS
// ================================================================================================

/// Round constants of the MiMC permutation derived from a seed.
///
/// The first constant is always zero. Every subsequent constant is obtained by applying
/// Keccak-256 to the previous 32-byte digest (starting with the digest of the seed itself), and
/// interpreting the result as a big-endian integer reduced modulo the field modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConstants([BaseElement; NUM_ROUNDS]);

impl RoundConstants {
    /// Derives round constants from the provided seed.
    pub fn new(seed: &[u8]) -> Self {
        let mut constants = [BaseElement::ZERO; NUM_ROUNDS];

        // the chain is continued from the unreduced digest
        let mut digest: [u8; 32] = Keccak256::digest(seed).into();
        for constant in constants.iter_mut().skip(1) {
            digest = Keccak256::digest(digest).into();
            *constant = BaseElement::from_be_bytes_reduced(&digest);
        }

        event!(Level::DEBUG, seed_len = seed.len(), "derived {} MiMC round constants", NUM_ROUNDS);
        Self(constants)
    }

    /// Returns the constants as a slice ordered by round.
    pub fn as_slice(&self) -> &[BaseElement] {
        &self.0
    }
}

impl Default for RoundConstants {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

// MIMC-7
// ================================================================================================

/// Implementation of the [Hasher] trait for the MiMC-7 hash function over the BN254 scalar
/// field.
///
/// The underlying permutation consists of 91 rounds, each computing `x <- (x + k + c_i)^7` for
/// key `k` and round constant `c_i`; the key is added once more after the last round. A 2-to-1
/// compression function is derived from the permutation using the Miyaguchi-Preneel
/// construction:
///
/// `hash(x, y) = E_y(x) + x + y`
///
/// Round constants are computed once when the hasher is instantiated and are shared between all
/// clones of the hasher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiMC7 {
    constants: Arc<RoundConstants>,
}

impl MiMC7 {
    /// Returns a new hasher with round constants derived from the specified seed.
    pub fn new(seed: &[u8]) -> Self {
        Self { constants: Arc::new(RoundConstants::new(seed)) }
    }

    /// Returns round constants used by this hasher.
    pub fn round_constants(&self) -> &[BaseElement] {
        self.constants.as_slice()
    }

    /// Applies the MiMC permutation keyed with `key` to `x`.
    pub fn encrypt(&self, x: BaseElement, key: BaseElement) -> BaseElement {
        let mut state = x;
        for &constant in self.constants.as_slice() {
            state = (state + key + constant).exp7();
        }
        state + key
    }

    /// Returns a hash of two field elements.
    pub fn hash(&self, x: BaseElement, y: BaseElement) -> BaseElement {
        self.encrypt(x, y) + x + y
    }

    /// Returns a hash of two field elements provided as 32-byte big-endian integers; the result
    /// is encoded in the same way.
    ///
    /// # Errors
    /// Returns an error if either of the inputs is not exactly 32 bytes long, or encodes a value
    /// which is not smaller than the field modulus.
    pub fn hash_bytes(&self, x: &[u8], y: &[u8]) -> Result<[u8; 32], ElementDecodingError> {
        let x = BaseElement::from_be_bytes(x)?;
        let y = BaseElement::from_be_bytes(y)?;
        Ok(self.hash(x, y).to_be_bytes())
    }
}

impl Default for MiMC7 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Hasher for MiMC7 {
    type Digest = BaseElement;

    fn merge(&self, values: &[Self::Digest; 2]) -> Self::Digest {
        self.hash(values[0], values[1])
    }
}
