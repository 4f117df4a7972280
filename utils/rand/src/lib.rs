// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Random field elements and byte strings for tests and benchmarks.
//!
//! Values are drawn as 32-byte chunks and passed to [utils::Randomizable::from_random_bytes()];
//! chunks which do not form a valid value are discarded and a new chunk is drawn. Nothing is
//! exported when compiling for WebAssembly.

pub use internal::*;

#[cfg(not(target_family = "wasm"))]
mod internal {
    use rand::prelude::*;
    use utils::Randomizable;

    /// Number of discarded chunks after which value generation gives up.
    const MAX_TRIES: usize = 1000;

    // RANDOM VALUES
    // ============================================================================================

    /// Returns a single value drawn from the thread-local generator.
    ///
    /// # Panics
    /// Panics if `R` needs more than 32 bytes, or if no valid value was drawn after
    /// 1000 tries.
    pub fn rand_value<R: Randomizable>() -> R {
        draw(&mut rand::rng())
    }

    /// Returns `n` values drawn from a generator seeded by the thread-local generator.
    ///
    /// # Panics
    /// Panics under the same conditions as [rand_value()].
    pub fn rand_vector<R: Randomizable>(n: usize) -> Vec<R> {
        prng_vector(rand::rng().random(), n)
    }

    /// Returns an array of `N` random values.
    ///
    /// # Panics
    /// Panics under the same conditions as [rand_value()].
    pub fn rand_array<R: Randomizable, const N: usize>() -> [R; N] {
        let mut rng = StdRng::from_seed(rand::rng().random());
        core::array::from_fn(|_| draw(&mut rng))
    }

    /// Returns `n` values generated deterministically from `seed`; the same seed always yields
    /// the same values.
    ///
    /// # Panics
    /// Panics under the same conditions as [rand_value()].
    pub fn prng_vector<R: Randomizable>(seed: [u8; 32], n: usize) -> Vec<R> {
        let mut rng = StdRng::from_seed(seed);
        (0..n).map(|_| draw(&mut rng)).collect()
    }

    // HELPER FUNCTIONS
    // ============================================================================================

    fn draw<R: Randomizable, G: Rng>(rng: &mut G) -> R {
        assert!(R::VALUE_SIZE <= 32, "values of {} bytes cannot be drawn", R::VALUE_SIZE);
        (0..MAX_TRIES)
            .find_map(|_| R::from_random_bytes(&rng.random::<[u8; 32]>()[..R::VALUE_SIZE]))
            .unwrap_or_else(|| panic!("no valid value drawn after {MAX_TRIES} tries"))
    }
}

#[cfg(target_family = "wasm")]
mod internal {}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::{prng_vector, rand_array, rand_value, rand_vector};

    #[test]
    fn rand_primitives() {
        assert_ne!(rand_value::<u64>(), rand_value::<u64>());
        assert_ne!(rand_value::<u128>(), rand_value::<u128>());
        assert_eq!(5, rand_vector::<u32>(5).len());
    }

    #[test]
    fn rand_byte_array() {
        let a = rand_array::<[u8; 32], 2>();
        let b = rand_array::<[u8; 32], 2>();
        assert_ne!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn prng_is_seeded() {
        let a = prng_vector::<u64>([3; 32], 16);
        let b = prng_vector::<u64>([3; 32], 16);
        let c = prng_vector::<u64>([4; 32], 16);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(prng_vector::<u64>([3; 32], 0).is_empty());

        // a longer sequence extends a shorter one
        assert_eq!(a[..8], prng_vector::<u64>([3; 32], 8)[..]);
    }
}
