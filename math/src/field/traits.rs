// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use core::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use utils::{Deserializable, Randomizable, Serializable};

// FIELD ELEMENT
// ================================================================================================

/// Defines an element of the prime field over which MiMC hashing is performed.
///
/// Elements cross every external boundary in their canonical encoding of
/// [ELEMENT_BYTES](Self::ELEMENT_BYTES) bytes; the `TryFrom<&[u8]>` conversion must reject any
/// byte string which is not a canonical encoding.
pub trait FieldElement:
    Copy
    + Clone
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Eq
    + PartialEq
    + Sized
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + DivAssign<Self>
    + Neg<Output = Self>
    + From<u64>
    + From<u32>
    + From<u16>
    + From<u8>
    + for<'a> TryFrom<&'a [u8]>
    + Randomizable
    + Serializable
    + Deserializable
{
    /// Number of bytes in the canonical encoding of an element.
    const ELEMENT_BYTES: usize;

    /// Number of bits needed to represent the field modulus.
    const MODULUS_BITS: u32;

    /// The additive identity.
    const ZERO: Self;

    /// The multiplicative identity.
    const ONE: Self;

    // ALGEBRA
    // --------------------------------------------------------------------------------------------

    /// Returns this field element raised to power 2.
    #[must_use]
    fn square(self) -> Self {
        self * self
    }

    /// Exponentiates this field element by `power` using square-and-multiply.
    #[must_use]
    fn exp(self, power: u64) -> Self {
        if power == 0 {
            return Self::ONE;
        }

        let mut result = Self::ONE;
        for i in (0..u64::BITS - power.leading_zeros()).rev() {
            result = result.square();
            if (power >> i) & 1 == 1 {
                result *= self;
            }
        }
        result
    }

    /// Returns this field element raised to power 7.
    ///
    /// This is the S-box of the MiMC permutation; it needs four multiplications.
    #[must_use]
    fn exp7(self) -> Self {
        let x2 = self.square();
        let x4 = x2.square();
        x4 * x2 * self
    }

    /// Returns a multiplicative inverse of this field element. If this element is ZERO, ZERO is
    /// returned.
    #[must_use]
    fn inv(self) -> Self;

    /// Returns true if this element is the additive identity.
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}
