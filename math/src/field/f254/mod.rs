// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An implementation of the scalar field of the BN254 (alt_bn128) elliptic curve using Montgomery
//! representation.
//!
//! The field modulus is
//! $p = 21888242871839275222246405745257275088548364400416034343698204186575808495617$, a 254-bit
//! prime. This is the field over which the MiMC hash function and the Merkle accumulator in
//! this workspace operate.
//!
//! Elements are stored as four little-endian 64-bit limbs holding $x \cdot R \bmod p$, where
//! $R = 2^{256}$. Multiplication uses schoolbook limb products followed by a word-by-word
//! Montgomery reduction; all internal values are kept fully reduced in the range $[0, p)$, so
//! equality can be checked directly on the internal representation.
//!
//! The canonical external encoding of an element is a 32-byte big-endian integer in $[0, p)$.

use alloc::{string::ToString, vec::Vec};
use core::{
    fmt::{Debug, Display, Formatter, LowerHex},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use num_bigint::BigUint;
use utils::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Randomizable, Serializable,
};

use super::FieldElement;
use crate::errors::ElementDecodingError;

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Field modulus p in little-endian limbs.
const M: [u64; 4] = [0x43e1f593f0000001, 0x2833e84879b97091, 0xb85045b68181585d, 0x30644e72e131a029];

/// p - 2; used to compute multiplicative inverses via Fermat's little theorem.
const M_MINUS_TWO: [u64; 4] =
    [0x43e1f593efffffff, 0x2833e84879b97091, 0xb85045b68181585d, 0x30644e72e131a029];

/// 2^512 mod p; this is used for conversion of elements into Montgomery representation.
const R2: [u64; 4] = [0x1bb8e645ae216da7, 0x53fe3ab1e35c59e3, 0x8c49833d53bb8085, 0x0216d0b17f4e44a5];

/// -p^{-1} mod 2^64.
const INV: u64 = 0xc2e1f593efffffff;

/// Number of bytes needed to represent field element
const ELEMENT_BYTES: usize = 32;

// FIELD ELEMENT
// ================================================================================================

/// Represents a field element in the BN254 scalar field using Montgomery representation.
///
/// Internal values represent x * R mod p where R = 2^256 and x in [0, p).
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct BaseElement([u64; 4]);

impl BaseElement {
    /// Field modulus in little-endian 64-bit limbs.
    pub const MODULUS: [u64; 4] = M;

    /// Creates a new field element from the provided little-endian limbs; the value is converted
    /// into Montgomery representation.
    ///
    /// If the value is greater than or equal to the field modulus, modular reduction is
    /// silently performed.
    pub const fn new(value: [u64; 4]) -> BaseElement {
        // value * R2 < 2^256 * p, which keeps the result of the reduction below p
        Self(mont_mul(&value, &R2))
    }

    /// Creates a new field element from a 32-byte big-endian integer, silently reducing it
    /// modulo p.
    ///
    /// This is intended for deriving field elements from hash digests; use
    /// [from_be_bytes()](Self::from_be_bytes) for values received from external sources.
    pub const fn from_be_bytes_reduced(bytes: &[u8; 32]) -> BaseElement {
        Self::new(limbs_from_be_bytes(bytes))
    }

    /// Decodes a field element from its canonical 32-byte big-endian encoding.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The length of `bytes` is not 32.
    /// * The encoded integer is greater than or equal to the field modulus.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<BaseElement, ElementDecodingError> {
        if bytes.len() < ELEMENT_BYTES {
            return Err(ElementDecodingError::NotEnoughBytes(ELEMENT_BYTES, bytes.len()));
        }
        if bytes.len() > ELEMENT_BYTES {
            return Err(ElementDecodingError::TooManyBytes(ELEMENT_BYTES, bytes.len()));
        }
        let mut buf = [0u8; ELEMENT_BYTES];
        buf.copy_from_slice(bytes);
        let value = limbs_from_be_bytes(&buf);
        if !is_canonical(&value) {
            let value = BigUint::from_bytes_be(&buf);
            return Err(ElementDecodingError::ValueTooLarge(value.to_string()));
        }
        Ok(Self::new(value))
    }

    /// Returns the canonical 32-byte big-endian encoding of this field element.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let value = self.as_int();
        let mut result = [0u8; ELEMENT_BYTES];
        for (i, limb) in value.iter().rev().enumerate() {
            result[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        result
    }

    /// Returns canonical integer representation of this field element as little-endian limbs.
    #[inline(always)]
    pub const fn as_int(&self) -> [u64; 4] {
        let r = &self.0;
        mont_red(&[r[0], r[1], r[2], r[3], 0, 0, 0, 0])
    }

    /// Raises this element to a 256-bit power given in little-endian limbs.
    fn exp_limbs(self, power: &[u64; 4]) -> Self {
        let mut result = Self::ONE;
        for limb in power.iter().rev() {
            for i in (0..64).rev() {
                result = result.square();
                if (limb >> i) & 1 == 1 {
                    result *= self;
                }
            }
        }
        result
    }
}

impl FieldElement for BaseElement {
    const ZERO: Self = Self([0; 4]);
    const ONE: Self = Self::new([1, 0, 0, 0]);

    const ELEMENT_BYTES: usize = ELEMENT_BYTES;
    const MODULUS_BITS: u32 = 254;

    #[inline]
    fn square(self) -> Self {
        Self(mont_mul(&self.0, &self.0))
    }

    #[inline]
    fn inv(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        self.exp_limbs(&M_MINUS_TWO)
    }

    #[inline]
    fn is_zero(self) -> bool {
        // zero is the only value whose Montgomery form is zero
        self.0 == [0; 4]
    }
}

impl Randomizable for BaseElement {
    const VALUE_SIZE: usize = Self::ELEMENT_BYTES;

    /// Interprets the first 32 bytes as a big-endian integer with the bits above the modulus
    /// cleared; values which are not valid field elements are rejected.
    fn from_random_bytes(bytes: &[u8]) -> Option<Self> {
        let mut buf: [u8; ELEMENT_BYTES] = bytes.get(..ELEMENT_BYTES)?.try_into().ok()?;
        buf[0] &= 0xff >> (256 - Self::MODULUS_BITS);
        Self::from_be_bytes(&buf).ok()
    }
}

// TEXT REPRESENTATION
// ================================================================================================

impl Debug for BaseElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for BaseElement {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "{}", BigUint::from_bytes_be(&self.to_be_bytes()))
    }
}

impl LowerHex for BaseElement {
    /// Writes the element as 64 hex digits; the alternate flag adds a `0x` prefix.
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        for limb in self.as_int().iter().rev() {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl FromStr for BaseElement {
    type Err = ElementDecodingError;

    /// Parses a field element from a decimal string or from a `0x`-prefixed hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(ElementDecodingError::EmptyString);
        }

        let digits = digits
            .chars()
            .map(|c| match c.to_digit(radix) {
                Some(digit) => Ok(digit as u8),
                None => Err(ElementDecodingError::InvalidDigit(c)),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        let bytes = BigUint::from_radix_be(&digits, radix)
            .ok_or(ElementDecodingError::EmptyString)?
            .to_bytes_be();
        if bytes.len() > ELEMENT_BYTES {
            return Err(ElementDecodingError::ValueTooLarge(s.to_string()));
        }

        let mut buf = [0u8; ELEMENT_BYTES];
        buf[ELEMENT_BYTES - bytes.len()..].copy_from_slice(&bytes);
        let value = limbs_from_be_bytes(&buf);
        if !is_canonical(&value) {
            return Err(ElementDecodingError::ValueTooLarge(s.to_string()));
        }
        Ok(Self::new(value))
    }
}

// OVERLOADED OPERATORS
// ================================================================================================

impl Add for BaseElement {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (d0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (d1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (d2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (d3, carry) = adc(self.0[3], rhs.0[3], carry);
        Self(sub_modulus_if_needed([d0, d1, d2, d3], carry))
    }
}

impl AddAssign for BaseElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl Sub for BaseElement {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (d0, borrow) = sbb(self.0[0], rhs.0[0], 0);
        let (d1, borrow) = sbb(self.0[1], rhs.0[1], borrow);
        let (d2, borrow) = sbb(self.0[2], rhs.0[2], borrow);
        let (d3, borrow) = sbb(self.0[3], rhs.0[3], borrow);

        // if the subtraction underflowed, borrow is an all-ones mask and p is added back
        let (d0, carry) = adc(d0, M[0] & borrow, 0);
        let (d1, carry) = adc(d1, M[1] & borrow, carry);
        let (d2, carry) = adc(d2, M[2] & borrow, carry);
        let (d3, _) = adc(d3, M[3] & borrow, carry);
        Self([d0, d1, d2, d3])
    }
}

impl SubAssign for BaseElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for BaseElement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(mont_mul(&self.0, &rhs.0))
    }
}

impl MulAssign for BaseElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs
    }
}

impl Div for BaseElement {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inv()
    }
}

impl DivAssign for BaseElement {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs
    }
}

impl Neg for BaseElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        let (d0, borrow) = sbb(M[0], self.0[0], 0);
        let (d1, borrow) = sbb(M[1], self.0[1], borrow);
        let (d2, borrow) = sbb(M[2], self.0[2], borrow);
        let (d3, _) = sbb(M[3], self.0[3], borrow);

        // -0 must stay 0 rather than becoming p
        let mask = (self.is_zero() as u64).wrapping_sub(1);
        Self([d0 & mask, d1 & mask, d2 & mask, d3 & mask])
    }
}

// TYPE CONVERSIONS
// ================================================================================================

impl From<u64> for BaseElement {
    fn from(value: u64) -> Self {
        Self::new([value, 0, 0, 0])
    }
}

impl From<u32> for BaseElement {
    fn from(value: u32) -> Self {
        Self::from(value as u64)
    }
}

impl From<u16> for BaseElement {
    fn from(value: u16) -> Self {
        Self::from(value as u64)
    }
}

impl From<u8> for BaseElement {
    fn from(value: u8) -> Self {
        Self::from(value as u64)
    }
}

impl TryFrom<&'_ [u8]> for BaseElement {
    type Error = ElementDecodingError;

    /// Converts a slice of bytes into a field element; returns error if the value encoded in bytes
    /// is not a valid field element. The bytes are assumed to encode the element in the canonical
    /// representation in big-endian byte order.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_be_bytes(bytes)
    }
}

impl From<BaseElement> for [u8; 32] {
    fn from(value: BaseElement) -> Self {
        value.to_be_bytes()
    }
}

// SERIALIZATION / DESERIALIZATION
// ================================================================================================

impl Serializable for BaseElement {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        // convert from Montgomery representation into canonical representation
        target.write_word(&self.to_be_bytes());
    }

    fn get_size_hint(&self) -> usize {
        ELEMENT_BYTES
    }
}

impl Deserializable for BaseElement {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let bytes = source.read_word()?;
        Self::from_be_bytes(&bytes)
            .map_err(|err| DeserializationError::InvalidValue(err.to_string()))
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Computes a + b + carry, returning the result and the new carry over.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes a - (b + borrow), returning the result and the new borrow. The borrow is either zero
/// or an all-ones mask.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes a + (b * c) + carry, returning the result and the new carry over.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Montgomery multiplication: returns a * b * R^{-1} mod p.
#[inline(always)]
const fn mont_mul(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut t = [0u64; 8];
    let mut i = 0;
    while i < 4 {
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(t[i + j], a[i], b[j], carry);
            t[i + j] = lo;
            carry = hi;
            j += 1;
        }
        t[i + 4] = carry;
        i += 1;
    }
    mont_red(&t)
}

/// Montgomery reduction of a 512-bit value: returns r * R^{-1} mod p. The input must be smaller
/// than p * R.
#[inline(always)]
const fn mont_red(r: &[u64; 8]) -> [u64; 4] {
    let mut r = *r;
    let mut carry2 = 0;
    let mut i = 0;
    while i < 4 {
        let k = r[i].wrapping_mul(INV);
        let (_, mut carry) = mac(r[i], k, M[0], 0);
        let mut j = 1;
        while j < 4 {
            let (lo, hi) = mac(r[i + j], k, M[j], carry);
            r[i + j] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(r[i + 4], carry2, carry);
        r[i + 4] = lo;
        carry2 = hi;
        i += 1;
    }
    sub_modulus_if_needed([r[4], r[5], r[6], r[7]], carry2)
}

/// Given a value (hi * 2^256 + d) in [0, 2p), returns the value reduced into [0, p).
#[inline(always)]
const fn sub_modulus_if_needed(d: [u64; 4], hi: u64) -> [u64; 4] {
    let (d0, borrow) = sbb(d[0], M[0], 0);
    let (d1, borrow) = sbb(d[1], M[1], borrow);
    let (d2, borrow) = sbb(d[2], M[2], borrow);
    let (d3, borrow) = sbb(d[3], M[3], borrow);
    let (_, borrow) = sbb(hi, 0, borrow);

    let (d0, carry) = adc(d0, M[0] & borrow, 0);
    let (d1, carry) = adc(d1, M[1] & borrow, carry);
    let (d2, carry) = adc(d2, M[2] & borrow, carry);
    let (d3, _) = adc(d3, M[3] & borrow, carry);
    [d0, d1, d2, d3]
}

/// Returns true if the integer represented by `value` is smaller than the field modulus.
#[inline(always)]
const fn is_canonical(value: &[u64; 4]) -> bool {
    let (_, borrow) = sbb(value[0], M[0], 0);
    let (_, borrow) = sbb(value[1], M[1], borrow);
    let (_, borrow) = sbb(value[2], M[2], borrow);
    let (_, borrow) = sbb(value[3], M[3], borrow);
    borrow != 0
}

/// Interprets 32 bytes as a big-endian 256-bit integer and returns its little-endian limbs.
const fn limbs_from_be_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut result = [0u64; 4];
    let mut i = 0;
    while i < 4 {
        let mut limb = 0u64;
        let mut j = 0;
        while j < 8 {
            limb = (limb << 8) | bytes[(3 - i) * 8 + j] as u64;
            j += 1;
        }
        result[i] = limb;
        i += 1;
    }
    result
}
