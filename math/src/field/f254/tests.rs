// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::{format, string::ToString};

use num_bigint::BigUint;
use proptest::prelude::*;
use rand_utils::{prng_vector, rand_value};
use utils::Randomizable;

use super::{
    BaseElement, Deserializable, DeserializationError, ElementDecodingError, FieldElement,
    Serializable, M,
};

const MODULUS_STR: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

// MANUAL TESTS
// ================================================================================================

#[test]
fn add() {
    // identity
    let r: BaseElement = rand_value();
    assert_eq!(r, r + BaseElement::ZERO);

    // test addition within bounds
    assert_eq!(BaseElement::from(5u8), BaseElement::from(2u8) + BaseElement::from(3u8));

    // test overflow
    let t = p_minus(1);
    assert_eq!(BaseElement::ZERO, t + BaseElement::ONE);
    assert_eq!(BaseElement::ONE, t + BaseElement::from(2u8));
}

#[test]
fn sub() {
    // identity
    let r: BaseElement = rand_value();
    assert_eq!(r, r - BaseElement::ZERO);

    // test subtraction within bounds
    assert_eq!(BaseElement::from(2u8), BaseElement::from(5u8) - BaseElement::from(3u8));

    // test underflow
    assert_eq!(p_minus(2), BaseElement::from(3u8) - BaseElement::from(5u8));
}

#[test]
fn neg() {
    assert_eq!(BaseElement::ZERO, -BaseElement::ZERO);
    assert_eq!(p_minus(1), -BaseElement::ONE);

    let r: BaseElement = rand_value();
    assert_eq!(r, -(-r));
    assert_eq!(BaseElement::ZERO, r + (-r));
}

#[test]
fn mul() {
    // identity
    let r: BaseElement = rand_value();
    assert_eq!(BaseElement::ZERO, r * BaseElement::ZERO);
    assert_eq!(r, r * BaseElement::ONE);

    // test multiplication within bounds
    assert_eq!(BaseElement::from(15u8), BaseElement::from(5u8) * BaseElement::from(3u8));

    // test overflow
    let t = p_minus(1);
    assert_eq!(BaseElement::ONE, t * t);
    assert_eq!(p_minus(2), t * BaseElement::from(2u8));
    assert_eq!(p_minus(4), t * BaseElement::from(4u8));

    // (p + 1) / 2 is the inverse of 2
    let mut half = M;
    half[0] += 1;
    let half = [
        (half[0] >> 1) | (half[1] << 63),
        (half[1] >> 1) | (half[2] << 63),
        (half[2] >> 1) | (half[3] << 63),
        half[3] >> 1,
    ];
    assert_eq!(BaseElement::ONE, BaseElement::new(half) * BaseElement::from(2u8));
}

#[test]
fn exp() {
    let a = BaseElement::ZERO;
    assert_eq!(a.exp(0), BaseElement::ONE);
    assert_eq!(a.exp(1), BaseElement::ZERO);
    assert_eq!(a.exp7(), BaseElement::ZERO);

    let a = BaseElement::ONE;
    assert_eq!(a.exp(0), BaseElement::ONE);
    assert_eq!(a.exp(1), BaseElement::ONE);
    assert_eq!(a.exp(3), BaseElement::ONE);
    assert_eq!(a.exp7(), BaseElement::ONE);

    let a: BaseElement = rand_value();
    assert_eq!(a.exp(3), a * a * a);
    assert_eq!(a.exp(2), a.square());
    assert!(!BaseElement::ONE.is_zero());
    assert!(BaseElement::new(M).is_zero());
    assert_eq!(a.exp(7), a.exp7());

    assert_eq!(BaseElement::from(128u8), BaseElement::from(2u8).exp7());
}

#[test]
fn inv() {
    // identity
    assert_eq!(BaseElement::ONE, BaseElement::inv(BaseElement::ONE));
    assert_eq!(BaseElement::ZERO, BaseElement::inv(BaseElement::ZERO));

    // -1 is its own inverse
    assert_eq!(p_minus(1), p_minus(1).inv());

    for r in prng_vector::<BaseElement>([11; 32], 16) {
        assert_eq!(BaseElement::ONE, r * r.inv());
        assert_eq!(r, r.inv().inv());
    }
}

#[test]
fn div() {
    let a: BaseElement = rand_value();
    let b: BaseElement = rand_value();
    assert_eq!(a, (a / b) * b);
    assert_eq!(BaseElement::ZERO, a / BaseElement::ZERO);
}

#[test]
fn element_as_int() {
    // values at or above the modulus are reduced silently
    assert_eq!([0; 4], BaseElement::new(M).as_int());
    assert_eq!([5, 0, 0, 0], BaseElement::new([M[0] + 5, M[1], M[2], M[3]]).as_int());

    let max = BaseElement::new([u64::MAX; 4]);
    let expected = (BigUint::from(2u8).pow(256) - 1u8) % modulus();
    assert_eq!(expected, to_big(max));

    assert_eq!([u64::MAX, 0, 0, 0], BaseElement::from(u64::MAX).as_int());
}

// SERIALIZATION / DESERIALIZATION
// ================================================================================================

#[test]
fn to_be_bytes() {
    let mut expected = [0u8; 32];
    expected[31] = 1;
    assert_eq!(expected, BaseElement::ONE.to_be_bytes());

    expected[30] = 2;
    assert_eq!(expected, BaseElement::from(0x0201u16).to_be_bytes());

    let bytes = p_minus(1).to_be_bytes();
    assert_eq!(0x30, bytes[0]);
    assert_eq!(0x00, bytes[31]);
    assert_eq!(modulus() - 1u8, BigUint::from_bytes_be(&bytes));
}

#[test]
fn from_be_bytes() {
    let r: BaseElement = rand_value();
    assert_eq!(r, BaseElement::from_be_bytes(&r.to_be_bytes()).unwrap());
    assert_eq!(Ok(r), BaseElement::try_from(&r.to_be_bytes()[..]));

    assert_eq!(
        Err(ElementDecodingError::NotEnoughBytes(32, 31)),
        BaseElement::from_be_bytes(&[0u8; 31])
    );
    assert_eq!(
        Err(ElementDecodingError::TooManyBytes(32, 33)),
        BaseElement::from_be_bytes(&[0u8; 33])
    );
    assert_eq!(
        Err(ElementDecodingError::ValueTooLarge(MODULUS_STR.to_string())),
        BaseElement::from_be_bytes(&modulus_bytes())
    );
    assert!(BaseElement::from_be_bytes(&[0xff; 32]).is_err());
}

#[test]
fn from_be_bytes_reduced() {
    assert_eq!(BaseElement::ZERO, BaseElement::from_be_bytes_reduced(&modulus_bytes()));

    let mut bytes = modulus_bytes();
    bytes[31] += 7;
    assert_eq!(BaseElement::from(7u8), BaseElement::from_be_bytes_reduced(&bytes));

    let expected = (BigUint::from(2u8).pow(256) - 1u8) % modulus();
    assert_eq!(expected, to_big(BaseElement::from_be_bytes_reduced(&[0xff; 32])));
}

#[test]
fn serialization() {
    let elements = prng_vector::<BaseElement>([5; 32], 3);
    let bytes = elements.to_bytes();
    assert_eq!(96, bytes.len());
    assert_eq!(elements[1].to_be_bytes()[..], bytes[32..64]);

    let element = BaseElement::read_from_bytes(&bytes[64..]).unwrap();
    assert_eq!(elements[2], element);
}

#[test]
fn deserialization_rejects_invalid_values() {
    let err = BaseElement::read_from_bytes(&modulus_bytes()).unwrap_err();
    assert_eq!(
        DeserializationError::InvalidValue(
            ElementDecodingError::ValueTooLarge(MODULUS_STR.to_string()).to_string()
        ),
        err
    );

    assert_eq!(
        Err(DeserializationError::UnexpectedEOF(32, 16)),
        BaseElement::read_from_bytes(&[1u8; 16])
    );
    assert_eq!(
        Err(DeserializationError::UnconsumedBytes(1)),
        BaseElement::read_from_bytes(&[0u8; 33])
    );
}

// TEXT REPRESENTATION
// ================================================================================================

#[test]
fn display() {
    assert_eq!("0", format!("{}", BaseElement::ZERO));
    assert_eq!("1", format!("{}", BaseElement::ONE));
    assert_eq!("10000000000000000000", format!("{}", BaseElement::from(10_000_000_000_000_000_000u64)));
    assert_eq!("18446744073709551615", format!("{}", BaseElement::from(u64::MAX)));
    assert_eq!(
        "21888242871839275222246405745257275088548364400416034343698204186575808495616",
        format!("{}", p_minus(1))
    );
    assert_eq!(format!("{}", BaseElement::ONE), format!("{:?}", BaseElement::ONE));
}

#[test]
fn lower_hex() {
    assert_eq!("0".repeat(63) + "1", format!("{:x}", BaseElement::ONE));
    assert_eq!(
        "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000000",
        format!("{:#x}", p_minus(1))
    );
}

#[test]
fn from_str() {
    assert_eq!(Ok(BaseElement::ZERO), "0".parse());
    assert_eq!(Ok(BaseElement::from(255u8)), "255".parse());
    assert_eq!(Ok(BaseElement::from(255u8)), "0xff".parse());
    assert_eq!(Ok(BaseElement::from(255u8)), "0xFF".parse());
    assert_eq!(Ok(p_minus(1)), format!("{}", p_minus(1)).parse());
    assert_eq!(Ok(BaseElement::ONE), format!("{}1", "0".repeat(100)).parse());

    assert_eq!(Err(ElementDecodingError::EmptyString), "".parse::<BaseElement>());
    assert_eq!(Err(ElementDecodingError::EmptyString), "0x".parse::<BaseElement>());
    assert_eq!(Err(ElementDecodingError::InvalidDigit('a')), "12a".parse::<BaseElement>());
    assert_eq!(Err(ElementDecodingError::InvalidDigit('g')), "0x1g".parse::<BaseElement>());
    assert_eq!(Err(ElementDecodingError::InvalidDigit('-')), "-1".parse::<BaseElement>());
    assert_eq!(
        Err(ElementDecodingError::ValueTooLarge(MODULUS_STR.to_string())),
        MODULUS_STR.parse::<BaseElement>()
    );

    // values which do not fit into 256 bits are rejected rather than wrapped
    let too_long = format!("0x1{}", "0".repeat(64));
    assert!(matches!(
        too_long.parse::<BaseElement>(),
        Err(ElementDecodingError::ValueTooLarge(_))
    ));
}

// RANDOMIZED TESTS
// ================================================================================================

proptest! {
    #[test]
    fn add_proptest(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let expected = (to_big(v1) + to_big(v2)) % modulus();
        prop_assert_eq!(expected, to_big(v1 + v2));
    }

    #[test]
    fn sub_proptest(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let expected = (to_big(v1) + modulus() - to_big(v2)) % modulus();
        prop_assert_eq!(expected, to_big(v1 - v2));
    }

    #[test]
    fn mul_proptest(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let expected = (to_big(v1) * to_big(v2)) % modulus();
        prop_assert_eq!(expected, to_big(v1 * v2));
    }

    #[test]
    fn new_reduces_proptest(a in any::<[u64; 4]>()) {
        let expected = limbs_to_big(&a) % modulus();
        prop_assert_eq!(expected, to_big(BaseElement::new(a)));
    }

    #[test]
    fn exp7_proptest(a in any::<[u64; 4]>()) {
        let v = BaseElement::new(a);
        let expected = to_big(v).modpow(&BigUint::from(7u8), &modulus());
        prop_assert_eq!(expected, to_big(v.exp7()));
    }

    #[test]
    fn inv_proptest(a in any::<[u64; 4]>()) {
        let v = BaseElement::new(a);
        prop_assume!(v != BaseElement::ZERO);
        prop_assert_eq!(BaseElement::ONE, v * v.inv());
    }

    #[test]
    fn text_round_trip_proptest(a in any::<[u64; 4]>()) {
        let v = BaseElement::new(a);
        prop_assert_eq!(to_big(v).to_string(), format!("{}", v));
        prop_assert_eq!(Ok(v), format!("{}", v).parse::<BaseElement>());
        prop_assert_eq!(Ok(v), format!("{:#x}", v).parse::<BaseElement>());
    }

    #[test]
    fn random_bytes_proptest(bytes in any::<[u8; 32]>()) {
        let mut masked = bytes;
        masked[0] &= 0x3f;
        let value = BigUint::from_bytes_be(&masked);
        match BaseElement::from_random_bytes(&bytes) {
            Some(e) => prop_assert_eq!(value, to_big(e)),
            None => prop_assert!(value >= modulus()),
        }
    }
}

// HELPER FUNCTIONS
// ================================================================================================

fn modulus() -> BigUint {
    limbs_to_big(&M)
}

fn modulus_bytes() -> [u8; 32] {
    let bytes = modulus().to_bytes_be();
    bytes.try_into().unwrap()
}

fn limbs_to_big(limbs: &[u64; 4]) -> BigUint {
    let digits = limbs.iter().flat_map(|limb| [*limb as u32, (*limb >> 32) as u32]).collect();
    BigUint::new(digits)
}

fn to_big(e: BaseElement) -> BigUint {
    BigUint::from_bytes_be(&e.to_be_bytes())
}

/// Returns p - n as a field element.
fn p_minus(n: u64) -> BaseElement {
    -BaseElement::from(n)
}
