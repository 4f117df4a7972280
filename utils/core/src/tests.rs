// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::{string::ToString, vec::Vec};

use proptest::prelude::{any, proptest};

use super::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Randomizable, Serializable,
    SliceReader, WORD_SIZE,
};

fn words(values: &[u8]) -> Vec<u8> {
    values.iter().flat_map(|&v| [v; WORD_SIZE]).collect()
}

// SLICE READER TESTS
// ================================================================================================

#[test]
fn read_words() {
    let mut source = words(&[7, 9]);
    source.push(1);
    let mut reader = SliceReader::new(&source);

    assert_eq!(65, reader.remaining());
    assert_eq!([7u8; 32], reader.read_word().unwrap());
    assert_eq!(32, reader.position());
    assert_eq!([9u8; 32], reader.read_word().unwrap());
    assert!(reader.has_more_bytes());

    // a partial word is an error and does not advance the reader
    assert_eq!(Err(DeserializationError::UnexpectedEOF(32, 1)), reader.read_word());
    assert_eq!(64, reader.position());
    assert_eq!([1u8], reader.read_array::<1>().unwrap());
    assert!(!reader.has_more_bytes());
}

#[test]
fn read_many() {
    let source = words(&[1, 2, 3]);
    let mut reader = SliceReader::new(&source);
    let result: Vec<[u8; 32]> = reader.read_many(3).unwrap();
    assert_eq!(vec![[1u8; 32], [2u8; 32], [3u8; 32]], result);

    let mut reader = SliceReader::new(&source);
    let result = reader.read_many::<[u8; 32]>(4);
    assert_eq!(Err(DeserializationError::UnexpectedEOF(32, 0)), result);

    let mut reader = SliceReader::new(&source);
    assert_eq!(Ok(Vec::<[u8; 32]>::new()), reader.read_many(0));
    assert_eq!(96, reader.remaining());
}

#[test]
fn read_from_bytes_rejects_trailing_data() {
    assert_eq!(Ok([1u8, 2, 3, 4]), <[u8; 4]>::read_from_bytes(&[1, 2, 3, 4]));
    assert_eq!(
        Err(DeserializationError::UnconsumedBytes(2)),
        <[u8; 4]>::read_from_bytes(&[1, 2, 3, 4, 5, 6])
    );
    assert_eq!(
        Err(DeserializationError::UnexpectedEOF(4, 3)),
        <[u8; 4]>::read_from_bytes(&[1, 2, 3])
    );
}

// SERIALIZATION TESTS
// ================================================================================================

#[test]
fn write_words() {
    let mut target: Vec<u8> = Vec::new();
    target.write_word(&[5u8; 32]);
    target.write([6u8; 32]);
    assert_eq!(words(&[5, 6]), target);
}

#[test]
fn write_serializable_batch() {
    let mut target: Vec<u8> = Vec::new();

    let batch = vec![[1u8; 32], [2u8; 32], [3u8; 32]];
    target.write_many(&batch);
    assert_eq!(96, target.len());
    assert_eq!(batch.get_size_hint(), target.len());
    assert_eq!(target, batch.to_bytes());
    assert_eq!(words(&[1, 2, 3]), target);
}

#[test]
fn error_messages() {
    assert_eq!(
        "unexpected end of input: 32 bytes requested, but only 5 remain",
        DeserializationError::UnexpectedEOF(32, 5).to_string()
    );
    assert_eq!("bad value", DeserializationError::InvalidValue("bad value".into()).to_string());
}

// RANDOMIZABLE
// ================================================================================================

#[test]
fn randomizable_needs_enough_bytes() {
    assert_eq!(Some(0x0102u16), u16::from_random_bytes(&[1, 2, 3]));
    assert_eq!(None, u32::from_random_bytes(&[1, 2, 3]));
    assert_eq!(Some([5u8; 4]), <[u8; 4]>::from_random_bytes(&[5u8; 8]));
}

proptest! {
    #[test]
    fn word_round_trip(word in any::<[u8; 32]>()) {
        let bytes = word.to_bytes();
        assert_eq!(WORD_SIZE, bytes.len());
        assert_eq!(word, <[u8; 32]>::read_from_bytes(&bytes).unwrap());
    }
}
