// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::vec::Vec;

use super::DeserializationError;

mod byte_reader;
pub use byte_reader::{ByteReader, SliceReader};

mod byte_writer;
pub use byte_writer::ByteWriter;

// CONSTANTS
// ================================================================================================

/// Size of a word on the wire; every field element and tree node occupies one word.
pub const WORD_SIZE: usize = 32;

// SERIALIZABLE
// ================================================================================================

/// Defines how to serialize `Self` into bytes.
pub trait Serializable {
    /// Serializes `self` into bytes and writes these bytes into the `target`.
    fn write_into<W: ByteWriter>(&self, target: &mut W);

    /// Serializes `self` into a vector of bytes.
    fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.get_size_hint());
        self.write_into(&mut result);
        result
    }

    /// Returns the number of bytes `self` is expected to serialize into; zero if unknown.
    fn get_size_hint(&self) -> usize {
        0
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        (*self).write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        (*self).get_size_hint()
    }
}

impl<const N: usize> Serializable for [u8; N] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_bytes(self);
    }

    fn get_size_hint(&self) -> usize {
        N
    }
}

impl<T: Serializable> Serializable for [T] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_many(self);
    }

    fn get_size_hint(&self) -> usize {
        self.iter().map(Serializable::get_size_hint).sum()
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        self.as_slice().write_into(target);
    }

    fn get_size_hint(&self) -> usize {
        self.as_slice().get_size_hint()
    }
}

// DESERIALIZABLE
// ================================================================================================

/// Defines how to deserialize `Self` from bytes.
pub trait Deserializable: Sized {
    /// Reads `Self` from the provided `source`.
    ///
    /// # Errors
    /// Returns an error if the `source` runs out of bytes, or if the bytes read do not encode a
    /// valid value of `Self`.
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError>;

    /// Deserializes `Self` from `bytes`, requiring that all bytes are consumed.
    ///
    /// # Errors
    /// Returns an error if `Self` could not be read, or if any bytes are left over.
    fn read_from_bytes(bytes: &[u8]) -> Result<Self, DeserializationError> {
        let mut reader = SliceReader::new(bytes);
        let result = Self::read_from(&mut reader)?;
        match reader.remaining() {
            0 => Ok(result),
            n => Err(DeserializationError::UnconsumedBytes(n)),
        }
    }
}

impl<const N: usize> Deserializable for [u8; N] {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_array()
    }
}
